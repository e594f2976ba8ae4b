//! Frame index to sample window mapping.

use super::stereo::DerivedChannelPair;
use crate::error::{Result, VectorscopeError};

/// Half-open sample range `[start, end)` shown in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    pub start: usize,
    pub end: usize,
}

impl FrameWindow {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps animation frames onto the sample timeline at a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSampler {
    sample_rate: u32,
    fps: f64,
}

impl FrameSampler {
    /// # Errors
    /// Returns a `Config` error if `fps` is not a positive finite number or
    /// `sample_rate` is zero.
    pub fn new(sample_rate: u32, fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(VectorscopeError::Config(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        if sample_rate == 0 {
            return Err(VectorscopeError::Config("sample rate must be positive".into()));
        }
        Ok(Self { sample_rate, fps })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames to render.
    ///
    /// `floor(duration * fps)` when a duration is given (regardless of signal
    /// length), otherwise `floor(signal_len * fps / sample_rate)`. Non-positive
    /// or NaN durations yield zero.
    pub fn total_frames(&self, signal_len: usize, duration: Option<f64>) -> usize {
        let frames = match duration {
            Some(secs) => secs * self.fps,
            None => signal_len as f64 * self.fps / self.sample_rate as f64,
        };
        if frames.is_nan() || frames <= 0.0 {
            0
        } else {
            frames.floor() as usize
        }
    }

    /// Window for frame `index`: `[floor(i*sr/fps), floor((i+1)*sr/fps))`.
    pub fn window(&self, index: usize) -> FrameWindow {
        FrameWindow {
            start: self.boundary(index),
            end: self.boundary(index + 1),
        }
    }

    /// Windows for frames `0..total_frames`, in order.
    pub fn windows(&self, total_frames: usize) -> impl Iterator<Item = FrameWindow> + '_ {
        (0..total_frames).map(move |i| self.window(i))
    }

    /// X and Y samples for frame `index`.
    ///
    /// Windows past the end of the signal are clamped, so the tail frame may be
    /// short and frames beyond the signal are empty.
    pub fn slice<'a>(&self, pair: &'a DerivedChannelPair, index: usize) -> (&'a [f32], &'a [f32]) {
        let window = self.window(index);
        let end = window.end.min(pair.len());
        let start = window.start.min(end);
        (&pair.trace_x()[start..end], &pair.trace_y()[start..end])
    }

    fn boundary(&self, index: usize) -> usize {
        (index as f64 * self.sample_rate as f64 / self.fps).floor() as usize
    }
}
