//! Per-run render settings.

use crate::error::{Result, VectorscopeError};
use serde::{Deserialize, Serialize};

/// How the muxed output length is reconciled when video and soundtrack differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationPolicy {
    /// Output lasts exactly as long as the video; a longer soundtrack is cut,
    /// a shorter one leaves trailing silence.
    #[default]
    Video,
    /// Output ends with whichever stream ends first.
    Shortest,
    /// Both streams are kept whole; the shorter one simply ends early.
    Longest,
}

impl std::fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Shortest => write!(f, "shortest"),
            Self::Longest => write!(f, "longest"),
        }
    }
}

/// Everything the renderer and muxer need for one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Frames per second of the output video
    pub fps: f64,
    /// Number of frames to render
    pub total_frames: usize,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Both axes span `[-axis_range, axis_range]`
    pub axis_range: f64,
    /// RGB color of the trace
    pub trace_color: [u8; 3],
    /// Trace stroke width in pixels
    pub line_width: u32,
    /// Opaque RGB background
    pub background: [u8; 3],
    /// Target H.264 bitrate in kbit/s
    pub video_bitrate_kbps: u32,
    pub duration_policy: DurationPolicy,
}

impl RenderConfig {
    /// Default settings for an animation of `total_frames` frames.
    pub fn new(total_frames: usize) -> Self {
        Self {
            fps: 30.0,
            total_frames,
            width: 1920,
            height: 1080,
            axis_range: 0.65,
            trace_color: [0, 255, 0],
            line_width: 1,
            background: [0, 0, 0],
            video_bitrate_kbps: 1800,
            duration_policy: DurationPolicy::default(),
        }
    }

    /// Checks every field, reporting the first violation as a `Config` error.
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(VectorscopeError::Config(format!(
                "fps must be a positive number, got {}",
                self.fps
            )));
        }
        if self.total_frames == 0 {
            return Err(VectorscopeError::Config(
                "animation has no frames; a zero-length video is not rendered".into(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(VectorscopeError::Config(format!(
                "canvas must be at least 1x1 pixels, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.axis_range.is_finite() || self.axis_range <= 0.0 {
            return Err(VectorscopeError::Config(format!(
                "axis range must be positive, got {}",
                self.axis_range
            )));
        }
        if self.line_width == 0 {
            return Err(VectorscopeError::Config("line width must be at least 1".into()));
        }
        if self.video_bitrate_kbps == 0 {
            return Err(VectorscopeError::Config("video bitrate must be positive".into()));
        }
        Ok(())
    }

    /// Length of the rendered video in seconds.
    pub fn video_duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::new(30);
        assert_eq!(config.fps, 30.0);
        assert_eq!((config.width, config.height), (1920, 1080));
        assert_eq!(config.axis_range, 0.65);
        assert_eq!(config.trace_color, [0, 255, 0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_frames_rejected() {
        let err = RenderConfig::new(0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let mut config = RenderConfig::new(10);
        config.fps = 0.0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::new(10);
        config.fps = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::new(10);
        config.height = 0;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::new(10);
        config.axis_range = -0.5;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::new(10);
        config.line_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_video_duration() {
        let mut config = RenderConfig::new(15);
        config.fps = 30.0;
        assert!((config.video_duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_duration_policy_display() {
        assert_eq!(DurationPolicy::Video.to_string(), "video");
        assert_eq!(DurationPolicy::Shortest.to_string(), "shortest");
        assert_eq!(DurationPolicy::Longest.to_string(), "longest");
    }
}
