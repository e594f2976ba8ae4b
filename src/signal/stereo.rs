//! Synthetic stereo pair for the XY trace.
//!
//! The X trace is the mono signal itself. The Y trace is its Hilbert transform
//! (the signal phase-shifted by 90 degrees) rotated circularly by a twentieth of
//! a second, which decorrelates the axes enough to look like a real stereo image.

use super::waveform::Waveform;
use rustfft::{num_complex::Complex, FftPlanner};

/// Two equal-length traces derived from one waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedChannelPair {
    trace_x: Vec<f32>,
    trace_y: Vec<f32>,
    sample_rate: u32,
}

impl DerivedChannelPair {
    /// Derives both traces from `waveform` in a single pass over the whole signal.
    ///
    /// For a one-sample waveform the Hilbert transform is identically zero, so
    /// `trace_y` is `[0.0]`.
    pub fn synthesize(waveform: &Waveform) -> Self {
        let trace_x = waveform.samples().to_vec();
        let lag = lag_samples(waveform.sample_rate());
        let trace_y = circular_shift(&hilbert_imag(waveform.samples()), lag);

        tracing::debug!(
            "Synthesized trace pair: {} samples, Y lag {} samples",
            trace_x.len(),
            lag
        );

        Self {
            trace_x,
            trace_y,
            sample_rate: waveform.sample_rate(),
        }
    }

    pub fn trace_x(&self) -> &[f32] {
        &self.trace_x
    }

    pub fn trace_y(&self) -> &[f32] {
        &self.trace_y
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.trace_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace_x.is_empty()
    }
}

/// Circular lag applied to the Y trace: `sample_rate / 20`, truncated.
pub fn lag_samples(sample_rate: u32) -> usize {
    (sample_rate / 20) as usize
}

/// Imaginary part of the analytic signal of `samples`.
///
/// Computed with one FFT over the full length (no padding): positive
/// frequencies are doubled, negative ones zeroed, DC and (for even lengths)
/// Nyquist kept, then inverse transformed. Edge effects are left as they are.
pub fn hilbert_imag(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();

    planner.plan_fft_forward(n).process(&mut buffer);

    let nyquist = if n % 2 == 0 { Some(n / 2) } else { None };
    let positive_end = (n + 1) / 2;
    for (k, bin) in buffer.iter_mut().enumerate() {
        let weight = if k == 0 || Some(k) == nyquist {
            1.0
        } else if k < positive_end {
            2.0
        } else {
            0.0
        };
        *bin = bin.scale(weight);
    }

    planner.plan_fft_inverse(n).process(&mut buffer);

    // rustfft leaves the inverse unnormalized
    let norm = 1.0 / n as f64;
    buffer.iter().map(|c| (c.im * norm) as f32).collect()
}

/// Rotates `samples` right by `shift`: the last `shift` samples wrap to the front.
pub fn circular_shift(samples: &[f32], shift: usize) -> Vec<f32> {
    let mut shifted = samples.to_vec();
    if !shifted.is_empty() {
        let len = shifted.len();
        shifted.rotate_right(shift % len);
    }
    shifted
}
