//! Signal-to-geometry transform.
//!
//! Turns an audio file into a mono [`Waveform`], derives the X/Y trace pair from
//! it, and slices that pair into per-frame windows. Nothing here depends on a
//! rendering or encoding backend.

pub mod frames;
pub mod stereo;
pub mod waveform;

pub use frames::{FrameSampler, FrameWindow};
pub use stereo::{circular_shift, hilbert_imag, lag_samples, DerivedChannelPair};
pub use waveform::{downmix_to_mono, load_waveform, read_wav, Waveform};
