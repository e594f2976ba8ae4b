//! Oscilloscope-style vectorscope videos from audio.
//!
//! A mono signal is turned into an XY trace (the signal against its
//! phase-shifted, time-lagged Hilbert transform), sliced into one window per
//! video frame, drawn as a polyline, encoded to H.264, and muxed with an
//! independent soundtrack as AAC.
//!
//! ```no_run
//! use std::path::Path;
//!
//! vectorscope::render_vectorscope(
//!     Path::new("audio.mp3"),
//!     Path::new("audio.mp3"),
//!     Path::new("vectorscope.mp4"),
//!     30.0,
//!     None,
//!     1920,
//!     1080,
//! )?;
//! # Ok::<(), vectorscope::VectorscopeError>(())
//! ```
//!
//! External requirements: an `ffmpeg` binary with libx264 and AAC support.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod signal;
pub mod video;

pub use config::{DurationPolicy, RenderConfig, VectorscopeConfig};
pub use error::{ErrorKind, Result, VectorscopeError};
pub use pipeline::{render_vectorscope, render_vectorscope_with, render_with_config, RenderRequest};
pub use signal::{DerivedChannelPair, FrameSampler, FrameWindow, Waveform};
