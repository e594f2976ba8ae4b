//! Rendering and muxing backends.
//!
//! Both are reached only through the [`Renderer`] and [`Muxer`] traits, so the
//! signal transform never depends on ffmpeg or plotters.

pub mod ffmpeg;
pub mod mux;
pub mod renderer;
pub mod temp;

pub use ffmpeg::locate_ffmpeg;
pub use mux::{FfmpegMuxer, Muxer};
pub use renderer::{FfmpegRenderer, Renderer, Viewport};
pub use temp::TempArtifact;
