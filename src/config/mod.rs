//! Configuration management for vectorscope.
//!
//! `RenderConfig` is the flat, validated value handed to the renderer and muxer
//! for a single run. `VectorscopeConfig` is its persisted form: a TOML file whose
//! every field has a documented default.

pub mod file;
pub mod render;

pub use file::{MuxConfig, TraceConfig, VectorscopeConfig, VideoConfig};
pub use render::{DurationPolicy, RenderConfig};
