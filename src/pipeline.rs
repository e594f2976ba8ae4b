//! End-to-end orchestration: load, synthesize, render, mux.
//!
//! The run is strictly sequential. Every frame is rendered before muxing
//! starts, and the intermediate silent video is removed on every exit path.

use crate::config::{RenderConfig, VectorscopeConfig};
use crate::error::{Result, VectorscopeError};
use crate::signal::{load_waveform, DerivedChannelPair, FrameSampler};
use crate::video::{FfmpegMuxer, FfmpegRenderer, Muxer, Renderer, TempArtifact};
use std::path::{Path, PathBuf};

/// Input and output files for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Audio that drives the trace geometry
    pub vectorscope_audio: PathBuf,
    /// Audio that becomes the output's sound (may be the same file)
    pub soundtrack_audio: PathBuf,
    /// Destination video, overwritten if present
    pub output: PathBuf,
    /// Seconds of animation; the vectorscope audio's length when `None`
    pub duration: Option<f64>,
}

impl RenderRequest {
    pub fn new(
        vectorscope_audio: impl Into<PathBuf>,
        soundtrack_audio: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            vectorscope_audio: vectorscope_audio.into(),
            soundtrack_audio: soundtrack_audio.into(),
            output: output.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }
}

/// Renders a vectorscope video of `vectorscope_audio` with `soundtrack_audio` as its sound.
///
/// Uses the default trace style (lime on black, axes at ±0.65) and an
/// automatically located ffmpeg. Output is H.264 video with AAC audio.
///
/// # Errors
/// - `Load` if the vectorscope audio is missing, unreadable, or empty
/// - `Config` for non-positive fps, duration, or canvas size, or zero frames
/// - `Render` if plotting or encoding fails
/// - `Mux` if the soundtrack is unreadable or the output cannot be written
pub fn render_vectorscope(
    vectorscope_audio: &Path,
    soundtrack_audio: &Path,
    output_video: &Path,
    fps: f64,
    duration: Option<f64>,
    width: u32,
    height: u32,
) -> Result<()> {
    let mut config = VectorscopeConfig::default();
    config.video.fps = fps;
    config.video.width = width;
    config.video.height = height;

    let mut request = RenderRequest::new(vectorscope_audio, soundtrack_audio, output_video);
    request.duration = duration;

    render_with_config(&request, &config)
}

/// Renders `request` with ffmpeg-backed renderer and muxer configured by `config`.
pub fn render_with_config(request: &RenderRequest, config: &VectorscopeConfig) -> Result<()> {
    let ffmpeg = config.video.ffmpeg_path.clone();
    let mut renderer = FfmpegRenderer::new(ffmpeg.clone());
    let muxer = FfmpegMuxer::new(ffmpeg);
    render_vectorscope_with(request, config, &mut renderer, &muxer)
}

/// Runs the pipeline against injected rendering and muxing backends.
pub fn render_vectorscope_with(
    request: &RenderRequest,
    config: &VectorscopeConfig,
    renderer: &mut dyn Renderer,
    muxer: &dyn Muxer,
) -> Result<()> {
    tracing::info!(
        "Rendering vectorscope of {} into {}",
        request.vectorscope_audio.display(),
        request.output.display()
    );

    check_timing(config.video.fps, request.duration)?;

    let waveform = load_waveform(
        &request.vectorscope_audio,
        config.video.ffmpeg_path.as_deref(),
    )?;
    let pair = DerivedChannelPair::synthesize(&waveform);

    let sampler = FrameSampler::new(waveform.sample_rate(), config.video.fps)?;
    let total_frames = sampler.total_frames(waveform.len(), request.duration);
    if total_frames == 0 {
        return Err(VectorscopeError::Config(format!(
            "{:.3}s of audio at {} fps yields no frames",
            waveform.duration_secs(),
            config.video.fps
        )));
    }
    let render_config = config.render_config(total_frames)?;

    if let Some(secs) = request.duration {
        if secs > waveform.duration_secs() {
            tracing::warn!(
                "Requested {secs}s exceeds the {:.2}s signal; trailing frames will be empty",
                waveform.duration_secs()
            );
        }
    }

    let silent_video = TempArtifact::create(".mp4").map_err(|e| {
        VectorscopeError::Render(format!("cannot create temporary video: {e}"))
    })?;

    render_frames(renderer, &render_config, &sampler, &pair, silent_video.path())?;

    muxer.mux(
        silent_video.path(),
        &request.soundtrack_audio,
        &request.output,
        &render_config,
    )?;

    silent_video.discard();
    tracing::info!("Vectorscope complete: {}", request.output.display());
    Ok(())
}

fn check_timing(fps: f64, duration: Option<f64>) -> Result<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(VectorscopeError::Config(format!(
            "fps must be a positive number, got {fps}"
        )));
    }
    if let Some(secs) = duration {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(VectorscopeError::Config(format!(
                "duration must be a positive number of seconds, got {secs}"
            )));
        }
    }
    Ok(())
}

fn render_frames(
    renderer: &mut dyn Renderer,
    config: &RenderConfig,
    sampler: &FrameSampler,
    pair: &DerivedChannelPair,
    output: &Path,
) -> Result<()> {
    renderer.begin(config, output)?;
    for index in 0..config.total_frames {
        let (xs, ys) = sampler.slice(pair, index);
        renderer.render_frame(index, xs, ys)?;
    }
    renderer.finish()
}
