//! Combining the silent video with a soundtrack.

use super::ffmpeg::{locate_ffmpeg, run_ffmpeg};
use crate::config::{DurationPolicy, RenderConfig};
use crate::error::{Result, VectorscopeError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Produces the final deliverable from a silent video and a soundtrack.
pub trait Muxer {
    /// Writes `output` with `video`'s stream untouched and `soundtrack` as its
    /// audio, overwriting any existing file.
    fn mux(
        &self,
        video: &Path,
        soundtrack: &Path,
        output: &Path,
        config: &RenderConfig,
    ) -> Result<()>;
}

/// Muxes with ffmpeg: video stream copied, audio encoded as AAC.
pub struct FfmpegMuxer {
    ffmpeg_override: Option<PathBuf>,
}

impl FfmpegMuxer {
    pub fn new(ffmpeg_override: Option<PathBuf>) -> Self {
        Self { ffmpeg_override }
    }
}

/// ffmpeg arguments for one mux run.
///
/// Only the first video stream of `video` and the first audio stream of
/// `soundtrack` are mapped. Output length follows `config.duration_policy`.
pub fn mux_args(video: &Path, soundtrack: &Path, output: &Path, config: &RenderConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-i".into(),
        video.into(),
        "-i".into(),
        soundtrack.into(),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
    ];

    match config.duration_policy {
        DurationPolicy::Video => {
            args.push("-t".into());
            args.push(format!("{:.6}", config.video_duration_secs()).into());
        }
        DurationPolicy::Shortest => args.push("-shortest".into()),
        DurationPolicy::Longest => {}
    }

    args.push(output.into());
    args
}

impl Muxer for FfmpegMuxer {
    fn mux(
        &self,
        video: &Path,
        soundtrack: &Path,
        output: &Path,
        config: &RenderConfig,
    ) -> Result<()> {
        if !soundtrack.exists() {
            return Err(VectorscopeError::Mux(format!(
                "soundtrack not found: {}",
                soundtrack.display()
            )));
        }

        let ffmpeg = locate_ffmpeg(self.ffmpeg_override.as_deref())
            .map_err(|e| VectorscopeError::Mux(e.to_string()))?;

        tracing::info!(
            "Muxing {} with soundtrack {} (duration policy: {})",
            video.display(),
            soundtrack.display(),
            config.duration_policy
        );

        run_ffmpeg(&ffmpeg, &mux_args(video, soundtrack, output, config))
            .map_err(|e| VectorscopeError::Mux(e.to_string()))?;

        tracing::info!("Video saved: {}", output.display());
        Ok(())
    }
}
