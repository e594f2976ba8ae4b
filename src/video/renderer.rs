//! Frame rasterization and video encoding.
//!
//! [`Renderer`] is the seam between the pipeline and any plotting/encoding
//! backend. [`FfmpegRenderer`] draws each frame with plotters into an RGB buffer
//! and streams it to an ffmpeg H.264 encoder over stdin.

use super::ffmpeg::{ffmpeg_command, locate_ffmpeg};
use crate::config::RenderConfig;
use crate::error::{Result, VectorscopeError};
use plotters::prelude::*;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Stdio};

/// Consumes per-frame XY point sequences and produces a silent video.
///
/// Calls arrive as `begin`, then `render_frame` for indices `0..total_frames`
/// in increasing order, then `finish`.
pub trait Renderer {
    /// Prepares to write a video of `config.total_frames` frames to `output`.
    fn begin(&mut self, config: &RenderConfig, output: &Path) -> Result<()>;

    /// Draws `xs` against `ys` as one connected polyline.
    fn render_frame(&mut self, index: usize, xs: &[f32], ys: &[f32]) -> Result<()>;

    /// Flushes and closes the video.
    fn finish(&mut self) -> Result<()>;
}

/// Maps data coordinates onto a centered square of the canvas.
///
/// Both axes cover `[-axis_range, axis_range]` with a 1:1 aspect ratio; y grows
/// upwards. The range edges land on the first and last pixel of the square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    left: f64,
    top: f64,
    side: f64,
    range: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, axis_range: f64) -> Self {
        let side = width.min(height) as f64;
        Self {
            left: (width as f64 - side) / 2.0,
            top: (height as f64 - side) / 2.0,
            side,
            range: axis_range,
        }
    }

    pub fn to_pixel(&self, x: f32, y: f32) -> (i32, i32) {
        let span = 2.0 * self.range;
        let extent = (self.side - 1.0).max(0.0);
        let px = self.left + (x as f64 + self.range) / span * extent;
        let py = self.top + (self.range - y as f64) / span * extent;
        (px.round() as i32, py.round() as i32)
    }
}

/// Draws one frame into an `rgb24` buffer of `width * height * 3` bytes.
///
/// The background is always filled; fewer than two points draw no trace.
pub fn draw_frame(
    buffer: &mut [u8],
    config: &RenderConfig,
    viewport: &Viewport,
    xs: &[f32],
    ys: &[f32],
) -> Result<()> {
    let expected = config.width as usize * config.height as usize * 3;
    if buffer.len() != expected {
        return Err(VectorscopeError::Render(format!(
            "frame buffer holds {} bytes, {}x{} rgb24 needs {expected}",
            buffer.len(),
            config.width,
            config.height
        )));
    }

    let [br, bg, bb] = config.background;
    let [tr, tg, tb] = config.trace_color;

    let root = BitMapBackend::with_buffer(buffer, (config.width, config.height)).into_drawing_area();
    root.fill(&RGBColor(br, bg, bb))?;

    let points: Vec<(i32, i32)> = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| viewport.to_pixel(x, y))
        .collect();

    if points.len() >= 2 {
        let style = RGBColor(tr, tg, tb).stroke_width(config.line_width);
        root.draw(&PathElement::new(points, style))?;
    }

    root.present()?;
    Ok(())
}

/// Encoder arguments for raw `rgb24` frames on stdin, before the output path.
pub fn encoder_args(config: &RenderConfig) -> Vec<String> {
    let fps = config.fps.to_string();
    vec![
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "-s".into(),
        format!("{}x{}", config.width, config.height),
        "-r".into(),
        fps.clone(),
        "-i".into(),
        "-".into(),
        "-an".into(),
        // yuv420p needs even dimensions
        "-vf".into(),
        "pad=ceil(iw/2)*2:ceil(ih/2)*2".into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-b:v".into(),
        format!("{}k", config.video_bitrate_kbps),
        "-r".into(),
        fps,
        "-metadata".into(),
        "artist=vectorscope".into(),
    ]
}

struct EncoderSession {
    child: Child,
    stdin: Option<ChildStdin>,
    config: RenderConfig,
    viewport: Viewport,
    frame: Vec<u8>,
    next_index: usize,
    progress_step: usize,
}

/// Renders with plotters and encodes with an ffmpeg subprocess.
pub struct FfmpegRenderer {
    ffmpeg_override: Option<PathBuf>,
    session: Option<EncoderSession>,
}

impl FfmpegRenderer {
    /// # Arguments
    /// * `ffmpeg_override` - Explicit ffmpeg binary; discovered when `None`
    pub fn new(ffmpeg_override: Option<PathBuf>) -> Self {
        Self {
            ffmpeg_override,
            session: None,
        }
    }

    /// Kills the encoder and builds an error that includes its stderr.
    fn abort(&mut self, reason: String) -> VectorscopeError {
        let Some(mut session) = self.session.take() else {
            return VectorscopeError::Render(reason);
        };
        drop(session.stdin.take());
        let _ = session.child.kill();

        let mut stderr = String::new();
        if let Some(mut pipe) = session.child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }
        let _ = session.child.wait();

        tracing::error!("Video encoding aborted: {reason}");
        if stderr.trim().is_empty() {
            VectorscopeError::Render(reason)
        } else {
            VectorscopeError::Render(format!("{reason}: {}", stderr.trim()))
        }
    }
}

impl Renderer for FfmpegRenderer {
    fn begin(&mut self, config: &RenderConfig, output: &Path) -> Result<()> {
        if self.session.is_some() {
            return Err(VectorscopeError::Render("renderer already started".into()));
        }
        config.validate()?;

        let ffmpeg = locate_ffmpeg(self.ffmpeg_override.as_deref())
            .map_err(|e| VectorscopeError::Render(e.to_string()))?;

        let mut cmd = ffmpeg_command(&ffmpeg);
        cmd.args(encoder_args(config))
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        tracing::debug!("Starting encoder: {:?}", cmd);
        let mut child = cmd
            .spawn()
            .map_err(|e| VectorscopeError::Render(format!("failed to start ffmpeg: {e}")))?;
        let stdin = child.stdin.take();

        let frame_bytes = config.width as usize * config.height as usize * 3;
        self.session = Some(EncoderSession {
            child,
            stdin,
            config: config.clone(),
            viewport: Viewport::new(config.width, config.height, config.axis_range),
            frame: vec![0u8; frame_bytes],
            next_index: 0,
            progress_step: (config.total_frames / 10).max(1),
        });

        tracing::info!(
            "Rendering {} frames at {}x{}, {} fps to {}",
            config.total_frames,
            config.width,
            config.height,
            config.fps,
            output.display()
        );
        Ok(())
    }

    fn render_frame(&mut self, index: usize, xs: &[f32], ys: &[f32]) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| VectorscopeError::Render("render_frame called before begin".into()))?;

        if index != session.next_index {
            return Err(VectorscopeError::Render(format!(
                "frame {index} out of order, expected {}",
                session.next_index
            )));
        }

        if let Err(e) = draw_frame(&mut session.frame, &session.config, &session.viewport, xs, ys)
        {
            return Err(self.abort(format!("failed to draw frame {index}: {e}")));
        }

        let written = match session.stdin.as_mut() {
            Some(stdin) => stdin.write_all(&session.frame),
            None => Ok(()),
        };
        if let Err(e) = written {
            return Err(self.abort(format!("failed to write frame {index} to encoder: {e}")));
        }

        session.next_index += 1;
        if session.next_index % session.progress_step == 0 {
            tracing::info!(
                "Rendered {}/{} frames",
                session.next_index,
                session.config.total_frames
            );
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| VectorscopeError::Render("finish called before begin".into()))?;

        if session.next_index != session.config.total_frames {
            let reason = format!(
                "only {} of {} frames rendered",
                session.next_index, session.config.total_frames
            );
            return Err(self.abort(reason));
        }

        let Some(session) = self.session.take() else {
            return Err(VectorscopeError::Render("finish called before begin".into()));
        };
        // Closing stdin signals end of stream to the encoder
        drop(session.stdin);

        let output = session
            .child
            .wait_with_output()
            .map_err(|e| VectorscopeError::Render(format!("failed to wait for ffmpeg: {e}")))?;

        if output.status.success() {
            tracing::debug!("Encoder finished after {} frames", session.next_index);
            Ok(())
        } else {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            tracing::error!("ffmpeg encoding failed: {}", error_msg.trim());
            Err(VectorscopeError::Render(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                error_msg.trim()
            )))
        }
    }
}

impl Drop for FfmpegRenderer {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            drop(session.stdin.take());
            let _ = session.child.kill();
            let _ = session.child.wait();
            tracing::warn!(
                "Encoder dropped after {} of {} frames",
                session.next_index,
                session.config.total_frames
            );
        }
    }
}
