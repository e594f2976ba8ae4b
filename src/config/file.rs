//! Configuration file management for vectorscope.
//!
//! Settings live in `~/.config/vectorscope/vectorscope.toml`. A missing file is
//! not an error: every field falls back to its default.

use super::render::{DurationPolicy, RenderConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output video settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoConfig {
    /// Frames per second
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// H.264 target bitrate in kbit/s
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,
    /// Explicit ffmpeg binary; discovered automatically when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
}

fn default_fps() -> f64 {
    30.0
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_bitrate_kbps() -> u32 {
    1800
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            bitrate_kbps: default_bitrate_kbps(),
            ffmpeg_path: None,
        }
    }
}

/// Trace appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceConfig {
    /// Both axes span `[-axis_range, axis_range]`
    #[serde(default = "default_axis_range")]
    pub axis_range: f64,
    /// RGB trace color (lime by default)
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Stroke width in pixels
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    /// RGB background color
    #[serde(default)]
    pub background: [u8; 3],
}

fn default_axis_range() -> f64 {
    0.65
}

fn default_color() -> [u8; 3] {
    [0, 255, 0]
}

fn default_line_width() -> u32 {
    1
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            axis_range: default_axis_range(),
            color: default_color(),
            line_width: default_line_width(),
            background: [0, 0, 0],
        }
    }
}

/// Muxing behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MuxConfig {
    /// "video", "shortest" or "longest"
    #[serde(default)]
    pub duration_policy: DurationPolicy,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VectorscopeConfig {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub mux: MuxConfig,
}

impl VectorscopeConfig {
    /// Loads configuration from the user's config directory, or defaults if absent.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - If the file exists but cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", path.display()))?;
        let config: VectorscopeConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Malformed config {}: {e}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Writes configuration as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Builds the validated per-run settings for an animation of `total_frames` frames.
    ///
    /// # Errors
    /// Returns a `Config` error if any resulting field is out of range.
    pub fn render_config(&self, total_frames: usize) -> Result<RenderConfig> {
        let config = RenderConfig {
            fps: self.video.fps,
            total_frames,
            width: self.video.width,
            height: self.video.height,
            axis_range: self.trace.axis_range,
            trace_color: self.trace.color,
            line_width: self.trace.line_width,
            background: self.trace.background,
            video_bitrate_kbps: self.video.bitrate_kbps,
            duration_policy: self.mux.duration_policy,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Path of the user's config file: `~/.config/vectorscope/vectorscope.toml`.
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home
        .join(".config")
        .join("vectorscope")
        .join("vectorscope.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: VectorscopeConfig = toml::from_str("").unwrap();
        assert_eq!(config, VectorscopeConfig::default());
        assert_eq!(config.video.fps, 30.0);
        assert_eq!(config.trace.axis_range, 0.65);
        assert_eq!(config.mux.duration_policy, DurationPolicy::Video);
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config: VectorscopeConfig = toml::from_str(
            r#"
            [video]
            fps = 60.0
            width = 1280

            [trace]
            color = [255, 0, 255]

            [mux]
            duration_policy = "shortest"
            "#,
        )
        .unwrap();

        assert_eq!(config.video.fps, 60.0);
        assert_eq!(config.video.width, 1280);
        assert_eq!(config.video.height, 1080);
        assert_eq!(config.trace.color, [255, 0, 255]);
        assert_eq!(config.trace.line_width, 1);
        assert_eq!(config.mux.duration_policy, DurationPolicy::Shortest);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: std::result::Result<VectorscopeConfig, _> =
            toml::from_str("[mux]\nduration_policy = \"pad\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vectorscope.toml");

        let mut config = VectorscopeConfig::default();
        config.video.ffmpeg_path = Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        config.mux.duration_policy = DurationPolicy::Longest;
        config.save_to(&path).unwrap();

        let loaded = VectorscopeConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_render_config_carries_fields() {
        let mut config = VectorscopeConfig::default();
        config.video.fps = 24.0;
        config.trace.line_width = 3;

        let render = config.render_config(48).unwrap();
        assert_eq!(render.fps, 24.0);
        assert_eq!(render.total_frames, 48);
        assert_eq!(render.line_width, 3);
        assert_eq!(render.video_bitrate_kbps, 1800);
    }

    #[test]
    fn test_render_config_rejects_zero_frames() {
        assert!(VectorscopeConfig::default().render_config(0).is_err());
    }
}
