//! FFmpeg locator and invocation helpers.
//!
//! Checks standard installation locations before falling back to a PATH search,
//! so ffmpeg is found even when the calling environment has a minimal PATH.

use anyhow::{anyhow, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Locates the ffmpeg binary.
///
/// Checks in this order:
/// 1. `explicit`, if given (must exist)
/// 2. Platform install locations (Homebrew, `/usr/bin`, `C:\ffmpeg\bin`, ...)
/// 3. PATH via `which` or `where`
pub fn locate_ffmpeg(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            tracing::debug!("Using configured ffmpeg at: {}", path.display());
            return Ok(path.to_path_buf());
        }
        return Err(anyhow!(
            "Configured ffmpeg binary does not exist: {}",
            path.display()
        ));
    }

    let candidates = if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/opt/homebrew/bin/ffmpeg"), // Apple Silicon Homebrew
            PathBuf::from("/usr/local/bin/ffmpeg"),
            PathBuf::from("/usr/bin/ffmpeg"),
        ]
    } else if cfg!(target_os = "linux") {
        vec![
            PathBuf::from("/usr/bin/ffmpeg"),
            PathBuf::from("/usr/local/bin/ffmpeg"),
            PathBuf::from("/snap/bin/ffmpeg"),
        ]
    } else if cfg!(target_os = "windows") {
        vec![
            PathBuf::from("C:\\ffmpeg\\bin\\ffmpeg.exe"),
            PathBuf::from("C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe"),
            PathBuf::from("C:\\Program Files (x86)\\ffmpeg\\bin\\ffmpeg.exe"),
        ]
    } else {
        vec![]
    };

    if let Some(path) = candidates.into_iter().find(|p| p.exists()) {
        tracing::debug!("Found ffmpeg at: {}", path.display());
        return Ok(path);
    }

    let ffmpeg_path = find_in_path("ffmpeg")?;
    tracing::debug!("Found ffmpeg in PATH at: {}", ffmpeg_path.display());
    Ok(ffmpeg_path)
}

/// Searches for a binary in the system PATH using `which` or `where`.
fn find_in_path(binary_name: &str) -> Result<PathBuf> {
    let search_cmd = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };

    let output = Command::new(search_cmd)
        .arg(binary_name)
        .output()
        .map_err(|e| anyhow!("Failed to search PATH for {binary_name}: {e}"))?;

    if output.status.success() {
        let path_str = String::from_utf8_lossy(&output.stdout);
        // `where` may list several matches, one per line
        let first = path_str.lines().next().unwrap_or("").trim();
        if !first.is_empty() {
            return Ok(PathBuf::from(first));
        }
    }

    Err(anyhow!(
        "ffmpeg not found. Please install ffmpeg:\n\
         macOS: brew install ffmpeg\n\
         Linux: apt install ffmpeg (Debian/Ubuntu) or dnf install ffmpeg (Fedora)\n\
         Windows: Download from https://ffmpeg.org/download.html"
    ))
}

/// Starts an ffmpeg command that only reports errors and overwrites its output.
pub fn ffmpeg_command(ffmpeg: &Path) -> Command {
    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y");
    cmd
}

/// Runs ffmpeg to completion with `args`, returning its stderr on failure.
pub fn run_ffmpeg<S: AsRef<OsStr>>(ffmpeg: &Path, args: &[S]) -> Result<()> {
    let mut cmd = ffmpeg_command(ffmpeg);
    cmd.arg("-nostdin").args(args);

    tracing::debug!("Running {:?}", cmd);
    let output = cmd
        .output()
        .map_err(|e| anyhow!("Failed to start {}: {e}", ffmpeg.display()))?;

    if output.status.success() {
        Ok(())
    } else {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        tracing::error!("ffmpeg failed ({}): {}", output.status, error_msg.trim());
        Err(anyhow!("ffmpeg exited with {}: {}", output.status, error_msg.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_ffmpeg() {
        // Succeeds only where ffmpeg is installed
        match locate_ffmpeg(None) {
            Ok(path) => println!("Found ffmpeg at: {}", path.display()),
            Err(e) => println!("ffmpeg not found (expected on CI): {e}"),
        }
    }

    #[test]
    fn test_explicit_missing_binary_is_error() {
        let err = locate_ffmpeg(Some(Path::new("/nonexistent/bin/ffmpeg"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_explicit_existing_binary_is_used() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = locate_ffmpeg(Some(file.path())).unwrap();
        assert_eq!(found, file.path());
    }

    #[test]
    fn test_command_is_quiet_and_overwrites() {
        let cmd = ffmpeg_command(Path::new("ffmpeg"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["-hide_banner", "-loglevel", "error", "-y"]);
    }
}
