//! Scoped temporary files for intermediate media.

use std::io;
use std::path::Path;
use tempfile::TempPath;

/// A temporary file that is removed when dropped, on every exit path.
///
/// Removal failures are logged as warnings and never propagated.
#[derive(Debug)]
pub struct TempArtifact {
    path: Option<TempPath>,
}

impl TempArtifact {
    /// Creates an empty file in the system temp directory with the given suffix
    /// (e.g. `".mp4"`), so tools that infer formats from extensions work.
    pub fn create(suffix: &str) -> io::Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("vectorscope_")
            .suffix(suffix)
            .tempfile()?
            .into_temp_path();
        tracing::debug!("Temporary file created: {}", path.display());
        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Removes the file now instead of waiting for drop.
    pub fn discard(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(path) = self.path.take() {
            let shown = path.display().to_string();
            match path.close() {
                Ok(()) => tracing::debug!("Temporary file removed: {shown}"),
                Err(e) => tracing::warn!("Failed to remove temporary file {shown}: {e}"),
            }
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        self.remove();
    }
}
