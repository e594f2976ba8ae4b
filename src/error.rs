//! Error taxonomy for the vectorscope pipeline.
//!
//! Every failure surfaces as one of four kinds so callers can tell bad input
//! (`Load`, `Config`) apart from a broken environment (`Render`, `Mux`).

use thiserror::Error;

/// Errors returned by the vectorscope pipeline.
#[derive(Debug, Error)]
pub enum VectorscopeError {
    /// Source audio is missing, unreadable, or empty.
    #[error("failed to load audio: {0}")]
    Load(String),
    /// Invalid fps, duration, canvas, or a computed frame count of zero.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Plotting or video encoding backend failure.
    #[error("rendering failed: {0}")]
    Render(String),
    /// Soundtrack unreadable or container/codec write failure.
    #[error("muxing failed: {0}")]
    Mux(String),
}

/// Discriminant of a [`VectorscopeError`], for matching without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    Config,
    Render,
    Mux,
}

impl ErrorKind {
    /// True for failures caused by the caller's inputs rather than the environment.
    pub fn is_input_error(self) -> bool {
        matches!(self, Self::Load | Self::Config)
    }
}

impl VectorscopeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(_) => ErrorKind::Load,
            Self::Config(_) => ErrorKind::Config,
            Self::Render(_) => ErrorKind::Render,
            Self::Mux(_) => ErrorKind::Mux,
        }
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for VectorscopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        VectorscopeError::Render(format!("{value:?}"))
    }
}

pub type Result<T> = std::result::Result<T, VectorscopeError>;
