//! Crate-wide error type.
//!
//! Core routines (noise, metrics, quad-tree) only ever return
//! `InvalidArgument` or `ShapeMismatch`; the remaining variants come from the
//! I/O and configuration collaborators.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A parameter or input violated a documented precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two images that must share a shape do not.
    #[error("shape mismatch: expected {expected:?} (w, h), got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
