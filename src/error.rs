//! Error types for walking, rendering and exporting trees

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Any of these ends the run with a non-zero exit code.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    #[error("invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn pattern(pattern: impl Into<String>, message: impl ToString) -> Self {
        Error::Pattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}

/// Per-entry failure during a walk. Recovered locally: the walk goes on
/// with the siblings of the failing entry.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot read directory '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            WalkError::Unreadable { path, .. } => path,
        }
    }

    /// Short reason suitable for inline annotations.
    pub fn reason(&self) -> String {
        match self {
            WalkError::Unreadable { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => "permission denied".to_string(),
                io::ErrorKind::NotFound => "not found".to_string(),
                _ => source.to_string(),
            },
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
