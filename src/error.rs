//! Custom error types for edit-trail
//!
//! This module defines the error hierarchy for the change logger using
//! thiserror for ergonomic error definitions.

use std::path::Path;

use thiserror::Error;

/// The main error type for edit-trail operations
#[derive(Error, Debug)]
pub enum TrailError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic file I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// A file that was expected to exist is missing
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// The process lacks permission to access a file
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Key loading or encryption backend failures
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Unexpected internal state, e.g. a file vanishing mid-commit or a
    /// truncated envelope
    #[error("Consistency error: {0}")]
    Consistency(String),
}

impl TrailError {
    /// Classify an I/O error against the path it happened on
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io(format!("{}: {}", path, err)),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error belongs to the I/O family
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::NotFound { .. } | Self::PermissionDenied { .. }
        )
    }

    /// Check if this is a crypto error
    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto(_))
    }
}

impl From<serde_json::Error> for TrailError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for edit-trail operations
pub type TrailResult<T> = Result<T, TrailError>;
