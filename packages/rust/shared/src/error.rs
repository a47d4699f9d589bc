//! Error types for fairsync.
//!
//! Library crates use [`FairSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all fairsync operations.
#[derive(Debug, thiserror::Error)]
pub enum FairSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed record source (CSV structure, missing columns).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error, tagged with the operation that failed.
    #[error("failed to {op} {path:?}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid option values (empty extension set, zero threshold, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FairSyncError>;

impl FairSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with the operation and path for context.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = FairSyncError::config("unknown field `medai`");
        assert_eq!(err.to_string(), "config error: unknown field `medai`");

        let err = FairSyncError::validation("split_threshold must be positive");
        assert!(err.to_string().contains("split_threshold"));
    }

    #[test]
    fn io_error_names_operation_and_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FairSyncError::io("write", "site/fairs.html", source);
        let msg = err.to_string();
        assert!(msg.starts_with("failed to write"));
        assert!(msg.contains("site/fairs.html"));
        assert!(msg.contains("denied"));
    }
}
