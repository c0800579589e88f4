use std::path::PathBuf;

use thiserror::Error;

use crate::version::ReleaseType;

/// Unified error type for expo-version operations
#[derive(Error, Debug)]
pub enum ExpoVersionError {
    #[error("{} not found. Make sure you are in an Expo project directory.", .0.display())]
    NotFound(PathBuf),

    #[error("{} contains invalid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must contain {field} field.", .path.display())]
    Schema { path: PathBuf, field: &'static str },

    #[error("Failed to increment version {version} with type {release}: {reason}")]
    VersionComputation {
        version: String,
        release: ReleaseType,
        reason: String,
    },

    #[error("Invalid version format: {0}. Please use semver format (e.g., 1.0.0)")]
    Validation(String),

    #[error("Git {operation} failed: {source}")]
    VcsOperation {
        operation: &'static str,
        #[source]
        source: git2::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in expo-version
pub type Result<T> = std::result::Result<T, ExpoVersionError>;

impl ExpoVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ExpoVersionError::Config(msg.into())
    }

    /// Wrap a git2 failure for the named operation.
    ///
    /// Returned as a closure so it slots into `map_err`.
    pub fn vcs(operation: &'static str) -> impl FnOnce(git2::Error) -> Self {
        move |source| ExpoVersionError::VcsOperation { operation, source }
    }
}
