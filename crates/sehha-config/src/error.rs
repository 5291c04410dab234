//! Error types for preference operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for preference operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the preference file failed.
    #[error("preference file operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File involved in the operation.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Preference file content was not a JSON object of strings.
    #[error("invalid preference file")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for preference results.
pub type ConfigResult<T> = Result<T, ConfigError>;
