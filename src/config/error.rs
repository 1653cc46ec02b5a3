use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid reference '{}': {reason}", path.display())]
    Reference { path: PathBuf, reason: String },

    #[error("Resource '{0}' is defined more than once")]
    DuplicateResource(String),

    #[error("Route '{0}' is claimed by more than one resource")]
    DuplicateRoute(String),

    #[error("Invalid route for resource '{resource}': {reason}")]
    InvalidRoute { resource: String, reason: String },

    #[error("Options documentation '{0}' must be an object or an array")]
    InvalidDocumentation(String),

    #[error("Failed to get current directory: {0}")]
    CurrentDir(std::io::Error),
}
