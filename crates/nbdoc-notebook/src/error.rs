//! Error types for Jupyter notebook parsing

use thiserror::Error;

/// Error type for notebook parsing operations
#[derive(Error, Debug)]
pub enum NotebookError {
    /// I/O error when reading notebook file
    #[error("Failed to read notebook file: {0}")]
    IoError(#[from] std::io::Error),

    /// The notebook container could not be decoded
    #[error("Malformed notebook: {0}")]
    MalformedInput(String),

    /// Notebook version not supported
    #[error("Unsupported notebook version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version number
        major: u32,
        /// Minor version number
        minor: u32,
    },
}

impl From<serde_json::Error> for NotebookError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

/// Result type alias for notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;
