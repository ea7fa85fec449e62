//! Error types for document conversion operations.
//!
//! Conversion of a single document either succeeds or fails with one of
//! these errors. Sanitization never fails; it is not represented here.

use thiserror::Error;

/// Error types that can occur during document conversion.
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::{ConvertError, NotebookConverter};
/// use std::path::Path;
///
/// let converter = NotebookConverter::new();
/// match converter.convert_bytes(b"not a notebook", Path::new("out.mdx")) {
///     Ok(doc) => println!("{}", doc.content),
///     Err(ConvertError::Notebook(e)) => eprintln!("Bad notebook: {e}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The notebook could not be read or decoded.
    ///
    /// Wraps [`nbdoc_notebook::NotebookError`], including the
    /// `MalformedInput` case for containers that are not valid notebooks.
    #[error("{0}")]
    Notebook(#[from] nbdoc_notebook::NotebookError),

    /// I/O error while reading an input document.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// An API reference manifest could not be decoded.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// The input file extension is not one nbdoc converts.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl From<toml::de::Error> for ConvertError {
    fn from(err: toml::de::Error) -> Self {
        Self::Manifest(err.to_string())
    }
}

/// Result type alias for conversion operations.
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::Result;
///
/// fn title_of(text: &str) -> Result<String> {
///     Ok(text.lines().next().unwrap_or_default().to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvertError>;
