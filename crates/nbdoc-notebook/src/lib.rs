//! # nbdoc-notebook
//!
//! Jupyter Notebook (.ipynb) parsing library for nbdoc.
//!
//! This crate decodes nbformat 4.x notebook containers into a typed model:
//! - Markdown cells (documentation)
//! - Code cells (with execution counts and outputs)
//! - Raw cells
//! - Cells of unknown type, kept as [`Cell::Unsupported`] so callers can count them
//! - Cell outputs (stream, display data, execute results, errors) with their
//!   MIME bundles
//! - Notebook metadata (title, description, kernel, language, authors)
//!
//! ## Example
//!
//! ```no_run
//! use nbdoc_notebook::parse_notebook;
//!
//! let notebook = parse_notebook("example.ipynb")?;
//! for cell in &notebook.cells {
//!     println!("Cell type: {:?}", cell.cell_type());
//!     println!("Source: {}", cell.source());
//! }
//! # Ok::<(), nbdoc_notebook::NotebookError>(())
//! ```

/// Error types for notebook parsing
pub mod error;
/// Jupyter notebook (ipynb) parser
pub mod ipynb;

pub use error::{NotebookError, Result};
pub use ipynb::{
    parse_notebook, parse_notebook_from_slice, parse_notebook_from_str, Cell, CellType, CodeCell,
    MimeBundle, Notebook, NotebookMetadata, Output, OutputType, TextCell,
};
