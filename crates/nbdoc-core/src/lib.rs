//! # nbdoc Core - Notebook to MDX Conversion Library
//!
//! nbdoc turns Jupyter notebooks into documentation pages that a strict MDX
//! compiler (Docusaurus) accepts without errors, or into plain Markdown.
//!
//! ## Quick Start
//!
//! ```rust
//! use nbdoc_core::{NotebookConverter, Result};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let notebook = br##"{
//!         "nbformat": 4,
//!         "nbformat_minor": 5,
//!         "metadata": {},
//!         "cells": [
//!             {"cell_type": "markdown", "source": "# Demo\nUse {name} here"},
//!             {"cell_type": "code", "source": "d = {}", "outputs": []}
//!         ]
//!     }"##;
//!
//!     let converter = NotebookConverter::new();
//!     let document = converter.convert_bytes(notebook, Path::new("demo.mdx"))?;
//!
//!     assert_eq!(document.title, "Demo");
//!     assert!(document.content.contains("Use \\{name\\} here"));
//!     assert!(document.content.contains("```python\nd = {}\n```"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structural sanitizer**: escapes braces and stray angle brackets in
//!   prose, replaces `data:` images, converts HTML comments, drops tags
//!   without a partner and truncates very long lines. Code is never touched
//!   and the pass is idempotent.
//! - **Frontmatter**: title and description derived from notebook metadata,
//!   headings, prose or the file name; always valid YAML.
//! - **Outputs**: stream, result, display and error outputs as fenced
//!   blocks; images become placeholders instead of inline payloads.
//! - **Diagnostics**: line-numbered report of everything the sanitizer
//!   would change.
//! - **API stubs**: reference pages generated from a static TOML manifest.
//!
//! ## Module Organization
//!
//! - [`convert`] - Converter entry points and options
//! - [`render`] - Cell and output rendering
//! - [`sanitize`] - Structural-markup safety pass
//! - [`diagnose`] - Line-numbered findings
//! - [`metadata`] - Title and description extraction
//! - [`frontmatter`] - YAML page headers
//! - [`apidoc`] - API reference stubs
//! - [`mod@format`] - Input formats and output dialects
//! - [`error`] - Error types and handling
//!
//! ## Error Handling
//!
//! Conversion returns [`Result<T, ConvertError>`](error::ConvertError).
//! Sanitizing and rendering are total; only reading and decoding input can
//! fail:
//!
//! ```rust
//! use nbdoc_core::{ConvertError, NotebookConverter};
//! use std::path::Path;
//!
//! let converter = NotebookConverter::new();
//! let err = converter
//!     .convert_bytes(br#"{"cells": 3}"#, Path::new("broken.mdx"))
//!     .unwrap_err();
//! assert!(matches!(err, ConvertError::Notebook(_)));
//! ```

pub mod apidoc;
pub mod convert;
pub mod diagnose;
pub mod error;
pub mod format;
pub mod frontmatter;
pub mod metadata;
pub mod render;
pub mod sanitize;
pub mod text;

// Re-exports for convenience
pub use apidoc::{generate, generate_with, ApiManifest, GeneratedPage};
pub use convert::{output_path, ConvertOptions, NotebookConverter, RenderedDocument};
pub use diagnose::{diagnose, diagnose_with, Diagnostic, DiagnosticKind};
pub use error::{ConvertError, Result};
pub use format::{Dialect, InputFormat};
pub use frontmatter::{add_frontmatter, header_string, parse_header, split_frontmatter, Frontmatter};
pub use metadata::{extract_description, extract_title, DescriptionOptions};
pub use nbdoc_notebook::{parse_notebook, Notebook};
pub use render::{render_body, ConversionStats};
pub use sanitize::{sanitize, SanitizeOptions, SanitizeReport, Sanitizer};
