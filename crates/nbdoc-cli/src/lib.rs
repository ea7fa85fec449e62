//! Command-line interface for nbdoc notebook conversion
//!
//! This crate provides the `nbdoc` command-line tool, which turns Jupyter
//! notebooks into Docusaurus MDX (or plain Markdown) pages and repairs
//! existing pages that a strict MDX compiler rejects.
//!
//! # Quick Start
//!
//! ```bash
//! # Convert one notebook next to itself (intro.ipynb → intro.mdx)
//! nbdoc convert intro.ipynb
//!
//! # Convert a folder of notebooks into the docs tree
//! nbdoc batch notebooks/ -o docs/notebooks
//!
//! # Repair pages in place (keeps .backup copies)
//! nbdoc fix docs/**/*.mdx
//!
//! # Report problems without changing anything
//! nbdoc check docs/**/*.mdx
//! ```
//!
//! # Commands
//!
//! - `convert` - one notebook or Markdown file; `-` reads notebook JSON from stdin
//! - `batch` - many inputs, in parallel, with a summary
//! - `fix` - sanitize existing pages in place
//! - `frontmatter` - add a frontmatter block to pages that lack one
//! - `check` - line-numbered report of MDX problems
//! - `info` - title, description and cell counts of a notebook
//! - `apidoc` - API reference stubs from a TOML manifest
//! - `completion` - shell completion scripts
//! - `config` - create and inspect `.nbdoc.toml`
//!
//! # Configuration
//!
//! 1. **Project config**: `.nbdoc.toml` in the current directory
//! 2. **User config**: `~/.nbdoc.toml`
//! 3. **Command-line flags**: override any config setting
//!
//! ```toml
//! [convert]
//! dialect = "mdx"
//! output_dir = "docs/notebooks"
//!
//! [batch]
//! fail_fast = true
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `env_logger`. `-v` enables debug
//! output, `-q` limits it to errors, and `RUST_LOG` overrides both.

pub mod config;
pub mod output;

pub use config::{Config, CONFIG_FILE_NAME};
pub use output::{backup_path, check_destination, expand_glob_patterns, write_output, SkipReason};
