//! Input and output format types
//!
//! [`InputFormat`] says what a source file is; [`Dialect`] says which markup
//! flavour the rendered page targets.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Jupyter notebook (.ipynb)
    Notebook,
    /// Markdown or MDX page (.md, .markdown, .mdx)
    Markdown,
}

impl InputFormat {
    /// Detect format from a file extension (without the dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ipynb" => Some(Self::Notebook),
            "md" | "markdown" | "mdx" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// File extensions for this format
    #[inline]
    #[must_use = "returns the file extensions for this format"]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Notebook => &["ipynb"],
            Self::Markdown => &["md", "markdown", "mdx"],
        }
    }
}

impl std::fmt::Display for InputFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Notebook => "notebook",
            Self::Markdown => "markdown",
        };
        write!(f, "{s}")
    }
}

/// Target markup dialect
///
/// MDX treats `{`/`}` as expression delimiters and `<` as JSX, so it needs
/// the full escaping treatment; plain Markdown only needs tag hygiene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MDX (Docusaurus and friends)
    #[default]
    Mdx,
    /// CommonMark-style Markdown
    Markdown,
}

impl Dialect {
    /// Extension of rendered files
    #[inline]
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mdx => "mdx",
            Self::Markdown => "md",
        }
    }

    /// Wrap `text` in this dialect's comment syntax
    #[must_use]
    pub fn comment(self, text: &str) -> String {
        match self {
            Self::Mdx => format!("{{/* {} */}}", text.replace("*/", "* /")),
            Self::Markdown => format!("<!-- {} -->", text.replace("--", "- -")),
        }
    }
}

impl std::fmt::Display for Dialect {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mdx => "mdx",
            Self::Markdown => "markdown",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mdx" => Ok(Self::Mdx),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(format!("Unknown dialect '{s}'. Expected: mdx, markdown")),
        }
    }
}
