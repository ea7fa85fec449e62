//! Notebook and Markdown conversion into documentation pages.

use crate::error::{ConvertError, Result};
use crate::format::{Dialect, InputFormat};
use crate::frontmatter::{header_string, parse_header, split_frontmatter, Frontmatter};
use crate::metadata::{extract_description, extract_title, DescriptionOptions};
use crate::render::{render_body, ConversionStats};
use crate::sanitize::{SanitizeOptions, SanitizeReport, Sanitizer, DEFAULT_MAX_LINE_CHARS};
use crate::text::slugify;
use log::debug;
use nbdoc_notebook::{parse_notebook_from_slice, Notebook};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Stem used when an input name has nothing left after slugifying
const FALLBACK_STEM: &str = "document";

/// Conversion settings
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::{ConvertOptions, Dialect};
///
/// let options = ConvertOptions {
///     dialect: Dialect::Markdown,
///     sidebar_position: Some(2),
///     ..Default::default()
/// };
/// assert_eq!(options.default_language, "python");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Output markup dialect
    pub dialect: Dialect,
    /// Code fence language when the notebook does not declare one
    pub default_language: String,
    /// Prose lines longer than this are replaced by a comment
    pub max_line_chars: usize,
    /// Description extraction limits
    pub description: DescriptionOptions,
    /// `sidebar_position` written to the frontmatter
    pub sidebar_position: Option<i64>,
}

impl Default for ConvertOptions {
    #[inline]
    fn default() -> Self {
        Self {
            dialect: Dialect::Mdx,
            default_language: "python".to_string(),
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            description: DescriptionOptions::default(),
            sidebar_position: None,
        }
    }
}

impl ConvertOptions {
    #[inline]
    #[must_use]
    pub const fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            dialect: self.dialect,
            max_line_chars: self.max_line_chars,
        }
    }
}

/// A rendered page and where it should be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub content: String,
    pub title: String,
    pub description: String,
    pub stats: ConversionStats,
}

/// Converts notebooks and Markdown files into MDX or Markdown pages.
///
/// Conversion is deterministic: the same input and options always produce
/// byte-identical output.
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::NotebookConverter;
/// use std::path::Path;
///
/// let json = br##"{"nbformat": 4, "nbformat_minor": 5, "metadata": {}, "cells": [
///     {"cell_type": "markdown", "source": "# Title\nHello {world}"},
///     {"cell_type": "code", "source": "print(1)", "outputs": []}
/// ]}"##;
/// let doc = NotebookConverter::new().convert_bytes(json, Path::new("hello.mdx"))?;
/// assert_eq!(doc.title, "Title");
/// assert!(doc.content.contains("Hello \\{world\\}"));
/// assert!(doc.content.contains("```python\nprint(1)\n```"));
/// # Ok::<(), nbdoc_core::ConvertError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotebookConverter {
    options: ConvertOptions,
}

impl NotebookConverter {
    /// Converter with default options (MDX output)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Render a parsed notebook for `destination`.
    ///
    /// `destination` is only used for the title fallback and is carried
    /// into the result; nothing is written.
    #[must_use]
    pub fn convert_notebook(&self, notebook: &Notebook, destination: &Path) -> RenderedDocument {
        let title = extract_title(notebook, destination);
        let description = extract_description(notebook, &self.options.description);
        let (body, stats) = render_body(notebook, &self.options);

        debug!(
            "Rendered {}: {} cells, {} outputs ({} skipped, {} unsupported)",
            destination.display(),
            stats.rendered_cells(),
            stats.outputs_rendered,
            stats.empty_cells,
            stats.unsupported_cells
        );

        let mut content = Frontmatter::new(title.as_str(), description.as_str())
            .with_sidebar_position(self.options.sidebar_position)
            .render();
        content.push_str(&body);

        RenderedDocument {
            path: destination.to_path_buf(),
            content,
            title,
            description,
            stats,
        }
    }

    /// Decode notebook JSON and render it
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Notebook`] if the bytes are not a valid
    /// notebook container.
    pub fn convert_bytes(&self, bytes: &[u8], destination: &Path) -> Result<RenderedDocument> {
        let notebook = parse_notebook_from_slice(bytes)?;
        Ok(self.convert_notebook(&notebook, destination))
    }

    /// Render a Markdown document.
    ///
    /// An existing frontmatter block is kept verbatim and only the body is
    /// sanitized; otherwise the document is treated as a one-cell notebook
    /// and gets a generated header.
    #[must_use]
    pub fn convert_markdown(&self, text: &str, destination: &Path) -> RenderedDocument {
        let (header, body) = split_frontmatter(text);
        let Some(header) = header else {
            return self.convert_notebook(&Notebook::from_markdown(text), destination);
        };

        let (sanitized, report) = self.sanitizer().sanitize_with_report(body);
        let document = Notebook::from_markdown(body);
        let fields = parse_header(header);
        let title = header_string(&fields, "title")
            .unwrap_or_else(|| extract_title(&document, destination));
        let description = header_string(&fields, "description")
            .unwrap_or_else(|| extract_description(&document, &self.options.description));

        RenderedDocument {
            path: destination.to_path_buf(),
            content: format!("{header}{sanitized}"),
            title,
            description,
            stats: ConversionStats {
                markdown_cells: 1,
                sanitizer: report,
                ..ConversionStats::default()
            },
        }
    }

    /// Read and render a `.ipynb`, `.md`, `.markdown` or `.mdx` file.
    ///
    /// The destination is [`output_path`] for `input` in `output_dir`
    /// (default: next to the input).
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedFormat`] for other extensions,
    /// [`ConvertError::IoError`] if the file cannot be read, and
    /// [`ConvertError::Notebook`] for malformed notebooks.
    pub fn convert_file(&self, input: &Path, output_dir: Option<&Path>) -> Result<RenderedDocument> {
        self.convert_file_to(input, &self.output_path(input, output_dir))
    }

    /// Read and render `input` for an explicit `destination`
    ///
    /// # Errors
    ///
    /// Same as [`convert_file`](Self::convert_file).
    pub fn convert_file_to(&self, input: &Path, destination: &Path) -> Result<RenderedDocument> {
        let format = InputFormat::from_path(input)
            .ok_or_else(|| ConvertError::UnsupportedFormat(input.display().to_string()))?;
        debug!("Converting {} ({format}) -> {}", input.display(), destination.display());

        match format {
            InputFormat::Notebook => self.convert_bytes(&fs::read(input)?, destination),
            InputFormat::Markdown => {
                let text = fs::read_to_string(input)?;
                Ok(self.convert_markdown(&text, destination))
            }
        }
    }

    /// Destination for `input` with this converter's dialect
    #[must_use]
    pub fn output_path(&self, input: &Path, output_dir: Option<&Path>) -> PathBuf {
        output_path(input, output_dir, self.options.dialect)
    }

    /// Sanitize an already rendered document, keeping its frontmatter verbatim
    #[must_use]
    pub fn fix_document(&self, text: &str) -> (String, SanitizeReport) {
        let (header, body) = split_frontmatter(text);
        let (sanitized, report) = self.sanitizer().sanitize_with_report(body);
        (format!("{}{sanitized}", header.unwrap_or_default()), report)
    }

    fn sanitizer(&self) -> Sanitizer {
        Sanitizer::with_options(self.options.sanitize_options())
    }
}

/// Slugified destination path: `My Notebook.ipynb` → `<dir>/my-notebook.mdx`.
///
/// `output_dir` defaults to the input's directory.
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::{output_path, Dialect};
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     output_path(Path::new("nb/Intro Guide (v2).ipynb"), Some(Path::new("docs")), Dialect::Mdx),
///     PathBuf::from("docs/intro-guide-v2.mdx")
/// );
/// ```
#[must_use]
pub fn output_path(input: &Path, output_dir: Option<&Path>, dialect: Dialect) -> PathBuf {
    let dir = output_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    let slug = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());
    dir.join(format!("{slug}.{}", dialect.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCENARIO: &str = r##"{
        "nbformat": 4, "nbformat_minor": 5, "metadata": {},
        "cells": [
            {"cell_type": "markdown", "source": "# Title\nHello {world}"},
            {"cell_type": "code", "source": "print(1)", "outputs": []}
        ]
    }"##;

    #[test]
    fn test_scenario() {
        let doc = NotebookConverter::new()
            .convert_bytes(SCENARIO.as_bytes(), Path::new("scenario.mdx"))
            .unwrap();
        assert_eq!(doc.title, "Title");
        assert_eq!(
            doc.content,
            "---\ntitle: \"Title\"\ndescription: \"Jupyter notebook converted to documentation\"\n---\n\n\
             # Title\nHello \\{world\\}\n\n```python\nprint(1)\n```\n"
        );
    }

    #[test]
    fn test_sidebar_position() {
        let converter = NotebookConverter::with_options(ConvertOptions {
            sidebar_position: Some(4),
            ..ConvertOptions::default()
        });
        let doc = converter
            .convert_bytes(SCENARIO.as_bytes(), Path::new("s.mdx"))
            .unwrap();
        assert!(doc.content.contains("\nsidebar_position: 4\n---\n"));
    }

    #[test]
    fn test_malformed_input() {
        let err = NotebookConverter::new()
            .convert_bytes(b"{\"cells\": 3}", Path::new("x.mdx"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Notebook(_)));
        assert!(err.to_string().contains("Malformed notebook"));
    }

    #[test]
    fn test_convert_markdown_keeps_header() {
        let text = "---\ntitle: \"Kept \\\"T\\\"\"\ncustom: {a: 1}\n---\n\nBody {x}\n";
        let doc = NotebookConverter::new().convert_markdown(text, Path::new("page.mdx"));
        assert_eq!(
            doc.content,
            "---\ntitle: \"Kept \\\"T\\\"\"\ncustom: {a: 1}\n---\n\nBody \\{x\\}\n"
        );
        assert_eq!(doc.title, "Kept \"T\"");
        assert_eq!(doc.description, "Jupyter notebook converted to documentation");
    }

    #[test]
    fn test_convert_markdown_without_header() {
        let doc = NotebookConverter::new().convert_markdown(
            "# Guide\n\nA guide to the things that this page covers.",
            Path::new("guide.mdx"),
        );
        assert!(doc.content.starts_with(
            "---\ntitle: \"Guide\"\ndescription: \"A guide to the things that this page covers.\"\n---\n\n# Guide"
        ));
    }

    #[test]
    fn test_fix_document() {
        let converter = NotebookConverter::new();
        let (fixed, report) = converter.fix_document("---\na: \"{x}\"\n---\n{y}");
        assert_eq!(fixed, "---\na: \"{x}\"\n---\n\\{y\\}");
        assert_eq!(report.escaped_braces, 2);

        let (again, report) = converter.fix_document(&fixed);
        assert_eq!(again, fixed);
        assert!(report.is_clean());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("a/My Notebook.ipynb"), None, Dialect::Mdx),
            PathBuf::from("a/my-notebook.mdx")
        );
        assert_eq!(
            output_path(Path::new("x.ipynb"), Some(Path::new("out")), Dialect::Markdown),
            PathBuf::from("out/x.md")
        );
        assert_eq!(
            output_path(Path::new("(((.ipynb"), None, Dialect::Mdx),
            PathBuf::from("document.mdx")
        );
    }

    #[test]
    fn test_convert_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        let input = dir.join("Hello World.ipynb");
        fs::write(&input, SCENARIO).unwrap();

        let doc = NotebookConverter::new().convert_file(&input, None).unwrap();
        assert_eq!(doc.path, dir.join("hello-world.mdx"));
        assert_eq!(doc.title, "Title");

        let err = NotebookConverter::new()
            .convert_file(&dir.join("doc.pdf"), None)
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));

        let missing = NotebookConverter::new()
            .convert_file(&dir.join("missing.ipynb"), None)
            .unwrap_err();
        assert!(matches!(missing, ConvertError::IoError(_)));
    }

    #[test]
    fn test_convert_file_to_explicit_destination() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("page.md");
        fs::write(&input, "plain text\n").unwrap();

        let destination = temp.path().join("out/getting_started.mdx");
        let doc = NotebookConverter::new()
            .convert_file_to(&input, &destination)
            .unwrap();
        assert_eq!(doc.path, destination);
        assert_eq!(doc.title, "Getting Started");
    }

    #[test]
    fn test_existing_header_fields_follow_yaml() {
        let text = "---\ntitle: \"Caf\\u00e9\"\ndescription: \"Plain\" # note\n---\n\nBody\n";
        let doc = NotebookConverter::new().convert_markdown(text, Path::new("page.mdx"));
        assert_eq!(doc.title, "Caf\u{e9}");
        assert_eq!(doc.description, "Plain");
        assert!(doc.content.starts_with("---\ntitle: \"Caf\\u00e9\"\n"));

        let text = "---\ntitle: 'It''s'\ndescription: >\n  folded\n  text\n---\nBody\n";
        let doc = NotebookConverter::new().convert_markdown(text, Path::new("page.mdx"));
        assert_eq!(doc.title, "It's");
        assert_eq!(doc.description, "folded text");
    }

    #[test]
    fn test_unreadable_header_falls_back_to_body() {
        let text = "---\ntitle: [unclosed\n---\n# From Body\n";
        let doc = NotebookConverter::new().convert_markdown(text, Path::new("page.mdx"));
        assert_eq!(doc.title, "From Body");
        assert!(doc.content.starts_with("---\ntitle: [unclosed\n---\n"));
    }
}
