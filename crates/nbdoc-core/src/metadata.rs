//! Title and description extraction.
//!
//! Both values follow the same precedence: explicit notebook metadata first,
//! then the notebook's own Markdown, then a fallback. Scans are in cell order
//! and the first match wins.

use crate::sanitize::Fence;
use crate::text::{collapse_whitespace, title_case, truncate_chars};
use nbdoc_notebook::Notebook;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description used when a notebook has no usable prose
pub const DEFAULT_DESCRIPTION: &str = "Jupyter notebook converted to documentation";

/// Title used when nothing else yields one
pub const UNTITLED: &str = "Untitled";

/// Description extraction settings
///
/// # Examples
///
/// ```rust
/// use nbdoc_core::DescriptionOptions;
///
/// let options = DescriptionOptions::default();
/// assert_eq!(options.min_chars, 20);
/// assert_eq!(options.max_chars, 150);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionOptions {
    /// A prose line must be longer than this to be used
    pub min_chars: usize,
    /// Longer descriptions are cut to `max_chars - 3` characters plus `...`
    pub max_chars: usize,
    /// Used when no line qualifies
    pub fallback: String,
}

impl Default for DescriptionOptions {
    #[inline]
    fn default() -> Self {
        Self {
            min_chars: 20,
            max_chars: 150,
            fallback: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Display title for a notebook rendered to `destination`.
///
/// Precedence: metadata `title`, then the first `# ` heading of the first
/// Markdown cell, then the destination file stem.
#[must_use]
pub fn extract_title(notebook: &Notebook, destination: &Path) -> String {
    if let Some(title) = non_blank(notebook.metadata.title.as_deref()) {
        return collapse_whitespace(title);
    }
    notebook
        .markdown_cells()
        .next()
        .and_then(|cell| first_heading(&cell.source))
        .unwrap_or_else(|| title_from_path(destination))
}

/// Title derived from a file name: `getting_started-guide.mdx` → `Getting Started Guide`
#[must_use]
pub fn title_from_path(path: &Path) -> String {
    let title = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(title_case)
        .unwrap_or_default();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Short description for a notebook.
///
/// Precedence: metadata `description`, then the first non-heading prose line
/// longer than `min_chars` across Markdown cells, then `fallback`.
#[must_use]
pub fn extract_description(notebook: &Notebook, options: &DescriptionOptions) -> String {
    if let Some(description) = non_blank(notebook.metadata.description.as_deref()) {
        return clean_description(description, options.max_chars);
    }
    notebook
        .markdown_cells()
        .flat_map(|cell| prose_lines(&cell.source))
        .filter(|line| !is_skipped_line(line))
        .map(|line| clean_description(line, usize::MAX))
        .find(|line| line.chars().count() > options.min_chars)
        .map_or_else(
            || options.fallback.clone(),
            |line| truncate_chars(&line, options.max_chars),
        )
}

/// Strip tags and emphasis markers, collapse whitespace and truncate
#[must_use]
pub fn clean_description(text: &str, max_chars: usize) -> String {
    static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
    let without_tags = TAG.replace_all(text, "");
    let without_markers: String = without_tags
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`'))
        .collect();
    truncate_chars(&collapse_whitespace(&without_markers), max_chars)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Lines of `source` outside fenced code blocks, trimmed
fn prose_lines(source: &str) -> impl Iterator<Item = &str> {
    let mut fence: Option<Fence> = None;
    source.lines().filter_map(move |line| {
        if let Some(open) = fence {
            if open.closes(line) {
                fence = None;
            }
            return None;
        }
        if let Some(open) = Fence::open(line) {
            fence = Some(open);
            return None;
        }
        Some(line.trim())
    })
}

/// Headings, images and table rows never make a description
fn is_skipped_line(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("![") || line.starts_with('|')
}

fn first_heading(source: &str) -> Option<String> {
    prose_lines(source)
        .filter_map(|line| line.strip_prefix("# "))
        .map(|heading| collapse_whitespace(heading.trim_end_matches('#')))
        .find(|heading| !heading.is_empty())
}
