//! YAML frontmatter header for rendered pages.

use crate::metadata::{extract_description, extract_title, DescriptionOptions};
use log::warn;
use nbdoc_notebook::Notebook;
use std::fmt::Write;
use std::path::Path;

const DELIMITER: &str = "---";

/// Page header values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    /// Docusaurus sidebar ordering
    pub sidebar_position: Option<i64>,
}

impl Frontmatter {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            sidebar_position: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_sidebar_position(mut self, position: Option<i64>) -> Self {
        self.sidebar_position = position;
        self
    }

    /// Render the header, including the blank line that separates it from
    /// the body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nbdoc_core::Frontmatter;
    ///
    /// let header = Frontmatter::new("Say \"hi\"", "Two\nlines").render();
    /// assert_eq!(
    ///     header,
    ///     "---\ntitle: \"Say \\\"hi\\\"\"\ndescription: \"Two lines\"\n---\n\n"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(64 + self.title.len() + self.description.len());
        out.push_str(DELIMITER);
        out.push('\n');
        let _ = writeln!(out, "title: \"{}\"", escape_value(&self.title));
        let _ = writeln!(out, "description: \"{}\"", escape_value(&self.description));
        if let Some(position) = self.sidebar_position {
            let _ = writeln!(out, "sidebar_position: {position}");
        }
        out.push_str(DELIMITER);
        out.push_str("\n\n");
        out
    }
}

/// Escape a value for a double-quoted YAML scalar.
///
/// Backslashes and quotes are escaped; control characters (newlines, tabs)
/// become spaces and whitespace runs collapse to one space.
#[must_use]
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for ch in value.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

/// Split a leading `---` frontmatter block from the body.
///
/// The returned header includes both delimiter lines; the body is everything
/// after the closing delimiter.
#[must_use]
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let first = if text.starts_with("---\n") {
        4
    } else if text.starts_with("---\r\n") {
        5
    } else {
        return (None, text);
    };

    let mut offset = first;
    for line in text[first..].split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == DELIMITER {
            return (Some(&text[..offset]), &text[offset..]);
        }
    }
    (None, text)
}

/// Parse the YAML inside a block returned by [`split_frontmatter`].
///
/// A header that is not valid YAML, or not a mapping, yields an empty
/// mapping; the block itself is still kept verbatim by the callers.
#[must_use]
pub fn parse_header(header: &str) -> serde_yaml::Mapping {
    let inner = header.split_once('\n').map_or("", |(_, rest)| rest);
    let inner = inner.trim_end().strip_suffix(DELIMITER).unwrap_or(inner);
    match serde_yaml::from_str::<serde_yaml::Value>(inner) {
        Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
        Ok(serde_yaml::Value::Null) => serde_yaml::Mapping::new(),
        Ok(_) => {
            warn!("Frontmatter is not a mapping; ignoring its fields");
            serde_yaml::Mapping::new()
        }
        Err(err) => {
            warn!("Unreadable frontmatter: {err}");
            serde_yaml::Mapping::new()
        }
    }
}

/// Non-empty scalar field of a parsed header, as text
#[must_use]
pub fn header_string(header: &serde_yaml::Mapping, key: &str) -> Option<String> {
    let value = match header.get(key)? {
        serde_yaml::Value::String(text) => text.trim().to_string(),
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Prepend a generated header to a document that has none.
///
/// Returns `None` when `text` already starts with frontmatter. The title and
/// description come from the document itself, with `path` as the title
/// fallback.
#[must_use]
pub fn add_frontmatter(text: &str, path: &Path, options: &DescriptionOptions) -> Option<String> {
    if split_frontmatter(text).0.is_some() {
        return None;
    }
    let document = Notebook::from_markdown(text);
    let header = Frontmatter::new(
        extract_title(&document, path),
        extract_description(&document, options),
    )
    .render();
    Some(header + text)
}
