//! Report constructs that break MDX or Markdown parsing.
//!
//! Diagnostics come from a dry run of the [sanitizer](crate::sanitize): every
//! change the sanitizer would make is reported with its line number. A
//! sanitized document therefore produces no brace, tag, data-URL, comment or
//! long-line diagnostics.

use crate::format::Dialect;
use crate::frontmatter::split_frontmatter;
use crate::sanitize::{self, SanitizeOptions};
use crate::text::truncate_chars;
use serde::Serialize;

/// Maximum excerpt length in a [`Diagnostic`]
const EXCERPT_CHARS: usize = 80;

/// Kind of problem found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `{` or `}` outside code (MDX)
    UnescapedBrace,
    /// `<` or `>` that is not part of a tag (MDX)
    BareAngleBracket,
    /// Inline `data:` URL image
    DataUrl,
    /// HTML comment (MDX)
    HtmlComment,
    /// Open tag without a close, or close without an open
    UnclosedTag,
    /// Prose line over the length limit
    LongLine,
    /// Code fence never closed
    UnclosedFence,
}

impl DiagnosticKind {
    /// Human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnescapedBrace => "unescaped curly brace outside code",
            Self::BareAngleBracket => "bare angle bracket outside a tag",
            Self::DataUrl => "inline data URL image",
            Self::HtmlComment => "HTML comment (use {/* */} in MDX)",
            Self::UnclosedTag => "HTML tag without a matching partner",
            Self::LongLine => "line too long",
            Self::UnclosedFence => "code fence is never closed",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UnescapedBrace => "unescaped-brace",
            Self::BareAngleBracket => "bare-angle-bracket",
            Self::DataUrl => "data-url",
            Self::HtmlComment => "html-comment",
            Self::UnclosedTag => "unclosed-tag",
            Self::LongLine => "long-line",
            Self::UnclosedFence => "unclosed-fence",
        };
        write!(f, "{s}")
    }
}

/// One problem, by 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
    /// Start of the offending line
    pub excerpt: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} [{}]: {}",
            self.line,
            self.kind.description(),
            self.kind,
            self.excerpt
        )
    }
}

/// Diagnose `text` for `dialect` with default limits
#[must_use]
pub fn diagnose(text: &str, dialect: Dialect) -> Vec<Diagnostic> {
    diagnose_with(
        text,
        &SanitizeOptions {
            dialect,
            ..SanitizeOptions::default()
        },
    )
}

/// Diagnose `text`, skipping a leading frontmatter block.
///
/// At most one diagnostic is reported per line and kind.
#[must_use]
pub fn diagnose_with(text: &str, options: &SanitizeOptions) -> Vec<Diagnostic> {
    let (header, body) = split_frontmatter(text);
    let offset = header.map_or(0, |header| header.lines().count());
    let pass = sanitize::run(body, options);
    let lines: Vec<&str> = body.split('\n').collect();

    let mut found: Vec<(usize, DiagnosticKind)> = pass
        .findings
        .iter()
        .map(|finding| (finding.line, finding.kind))
        .collect();
    if let Some(line) = pass.open_fence {
        found.push((line, DiagnosticKind::UnclosedFence));
    }
    found.sort_unstable();
    found.dedup();

    found
        .into_iter()
        .map(|(line, kind)| {
            let source = lines.get(line - 1).copied().unwrap_or_default();
            Diagnostic {
                line: line + offset,
                kind,
                excerpt: truncate_chars(source.trim(), EXCERPT_CHARS),
            }
        })
        .collect()
}
