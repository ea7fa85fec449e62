//! Small text helpers shared by the renderer, extractor and frontmatter emitter

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Ellipsis marker appended by [`truncate_chars`]
pub const ELLIPSIS: &str = "...";

/// Turn a file stem like `pixeltable-basics_v2` into `Pixeltable Basics V2`
#[must_use]
pub fn title_case(stem: &str) -> String {
    stem.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let mut chars = token.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL-friendly file stem: `My Notebook (v2)` → `my-notebook-v2`
#[must_use]
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    for ch in stem.chars() {
        let ch = if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            ch.to_ascii_lowercase()
        } else {
            '-'
        };
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch);
    }
    slug.trim_matches('-').to_string()
}

/// Collapse every whitespace run (including newlines) to one space and trim
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, ending in [`ELLIPSIS`] when cut
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Remove terminal colour and cursor escape sequences (tracebacks are full of them)
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    static ANSI: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
            .expect("Invalid ANSI regex")
    });
    if text.contains('\x1b') {
        ANSI.replace_all(text, "")
    } else {
        Cow::Borrowed(text)
    }
}

/// Longest run of consecutive backticks in `text`
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for byte in text.bytes() {
        if byte == b'`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// A backtick fence long enough that `content` cannot close it early
#[must_use]
pub fn fence_for(content: &str) -> String {
    "`".repeat((longest_backtick_run(content) + 1).max(3))
}

/// Wrap `content` in a fenced code block with an optional info string
#[must_use]
pub fn fenced_block(info: &str, content: &str) -> String {
    let fence = fence_for(content);
    let body = content.trim_end_matches(['\n', '\r']);
    if body.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{body}\n{fence}")
    }
}
