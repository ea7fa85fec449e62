//! Property-Based Tests
//!
//! Tests using property-based testing (proptest) to verify invariants:
//! - The sanitizer is idempotent and never panics
//! - Fenced and inline code pass through untouched
//! - Conversion is deterministic
//! - Descriptions respect their length limit
//!
//! Markup-heavy alphabets keep the generated text dense in braces, angle
//! brackets, backticks and tag-like fragments.

use nbdoc_core::metadata::clean_description;
use nbdoc_core::{
    diagnose_with, sanitize, DiagnosticKind, Dialect, NotebookConverter, SanitizeOptions,
    Sanitizer,
};
use proptest::prelude::*;
use std::path::Path;

/// Markup-dense text, short lines
const MARKUP: &str = "[ab <>/!{}`~\\\\\\[\\]()*=\"'\\-:\n]{0,120}";

/// Markup-dense text that also produces tags, comments, autolinks and data links
const FRAGMENTS: &str =
    "(<b>|</b>|<i>|</i>|<br>|<img src=\"data:x\">|<!-- c -->|<!DOCTYPE x>|<http://a\\.b>|\\[x\\]\\(data:y\\)|```|`|\\{|\\\\\\{|\\{/\\* c \\*/\\}|> |x|\n| ){0,40}";

fn dialects() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::Mdx), Just(Dialect::Markdown)]
}

// ============================================================================
// Sanitizer Properties
// ============================================================================

/// Property: sanitizing twice equals sanitizing once
#[test]
fn proptest_sanitize_idempotent() {
    proptest!(|(text in MARKUP, dialect in dialects())| {
        let once = sanitize(&text, dialect);
        let twice = sanitize(&once, dialect);
        prop_assert_eq!(twice, once);
    });
}

/// Property: idempotence holds for tag, comment and link fragments
#[test]
fn proptest_sanitize_idempotent_fragments() {
    proptest!(|(text in FRAGMENTS, dialect in dialects())| {
        let once = sanitize(&text, dialect);
        prop_assert_eq!(sanitize(&once, dialect), once);
    });
}

/// Property: idempotence holds when the line limit replaces lines
#[test]
fn proptest_sanitize_idempotent_with_short_limit() {
    proptest!(|(text in FRAGMENTS, limit in 4usize..40)| {
        let sanitizer = Sanitizer::with_options(SanitizeOptions {
            dialect: Dialect::Mdx,
            max_line_chars: limit,
        });
        let once = sanitizer.sanitize(&text);
        prop_assert_eq!(sanitizer.sanitize(&once), once);
    });
}

/// Property: arbitrary Unicode never panics
#[test]
fn proptest_sanitize_no_panic() {
    proptest!(|(text in "\\PC{0,300}", dialect in dialects())| {
        let _ = sanitize(&text, dialect);
    });
}

/// Property: the line count never changes
#[test]
fn proptest_sanitize_preserves_line_count() {
    proptest!(|(text in MARKUP, dialect in dialects())| {
        let once = sanitize(&text, dialect);
        prop_assert_eq!(once.split('\n').count(), text.split('\n').count());
    });
}

/// Property: sanitized MDX has nothing left to report
#[test]
fn proptest_sanitized_text_has_no_findings() {
    proptest!(|(text in FRAGMENTS)| {
        let options = SanitizeOptions::default();
        let once = Sanitizer::with_options(options).sanitize(&text);
        let remaining: Vec<_> = diagnose_with(&once, &options)
            .into_iter()
            .filter(|d| d.kind != DiagnosticKind::UnclosedFence)
            .collect();
        prop_assert!(remaining.is_empty(), "{:?}", remaining);
    });
}

// ============================================================================
// Code Protection Properties
// ============================================================================

/// Property: fenced block content is copied verbatim
#[test]
fn proptest_fenced_code_untouched() {
    proptest!(|(
        before in "[a-z {}<>]{0,20}",
        code in "[a-z {}<>=:!]{0,30}(\n[a-z {}<>=:!]{0,30}){0,4}",
    )| {
        let text = format!("{before}\n```python\n{code}\n```\n");
        let once = sanitize(&text, Dialect::Mdx);
        let fenced = format!("\n```python\n{code}\n```\n");
        prop_assert!(once.ends_with(&fenced), "{:?}", once);
    });
}

/// Property: inline code spans are copied verbatim
#[test]
fn proptest_inline_code_untouched() {
    proptest!(|(code in "[a-z {}<>=]{1,20}", after in "[a-z ]{0,10}")| {
        let text = format!("`{code}` {after}");
        let once = sanitize(&text, Dialect::Mdx);
        prop_assert_eq!(once, text);
    });
}

/// Property: braces outside code are always escaped in MDX
#[test]
fn proptest_prose_braces_escaped() {
    proptest!(|(words in proptest::collection::vec("[a-z]{1,8}", 1..6))| {
        let text = format!("{{{}}}", words.join(" "));
        let once = sanitize(&text, Dialect::Mdx);
        prop_assert_eq!(once, format!("\\{{{}\\}}", words.join(" ")));
    });
}

// ============================================================================
// Conversion Properties
// ============================================================================

/// Property: converting the same notebook twice gives identical output
#[test]
fn proptest_conversion_deterministic() {
    proptest!(|(
        markdown in proptest::collection::vec(MARKUP, 0..4),
        code in proptest::collection::vec("[a-z(){}<> =\n]{0,40}", 0..4),
    )| {
        let mut cells = Vec::new();
        for source in &markdown {
            cells.push(serde_json::json!({"cell_type": "markdown", "source": source}));
        }
        for source in &code {
            cells.push(serde_json::json!({"cell_type": "code", "source": source, "outputs": []}));
        }
        let json = serde_json::json!({"nbformat": 4, "nbformat_minor": 5, "metadata": {}, "cells": cells})
            .to_string();

        let converter = NotebookConverter::new();
        let first = converter.convert_bytes(json.as_bytes(), Path::new("p.mdx")).unwrap();
        let second = converter.convert_bytes(json.as_bytes(), Path::new("p.mdx")).unwrap();
        prop_assert_eq!(first, second);
    });
}

/// Property: descriptions never exceed their limit
#[test]
fn proptest_description_length() {
    proptest!(|(text in "\\PC{0,400}", max in 3usize..200)| {
        let description = clean_description(&text, max);
        prop_assert!(description.chars().count() <= max);
    });
}

/// Property: descriptions over 150 characters end in the ellipsis at exactly 150
#[test]
fn proptest_description_truncation_exact() {
    proptest!(|(words in proptest::collection::vec("[a-z]{1,12}", 40..80))| {
        let text = words.join(" ");
        prop_assume!(text.chars().count() > 150);
        let description = clean_description(&text, 150);
        prop_assert_eq!(description.chars().count(), 150);
        prop_assert!(description.ends_with("..."));
        prop_assert!(text.starts_with(&description[..147]));
    });
}
