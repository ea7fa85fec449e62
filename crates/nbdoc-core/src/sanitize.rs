//! Markup safety pass for prose destined for MDX or Markdown.
//!
//! The sanitizer walks the document line by line with two states, prose and
//! fenced code. Fenced lines are copied untouched; prose lines are scanned
//! once, left to right, and split into text pieces and HTML tag tokens. A
//! second step matches open and close tags across the whole document and
//! removes the ones without a partner.
//!
//! Rules applied to prose (MDX unless noted):
//!
//! - inline code spans (a backtick run closed by a run of the same length on
//!   the same line) are copied verbatim
//! - a backslash followed by ASCII punctuation is an existing escape and is
//!   copied as-is, so `\{` stays `\{`
//! - `{` and `}` become `\{` and `\}`, except for `{/* ... */}` comments
//! - `<!-- ... -->` becomes `{/* ... */}` (kept in Markdown)
//! - `<https://...>` autolinks become `[url](url)` (kept in Markdown)
//! - void tags are written self-closing and `style` attributes are removed
//! - `<` that does not start a tag becomes `&lt;`, `>` that is neither a
//!   blockquote marker nor next to a letter becomes `&gt;`
//! - `data:` images (`<img src="data:...">`, `![alt](data:...)`) are replaced
//!   by a short placeholder in both dialects
//! - a line longer than `max_line_chars` after escaping is replaced by a
//!   comment in both dialects
//!
//! Running the sanitizer on its own output returns the output unchanged.
//!
//! # Examples
//!
//! ```rust
//! use nbdoc_core::{sanitize, Dialect};
//!
//! let text = "Use {name} here\n```python\nd = {}\n```";
//! let once = sanitize(text, Dialect::Mdx);
//! assert_eq!(once, "Use \\{name\\} here\n```python\nd = {}\n```");
//! assert_eq!(sanitize(&once, Dialect::Mdx), once);
//! ```

use crate::diagnose::DiagnosticKind;
use crate::format::Dialect;
use log::trace;
use serde::Serialize;
use std::borrow::Cow;

/// Text written in place of an inline `data:` image
pub const IMAGE_OMITTED: &str = "_(embedded image omitted)_";

/// Comment text written in place of an over-long line
pub const LONG_LINE_NOTE: &str = "Very long line truncated for documentation";

/// Default maximum length of a prose line, in characters
pub const DEFAULT_MAX_LINE_CHARS: usize = 2000;

/// HTML elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Autolink schemes recognised inside `<...>`
const AUTOLINK_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

/// Options for [`Sanitizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SanitizeOptions {
    /// Target dialect. Brace and angle-bracket escaping only apply to MDX.
    pub dialect: Dialect,
    /// Prose lines longer than this (after escaping) are replaced by a comment
    pub max_line_chars: usize,
}

impl Default for SanitizeOptions {
    #[inline]
    fn default() -> Self {
        Self {
            dialect: Dialect::Mdx,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
        }
    }
}

/// What a sanitizer pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SanitizeReport {
    /// Braces that were escaped
    pub escaped_braces: usize,
    /// `<` and `>` replaced by entities
    pub escaped_angle_brackets: usize,
    /// Inline `data:` images replaced by a placeholder
    pub replaced_images: usize,
    /// HTML comments rewritten as MDX comments
    pub converted_comments: usize,
    /// Tags removed because they had no partner
    pub removed_tags: usize,
    /// Lines replaced because they were too long
    pub truncated_lines: usize,
}

impl SanitizeReport {
    /// True when the pass changed nothing
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn from_findings(findings: &[Finding]) -> Self {
        let mut report = Self::default();
        for finding in findings {
            match finding.kind {
                DiagnosticKind::UnescapedBrace => report.escaped_braces += 1,
                DiagnosticKind::BareAngleBracket => report.escaped_angle_brackets += 1,
                DiagnosticKind::DataUrl => report.replaced_images += 1,
                DiagnosticKind::HtmlComment => report.converted_comments += 1,
                DiagnosticKind::UnclosedTag => report.removed_tags += 1,
                DiagnosticKind::LongLine => report.truncated_lines += 1,
                DiagnosticKind::UnclosedFence => {}
            }
        }
        report
    }
}

impl std::fmt::Display for SanitizeReport {
    /// `2 escaped braces, 1 removed tag`, or `no changes`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = [
            (self.escaped_braces, "escaped brace"),
            (self.escaped_angle_brackets, "escaped angle bracket"),
            (self.replaced_images, "replaced image"),
            (self.converted_comments, "converted comment"),
            (self.removed_tags, "removed tag"),
            (self.truncated_lines, "truncated line"),
        ];
        let parts: Vec<String> = counts
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, label)| {
                let plural = if *count == 1 { "" } else { "s" };
                format!("{count} {label}{plural}")
            })
            .collect();
        if parts.is_empty() {
            write!(f, "no changes")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

impl std::ops::AddAssign for SanitizeReport {
    fn add_assign(&mut self, other: Self) {
        self.escaped_braces += other.escaped_braces;
        self.escaped_angle_brackets += other.escaped_angle_brackets;
        self.replaced_images += other.replaced_images;
        self.converted_comments += other.converted_comments;
        self.removed_tags += other.removed_tags;
        self.truncated_lines += other.truncated_lines;
    }
}

/// Single-pass markup sanitizer
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    options: SanitizeOptions,
}

impl Sanitizer {
    /// Sanitizer for MDX with default limits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn with_options(options: SanitizeOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &SanitizeOptions {
        &self.options
    }

    /// Sanitize `text`. Never fails; the worst case is over-escaping.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        run(text, &self.options).output
    }

    /// Sanitize `text` and report what was changed
    #[must_use]
    pub fn sanitize_with_report(&self, text: &str) -> (String, SanitizeReport) {
        let pass = run(text, &self.options);
        let report = SanitizeReport::from_findings(&pass.findings);
        (pass.output, report)
    }
}

/// Sanitize `text` for `dialect` with default limits
#[must_use]
pub fn sanitize(text: &str, dialect: Dialect) -> String {
    Sanitizer::with_options(SanitizeOptions {
        dialect,
        ..SanitizeOptions::default()
    })
    .sanitize(text)
}

/// Something the sanitizer changed, by 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Finding {
    pub line: usize,
    pub kind: DiagnosticKind,
}

/// Result of one sanitizer run
pub(crate) struct Pass {
    pub output: String,
    pub findings: Vec<Finding>,
    /// Line of a fence that is never closed
    pub open_fence: Option<usize>,
}

/// Fenced code block delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: u8,
    len: usize,
}

impl Fence {
    /// Fence opened by `line`, if any
    pub(crate) fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = *trimmed.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = trimmed.bytes().take_while(|&b| b == marker).count();
        if len < 3 {
            return None;
        }
        // Backtick fences may not carry backticks in their info string
        if marker == b'`' && trimmed[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    /// Whether `line` closes this fence
    pub(crate) fn closes(self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.len() >= self.len && trimmed.bytes().all(|b| b == self.marker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    SelfClosing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    name: String,
    /// Quote character and unquoted value
    value: Option<(char, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag {
    name: String,
    kind: TagKind,
    attributes: Vec<Attribute>,
    /// Written with `/>` in the source
    slash: bool,
    line: usize,
    keep: bool,
}

impl Tag {
    fn is_data_image(&self) -> bool {
        self.kind != TagKind::Close
            && self.name.eq_ignore_ascii_case("img")
            && self.attributes.iter().any(|attr| {
                attr.name.eq_ignore_ascii_case("src")
                    && attr
                        .value
                        .as_ref()
                        .is_some_and(|(_, value)| is_data_url(value.trim_start()))
            })
    }

    fn render(&self, dialect: Dialect) -> String {
        if self.kind == TagKind::Close {
            return format!("</{}>", self.name);
        }
        let mut out = format!("<{}", self.name);
        for attr in &self.attributes {
            if dialect == Dialect::Mdx && attr.name.eq_ignore_ascii_case("style") {
                continue;
            }
            out.push(' ');
            out.push_str(&attr.name);
            if let Some((quote, value)) = &attr.value {
                out.push('=');
                out.push(*quote);
                out.push_str(value);
                out.push(*quote);
            }
        }
        match self.kind {
            TagKind::SelfClosing if dialect == Dialect::Mdx || self.slash => out.push_str(" />"),
            _ => out.push('>'),
        }
        out
    }
}

#[derive(Debug)]
enum Piece {
    Text(String),
    /// Index into the scanner's tag list
    Tag(usize),
    /// Removed markup (`<!DOCTYPE ...>`), with its source length
    Dropped(usize),
}

#[derive(Debug)]
enum Line<'a> {
    Verbatim(&'a str),
    Prose(Vec<Piece>),
    Replaced,
}

/// Outcome of scanning markup that starts with `<`
enum Angle {
    Text(String),
    Tag(Tag),
    Dropped,
}

struct Scanner<'o> {
    options: &'o SanitizeOptions,
    tags: Vec<Tag>,
    findings: Vec<Finding>,
}

pub(crate) fn run(text: &str, options: &SanitizeOptions) -> Pass {
    let mut scanner = Scanner {
        options,
        tags: Vec::new(),
        findings: Vec::new(),
    };
    let mut lines = Vec::new();
    let mut fence: Option<(Fence, usize)> = None;

    for (index, line) in text.split('\n').enumerate() {
        let line_no = index + 1;
        if let Some((open, _)) = fence {
            if open.closes(line) {
                fence = None;
            }
            lines.push(Line::Verbatim(line));
            continue;
        }
        if let Some(open) = Fence::open(line) {
            fence = Some((open, line_no));
            lines.push(Line::Verbatim(line));
            continue;
        }

        let first_tag = scanner.tags.len();
        let first_finding = scanner.findings.len();
        let pieces = scanner.scan_line(line, line_no);
        let width: usize = pieces.iter().map(|piece| scanner.width(piece)).sum();
        if width > options.max_line_chars {
            trace!("line {line_no}: {width} chars, replaced");
            scanner.tags.truncate(first_tag);
            scanner.findings.truncate(first_finding);
            scanner.note(line_no, DiagnosticKind::LongLine);
            lines.push(Line::Replaced);
        } else {
            lines.push(Line::Prose(pieces));
        }
    }

    match_tags(&mut scanner.tags);
    let Scanner {
        tags, mut findings, ..
    } = scanner;
    findings.extend(tags.iter().filter(|tag| !tag.keep).map(|tag| Finding {
        line: tag.line,
        kind: DiagnosticKind::UnclosedTag,
    }));
    findings.sort_by_key(|finding| finding.line);

    let mut output = String::with_capacity(text.len() + text.len() / 16);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        match line {
            Line::Verbatim(raw) => output.push_str(raw),
            Line::Replaced => output.push_str(&options.dialect.comment(LONG_LINE_NOTE)),
            Line::Prose(pieces) => output.push_str(&assemble(pieces, &tags, options.dialect)),
        }
    }

    Pass {
        output,
        findings,
        open_fence: fence.map(|(_, line)| line),
    }
}

/// Pair open and close tags; anything left without a partner is dropped.
///
/// A close tag pairs with the nearest open tag of the same name; opens above
/// it on the stack are left unmatched.
fn match_tags(tags: &mut [Tag]) {
    let mut stack: Vec<usize> = Vec::new();
    for index in 0..tags.len() {
        match tags[index].kind {
            TagKind::SelfClosing => tags[index].keep = true,
            TagKind::Open => stack.push(index),
            TagKind::Close => {
                let name = &tags[index].name;
                if let Some(pos) = stack.iter().rposition(|&open| tags[open].name == *name) {
                    let open = stack[pos];
                    tags[open].keep = true;
                    tags[index].keep = true;
                    stack.truncate(pos);
                }
            }
        }
    }
}

/// Join a prose line's pieces, leaving out dropped tags.
///
/// Removed markup between two non-space text characters leaves a single
/// space, so text on either side never fuses into new syntax (backtick runs,
/// `](`).
fn assemble(pieces: &[Piece], tags: &[Tag], dialect: Dialect) -> String {
    let mut line = String::new();
    let mut gap = false;
    let mut after_text = false;
    for piece in pieces {
        let (chunk, is_text): (Cow<'_, str>, bool) = match piece {
            Piece::Text(text) => (Cow::Borrowed(text.as_str()), true),
            Piece::Tag(index) if tags[*index].keep => {
                (Cow::Owned(tags[*index].render(dialect)), false)
            }
            Piece::Tag(_) | Piece::Dropped(_) => {
                gap = true;
                continue;
            }
        };
        if gap
            && after_text
            && is_text
            && line.ends_with(|c: char| !c.is_whitespace())
            && chunk.starts_with(|c: char| !c.is_whitespace())
        {
            line.push(' ');
        }
        gap = false;
        after_text = is_text;
        line.push_str(&chunk);
    }
    // Removing leading markup must not turn the line into a fence
    if Fence::open(&line).is_some() {
        let indent = line.len() - line.trim_start().len();
        line.insert(indent, '\\');
    }
    line
}

impl Scanner<'_> {
    fn note(&mut self, line: usize, kind: DiagnosticKind) {
        self.findings.push(Finding { line, kind });
    }

    fn mdx(&self) -> bool {
        self.options.dialect == Dialect::Mdx
    }

    /// Rendered width of a piece with every tag kept
    fn width(&self, piece: &Piece) -> usize {
        match piece {
            Piece::Text(text) => text.chars().count(),
            Piece::Tag(index) => self.tags[*index]
                .render(self.options.dialect)
                .chars()
                .count(),
            Piece::Dropped(len) => *len,
        }
    }

    fn scan_line(&mut self, line: &str, line_no: usize) -> Vec<Piece> {
        let mdx = self.mdx();
        let bytes = line.as_bytes();
        let mut pieces = Vec::new();
        let mut text = String::with_capacity(line.len());
        // Only whitespace and `>` seen so far
        let mut quote_prefix = true;
        let mut i = 0;

        while let Some(ch) = line[i..].chars().next() {
            let start = i;
            match ch {
                '\\' => {
                    text.push('\\');
                    i += 1;
                    if let Some(&next) = bytes.get(i) {
                        if next.is_ascii_punctuation() {
                            text.push(char::from(next));
                            i += 1;
                        }
                    }
                }
                '`' => {
                    let run = run_length(bytes, i);
                    let end = find_closing_run(bytes, i + run, run).unwrap_or(i + run);
                    text.push_str(&line[i..end]);
                    i = end;
                }
                '{' | '}' if mdx => {
                    let comment = if ch == '{' {
                        mdx_comment_end(line, i)
                    } else {
                        None
                    };
                    if let Some(end) = comment {
                        text.push_str(&line[i..end]);
                        i = end;
                    } else {
                        self.note(line_no, DiagnosticKind::UnescapedBrace);
                        text.push('\\');
                        text.push(ch);
                        i += 1;
                    }
                }
                '<' => {
                    let (angle, end) = self.scan_angle(line, i, line_no);
                    match angle {
                        Angle::Text(escaped) => text.push_str(&escaped),
                        Angle::Tag(tag) => {
                            flush(&mut text, &mut pieces);
                            pieces.push(Piece::Tag(self.tags.len()));
                            self.tags.push(tag);
                        }
                        Angle::Dropped => {
                            flush(&mut text, &mut pieces);
                            pieces.push(Piece::Dropped(end - i));
                        }
                    }
                    i = end;
                }
                '>' if mdx => {
                    let letter = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphabetic());
                    let prev = line[..i].chars().next_back();
                    let next = line[i + 1..].chars().next();
                    if quote_prefix || letter(prev) || letter(next) {
                        text.push('>');
                    } else {
                        self.note(line_no, DiagnosticKind::BareAngleBracket);
                        text.push_str("&gt;");
                    }
                    i += 1;
                }
                '!' | '[' => {
                    let open = if ch == '!' { i + 1 } else { i };
                    if let Some(end) = data_link_end(line, open) {
                        self.note(line_no, DiagnosticKind::DataUrl);
                        text.push_str(IMAGE_OMITTED);
                        i = end;
                    } else {
                        text.push(ch);
                        i += 1;
                    }
                }
                _ => {
                    text.push(ch);
                    i += ch.len_utf8();
                }
            }
            if quote_prefix
                && !line[start..i]
                    .chars()
                    .all(|c| c.is_whitespace() || c == '>')
            {
                quote_prefix = false;
            }
        }

        flush(&mut text, &mut pieces);
        pieces
    }

    /// Scan markup starting with the `<` at `start`; returns the outcome and
    /// the index just past what was consumed.
    fn scan_angle(&mut self, line: &str, start: usize, line_no: usize) -> (Angle, usize) {
        let mdx = self.mdx();
        let rest = &line[start..];

        if let Some(inner) = rest.strip_prefix("<!--") {
            if let Some(close) = inner.find("-->") {
                let end = start + 4 + close + 3;
                if mdx {
                    self.note(line_no, DiagnosticKind::HtmlComment);
                    return (Angle::Text(Dialect::Mdx.comment(inner[..close].trim())), end);
                }
                return (Angle::Text(line[start..end].to_string()), end);
            }
            return self.escape_angle(start, line_no);
        }

        let next = rest.as_bytes().get(1).copied();
        if next == Some(b'!') {
            // <!DOCTYPE html> and friends
            if rest.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
                if let Some(close) = rest.find('>') {
                    return (Angle::Dropped, start + close + 1);
                }
            }
            return self.escape_angle(start, line_no);
        }

        if let Some(len) = autolink_len(rest) {
            let url = &rest[1..len - 1];
            let text = if mdx {
                format!("[{url}]({url})")
            } else {
                rest[..len].to_string()
            };
            return (Angle::Text(text), start + len);
        }

        if next.is_some_and(|b| b.is_ascii_alphabetic() || b == b'/') {
            if let Some((tag, len)) = parse_tag(rest, line_no) {
                if tag.is_data_image() {
                    self.note(line_no, DiagnosticKind::DataUrl);
                    return (Angle::Text(IMAGE_OMITTED.to_string()), start + len);
                }
                return (Angle::Tag(tag), start + len);
            }
            return self.escape_angle(start, line_no);
        }

        if mdx {
            self.escape_angle(start, line_no)
        } else {
            (Angle::Text("<".to_string()), start + 1)
        }
    }

    fn escape_angle(&mut self, start: usize, line_no: usize) -> (Angle, usize) {
        self.note(line_no, DiagnosticKind::BareAngleBracket);
        (Angle::Text("&lt;".to_string()), start + 1)
    }
}

fn flush(text: &mut String, pieces: &mut Vec<Piece>) {
    if !text.is_empty() {
        pieces.push(Piece::Text(std::mem::take(text)));
    }
}

fn run_length(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

/// End of the first backtick run of exactly `len` at or after `from`
fn find_closing_run(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i);
            if run == len {
                return Some(i + run);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// End of a `{/* ... */}` comment starting at `start`
fn mdx_comment_end(line: &str, start: usize) -> Option<usize> {
    let body = start + 3;
    if !line[start..].starts_with("{/*") {
        return None;
    }
    let close = body + line[body..].find("*/")?;
    line[close + 2..].starts_with('}').then_some(close + 3)
}

fn is_data_url(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// End of a `[alt](data:...)` link whose `[` is at `open`
fn data_link_end(line: &str, open: usize) -> Option<usize> {
    if line.as_bytes().get(open) != Some(&b'[') {
        return None;
    }
    let url_start = open + 1 + line[open + 1..].find("](")? + 2;
    let url = &line[url_start..];
    if !is_data_url(url) {
        return None;
    }
    Some(url_start + url.find(')')? + 1)
}

/// Length of a `<scheme:...>` autolink at the start of `rest`
fn autolink_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('<')?;
    let scheme = AUTOLINK_SCHEMES
        .iter()
        .find(|scheme| body.starts_with(*scheme))?;
    let close = body.find('>')?;
    let url = &body[..close];
    let valid = url.len() > scheme.len()
        && url
            .chars()
            .all(|c| !c.is_whitespace() && !"<>{}[]()`\"'\\".contains(c));
    valid.then_some(close + 2)
}

fn is_attribute_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.' | b'@')
}

/// Parse an HTML tag at the start of `rest` (which begins with `<`).
///
/// Returns `None` unless the tag is well formed and ends on this line.
fn parse_tag(rest: &str, line: usize) -> Option<(Tag, usize)> {
    let bytes = rest.as_bytes();
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = i;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b'_' | b':' | b'.'))
    {
        i += 1;
    }
    let name = rest[name_start..i].to_string();
    let mut attributes = Vec::new();

    let (slash, end) = loop {
        let before_space = i;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        match *bytes.get(i)? {
            b'>' => break (false, i + 1),
            b'/' if bytes.get(i + 1) == Some(&b'>') && !closing => break (true, i + 2),
            _ if closing || i == before_space => return None,
            _ => {
                let (attribute, next) = parse_attribute(rest, i)?;
                attributes.push(attribute);
                i = next;
            }
        }
    };

    let kind = if closing {
        TagKind::Close
    } else if slash
        || VOID_ELEMENTS
            .iter()
            .any(|void| name.eq_ignore_ascii_case(void))
    {
        TagKind::SelfClosing
    } else {
        TagKind::Open
    };

    Some((
        Tag {
            name,
            kind,
            attributes,
            slash,
            line,
            keep: false,
        },
        end,
    ))
}

fn parse_attribute(rest: &str, start: usize) -> Option<(Attribute, usize)> {
    let bytes = rest.as_bytes();
    let mut i = start;
    while bytes.get(i).copied().is_some_and(is_attribute_name_byte) {
        i += 1;
    }
    if i == start {
        return None;
    }
    let name = rest[start..i].to_string();

    let mut j = i;
    while bytes.get(j).is_some_and(u8::is_ascii_whitespace) {
        j += 1;
    }
    if bytes.get(j) != Some(&b'=') {
        return Some((Attribute { name, value: None }, i));
    }
    j += 1;
    while bytes.get(j).is_some_and(u8::is_ascii_whitespace) {
        j += 1;
    }

    match *bytes.get(j)? {
        quote @ (b'"' | b'\'') => {
            let close = j + 1 + rest[j + 1..].find(char::from(quote))?;
            let value = rest[j + 1..close].to_string();
            Some((
                Attribute {
                    name,
                    value: Some((char::from(quote), value)),
                },
                close + 1,
            ))
        }
        _ => {
            let value_start = j;
            while bytes
                .get(j)
                .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'>')
            {
                j += 1;
            }
            let value = &rest[value_start..j];
            if value.is_empty() || value.contains(&['"', '\'', '<', '=', '`'][..]) {
                return None;
            }
            Some((
                Attribute {
                    name,
                    value: Some(('"', value.to_string())),
                },
                j,
            ))
        }
    }
}
