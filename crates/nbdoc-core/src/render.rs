//! Cell and output rendering.
//!
//! Turns the cells of a [`Notebook`] into the page body, in input order:
//! Markdown cells go through the sanitizer, code and raw cells become fenced
//! blocks, and code cell outputs follow their source. Blocks are separated by
//! exactly one blank line.

use crate::convert::ConvertOptions;
use crate::format::Dialect;
use crate::sanitize::{SanitizeReport, Sanitizer};
use crate::text::{fenced_block, strip_ansi};
use log::{debug, warn};
use nbdoc_notebook::{Cell, CodeCell, MimeBundle, Notebook, Output, TextCell};
use serde::Serialize;

const IMAGE_NOTE: &str = "please save and reference manually";

/// Counters collected while rendering one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub markdown_cells: usize,
    pub code_cells: usize,
    pub raw_cells: usize,
    /// Cells with blank source and no outputs, skipped
    pub empty_cells: usize,
    /// Cells of an unknown type, skipped
    pub unsupported_cells: usize,
    pub outputs_rendered: usize,
    /// Outputs with nothing renderable
    pub outputs_skipped: usize,
    /// Image outputs written as placeholders
    pub image_placeholders: usize,
    /// Changes made by the sanitizer to Markdown cells
    pub sanitizer: SanitizeReport,
}

impl ConversionStats {
    /// Cells that produced output
    #[inline]
    #[must_use]
    pub const fn rendered_cells(&self) -> usize {
        self.markdown_cells + self.code_cells + self.raw_cells
    }
}

/// Render the body of `notebook` (everything after the frontmatter)
#[must_use]
pub fn render_body(notebook: &Notebook, options: &ConvertOptions) -> (String, ConversionStats) {
    let language = notebook
        .metadata
        .language
        .as_deref()
        .filter(|language| !language.trim().is_empty())
        .unwrap_or(options.default_language.as_str())
        .trim()
        .to_lowercase();
    let mut renderer = CellRenderer {
        dialect: options.dialect,
        language,
        sanitizer: Sanitizer::with_options(options.sanitize_options()),
        stats: ConversionStats::default(),
        blocks: Vec::new(),
    };

    for (index, cell) in notebook.cells.iter().enumerate() {
        renderer.render_cell(index, cell);
    }

    let CellRenderer { blocks, stats, .. } = renderer;
    let mut body = blocks.join("\n\n");
    if !body.is_empty() {
        body.push('\n');
    }
    (body, stats)
}

/// Placeholder block for an image output
#[must_use]
pub fn image_placeholder(mime: &str, dialect: Dialect) -> String {
    let label = image_label(mime);
    match dialect {
        Dialect::Mdx => {
            format!(":::note Output\nImage output ({label} data) - {IMAGE_NOTE}\n:::")
        }
        Dialect::Markdown => {
            format!("> **Output:** Image output ({label} data) - {IMAGE_NOTE}")
        }
    }
}

/// `image/png` → `PNG`, `image/svg+xml` → `SVG`
fn image_label(mime: &str) -> String {
    let subtype = mime.strip_prefix("image/").unwrap_or(mime);
    match subtype {
        "jpeg" | "jpg" => "JPEG".to_string(),
        other => other
            .split(['+', ';'])
            .next()
            .unwrap_or(other)
            .to_uppercase(),
    }
}

struct CellRenderer {
    dialect: Dialect,
    language: String,
    sanitizer: Sanitizer,
    stats: ConversionStats,
    blocks: Vec<String>,
}

impl CellRenderer {
    fn render_cell(&mut self, index: usize, cell: &Cell) {
        match cell {
            Cell::Markdown(text) => self.render_markdown(index, text),
            Cell::Code(code) => self.render_code(index, code),
            Cell::Raw(raw) => {
                if raw.source.trim().is_empty() {
                    self.skip_empty(index);
                } else {
                    self.stats.raw_cells += 1;
                    self.blocks.push(fenced_block("", &raw.source));
                }
            }
            Cell::Unsupported { cell_type } => {
                warn!("Skipping cell {index}: unsupported cell type '{cell_type}'");
                self.stats.unsupported_cells += 1;
            }
        }
    }

    fn skip_empty(&mut self, index: usize) {
        debug!("Skipping empty cell {index}");
        self.stats.empty_cells += 1;
    }

    fn render_markdown(&mut self, index: usize, cell: &TextCell) {
        if cell.source.trim().is_empty() {
            self.skip_empty(index);
            return;
        }
        let (text, report) = self.sanitizer.sanitize_with_report(&cell.source);
        self.stats.sanitizer += report;
        self.stats.markdown_cells += 1;
        self.blocks.push(
            text.trim_start_matches(['\n', '\r'])
                .trim_end()
                .to_string(),
        );
    }

    fn render_code(&mut self, index: usize, cell: &CodeCell) {
        let has_source = !cell.source.trim().is_empty();
        if !has_source && cell.outputs.is_empty() {
            self.skip_empty(index);
            return;
        }
        self.stats.code_cells += 1;
        if has_source {
            self.blocks.push(fenced_block(&self.language, &cell.source));
        }
        for output in &cell.outputs {
            let before = self.blocks.len();
            self.render_output(output);
            if self.blocks.len() > before {
                self.stats.outputs_rendered += 1;
            } else {
                debug!("Cell {index}: skipped output without renderable content");
                self.stats.outputs_skipped += 1;
            }
        }
    }

    fn render_output(&mut self, output: &Output) {
        match output {
            Output::Stream { text, .. } => {
                let text = strip_ansi(text);
                if !text.trim().is_empty() {
                    self.blocks.push(fenced_block("", &text));
                }
            }
            Output::ExecuteResult { data, .. } | Output::DisplayData { data } => {
                self.render_mime_bundle(data);
            }
            Output::Error {
                ename,
                evalue,
                traceback,
            } => {
                let body = if traceback.is_empty() {
                    format!("{ename}: {evalue}")
                } else {
                    strip_ansi(&traceback.join("\n")).into_owned()
                };
                self.blocks
                    .push(fenced_block("python", &format!("# Error:\n{body}")));
            }
            Output::Unknown => {}
        }
    }

    /// Plain text, then images, then HTML; one block per key present
    fn render_mime_bundle(&mut self, data: &MimeBundle) {
        if let Some(plain) = data.get("text/plain") {
            let plain = strip_ansi(plain);
            if !plain.trim().is_empty() {
                self.blocks.push(fenced_block("", &plain));
            }
        }
        for (mime, _) in data.iter().filter(|(mime, _)| mime.starts_with("image/")) {
            self.stats.image_placeholders += 1;
            self.blocks.push(image_placeholder(mime, self.dialect));
        }
        if let Some(html) = data.get("text/html") {
            if !html.trim().is_empty() {
                self.blocks.push(fenced_block("html", html));
            }
        }
    }
}
