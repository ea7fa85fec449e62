use crate::error::{NotebookError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parsed Jupyter Notebook content
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    /// Container format version (major, minor)
    pub nbformat: (u32, u32),
    /// Notebook-level metadata
    pub metadata: NotebookMetadata,
    /// Cells in document order
    pub cells: Vec<Cell>,
}

impl Notebook {
    /// Wrap a plain markdown document as a single-cell notebook.
    ///
    /// Lets already-written `.md` pages go through the same rendering
    /// pipeline as real notebooks.
    #[must_use]
    pub fn from_markdown(text: impl Into<String>) -> Self {
        Self {
            nbformat: (4, 5),
            metadata: NotebookMetadata::default(),
            cells: vec![Cell::Markdown(TextCell {
                id: None,
                source: text.into(),
            })],
        }
    }

    /// Iterate over the markdown cells only, in order
    pub fn markdown_cells(&self) -> impl Iterator<Item = &TextCell> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Markdown(text) => Some(text),
            _ => None,
        })
    }
}

/// Notebook-level metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotebookMetadata {
    /// Explicit title (`metadata.title`)
    pub title: Option<String>,
    /// Explicit description (`metadata.description`)
    pub description: Option<String>,
    /// Source language (`language_info.name`, else `kernelspec.language`)
    pub language: Option<String>,
    /// Kernel name (e.g., "python3", "ir")
    pub kernel_name: Option<String>,
    /// List of author names
    pub authors: Vec<String>,
    /// The raw metadata mapping
    pub raw: Map<String, Value>,
}

impl NotebookMetadata {
    fn from_map(raw: Map<String, Value>) -> Self {
        let str_field = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let nested = |outer: &str, inner: &str| {
            raw.get(outer)
                .and_then(|v| v.get(inner))
                .and_then(Value::as_str)
                .map(String::from)
        };

        let title = str_field("title");
        let description = str_field("description");
        let language =
            nested("language_info", "name").or_else(|| nested("kernelspec", "language"));
        let kernel_name = nested("kernelspec", "name");

        let authors = raw
            .get("authors")
            .and_then(Value::as_array)
            .map(|authors| {
                authors
                    .iter()
                    .filter_map(|a| match a {
                        Value::String(name) => Some(name.clone()),
                        other => other.get("name").and_then(Value::as_str).map(String::from),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title,
            description,
            language,
            kernel_name,
            authors,
            raw,
        }
    }
}

/// A single notebook cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Markdown documentation cell
    Markdown(TextCell),
    /// Executable code cell with its outputs
    Code(CodeCell),
    /// Raw text cell (no formatting)
    Raw(TextCell),
    /// A cell type this parser does not know; kept so callers can count it
    Unsupported {
        /// The `cell_type` value found in the document
        cell_type: String,
    },
}

impl Cell {
    /// Cell type, or `None` for unsupported cells
    #[inline]
    #[must_use]
    pub const fn cell_type(&self) -> Option<CellType> {
        match self {
            Self::Markdown(_) => Some(CellType::Markdown),
            Self::Code(_) => Some(CellType::Code),
            Self::Raw(_) => Some(CellType::Raw),
            Self::Unsupported { .. } => None,
        }
    }

    /// Concatenated source text (empty for unsupported cells)
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Markdown(cell) | Self::Raw(cell) => &cell.source,
            Self::Code(cell) => &cell.source,
            Self::Unsupported { .. } => "",
        }
    }
}

/// Markdown or raw cell payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct TextCell {
    /// Unique cell identifier (nbformat 4.5+)
    #[serde(default)]
    pub id: Option<String>,
    /// Cell source content
    #[serde(default, deserialize_with = "multiline")]
    pub source: String,
}

/// Code cell payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct CodeCell {
    /// Unique cell identifier (nbformat 4.5+)
    #[serde(default)]
    pub id: Option<String>,
    /// Cell source content
    #[serde(default, deserialize_with = "multiline")]
    pub source: String,
    /// Execution count for executed cells
    #[serde(default)]
    pub execution_count: Option<i64>,
    /// Cell outputs, in execution order
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// Type of notebook cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Executable code cell
    #[default]
    Code,
    /// Markdown documentation cell
    Markdown,
    /// Raw text cell (no formatting)
    Raw,
}

impl std::fmt::Display for CellType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "code" => Ok(Self::Code),
            "markdown" | "md" => Ok(Self::Markdown),
            "raw" | "text" => Ok(Self::Raw),
            _ => Err(format!(
                "Unknown cell type '{s}'. Expected: code, markdown, raw"
            )),
        }
    }
}

/// Cell output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// stdout/stderr text
    Stream {
        /// Stream name (`stdout` or `stderr`)
        #[serde(default)]
        name: String,
        /// Captured text
        #[serde(default, deserialize_with = "multiline")]
        text: String,
    },
    /// Value of the last expression in the cell
    ExecuteResult {
        /// Execution counter the result belongs to
        #[serde(default)]
        execution_count: Option<i64>,
        /// Representations keyed by MIME type
        #[serde(default)]
        data: MimeBundle,
    },
    /// Rich display data (images, HTML, etc.)
    DisplayData {
        /// Representations keyed by MIME type
        #[serde(default)]
        data: MimeBundle,
    },
    /// Raised exception
    Error {
        /// Exception class name
        #[serde(default)]
        ename: String,
        /// Exception message
        #[serde(default)]
        evalue: String,
        /// Formatted traceback lines
        #[serde(default)]
        traceback: Vec<String>,
    },
    /// Any other `output_type`
    #[serde(other)]
    Unknown,
}

impl Output {
    /// Output type, or `None` for unknown outputs
    #[inline]
    #[must_use]
    pub const fn output_type(&self) -> Option<OutputType> {
        match self {
            Self::Stream { .. } => Some(OutputType::Stream),
            Self::ExecuteResult { .. } => Some(OutputType::ExecuteResult),
            Self::DisplayData { .. } => Some(OutputType::DisplayData),
            Self::Error { .. } => Some(OutputType::Error),
            Self::Unknown => None,
        }
    }
}

/// Type of cell output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// Stream output (stdout/stderr)
    #[default]
    Stream,
    /// Rich display data (images, HTML, etc.)
    DisplayData,
    /// Result of code execution
    ExecuteResult,
    /// Error traceback
    Error,
}

impl std::fmt::Display for OutputType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stream => "stream",
            Self::DisplayData => "display_data",
            Self::ExecuteResult => "execute_result",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "stream" | "stdout" | "stderr" => Ok(Self::Stream),
            "display_data" | "displaydata" | "display" => Ok(Self::DisplayData),
            "execute_result" | "executeresult" | "result" => Ok(Self::ExecuteResult),
            "error" | "traceback" => Ok(Self::Error),
            _ => Err(format!(
                "Unknown output type '{s}'. Expected: stream, display_data, execute_result, error"
            )),
        }
    }
}

/// MIME type → payload text, ordered by key.
///
/// Multi-fragment payloads are joined; JSON payloads (`application/json`,
/// widget state, ...) keep their compact JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MimeBundle(BTreeMap<String, String>);

impl MimeBundle {
    /// Payload for an exact MIME key
    #[must_use]
    pub fn get(&self, mime: &str) -> Option<&str> {
        self.0.get(mime).map(String::as_str)
    }

    /// All `(mime, payload)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of representations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no representations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for MimeBundle {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for MimeBundle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw
            .into_iter()
            .map(|(mime, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Array(parts) if parts.iter().all(Value::is_string) => parts
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<String>(),
                    other => other.to_string(),
                };
                (mime, text)
            })
            .collect())
    }
}

/// Accept both `"text"` and `["te", "xt"]` encodings
fn multiline<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Multiline {
        Text(String),
        Fragments(Vec<String>),
    }

    Ok(match Option::<Multiline>::deserialize(deserializer)? {
        Some(Multiline::Text(text)) => text,
        Some(Multiline::Fragments(parts)) => parts.concat(),
        None => String::new(),
    })
}

#[derive(Deserialize)]
struct Container {
    #[serde(default)]
    nbformat: Option<u32>,
    #[serde(default)]
    nbformat_minor: Option<u32>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(default)]
    cells: Option<Value>,
}

/// Parse a Jupyter Notebook from a file path
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The notebook container is malformed or of an unsupported version
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook<P: AsRef<Path>>(path: P) -> Result<Notebook> {
    let bytes = fs::read(path)?;
    parse_notebook_from_slice(&bytes)
}

/// Parse a Jupyter Notebook from a string
///
/// # Errors
///
/// Returns an error if the notebook container is malformed or of an
/// unsupported version.
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook_from_str(content: &str) -> Result<Notebook> {
    parse_notebook_from_slice(content.as_bytes())
}

/// Parse a Jupyter Notebook from raw bytes
///
/// # Errors
///
/// Returns an error if the notebook container is malformed or of an
/// unsupported version.
#[must_use = "this function returns a parsed notebook that should be processed"]
pub fn parse_notebook_from_slice(bytes: &[u8]) -> Result<Notebook> {
    let container: Container = serde_json::from_slice(bytes)?;

    let major = container.nbformat.unwrap_or(4);
    let minor = container.nbformat_minor.unwrap_or(0);
    if major < 4 {
        return Err(NotebookError::UnsupportedVersion { major, minor });
    }

    let raw_cells = match container.cells {
        Some(Value::Array(cells)) => cells,
        Some(_) => {
            return Err(NotebookError::MalformedInput(
                "`cells` is not an array".to_string(),
            ))
        }
        None => {
            return Err(NotebookError::MalformedInput(
                "missing `cells` array".to_string(),
            ))
        }
    };

    let cells = raw_cells
        .into_iter()
        .enumerate()
        .map(|(index, raw)| extract_cell(index, raw))
        .collect::<Result<Vec<_>>>()?;

    let metadata = NotebookMetadata::from_map(container.metadata.unwrap_or_default());

    log::debug!(
        "Parsed notebook: {} cells (nbformat {major}.{minor})",
        cells.len()
    );

    Ok(Notebook {
        nbformat: (major, minor),
        metadata,
        cells,
    })
}

/// Decode one cell, dispatching on its `cell_type`
fn extract_cell(index: usize, raw: Value) -> Result<Cell> {
    let cell_type = match raw.get("cell_type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => {
            return Err(NotebookError::MalformedInput(format!(
                "cell {index}: `cell_type` is not a string"
            )))
        }
        None if raw.is_object() => {
            return Err(NotebookError::MalformedInput(format!(
                "cell {index}: missing `cell_type`"
            )))
        }
        None => {
            return Err(NotebookError::MalformedInput(format!(
                "cell {index}: not an object"
            )))
        }
    };

    let malformed =
        |e: serde_json::Error| NotebookError::MalformedInput(format!("cell {index}: {e}"));

    let cell = match cell_type.as_str() {
        "markdown" => Cell::Markdown(serde_json::from_value(raw).map_err(malformed)?),
        "code" => Cell::Code(serde_json::from_value(raw).map_err(malformed)?),
        "raw" => Cell::Raw(serde_json::from_value(raw).map_err(malformed)?),
        _ => Cell::Unsupported { cell_type },
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_notebook() {
        let notebook_json = r##"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {
                "kernelspec": {
                    "name": "python3",
                    "display_name": "Python 3",
                    "language": "python"
                },
                "language_info": {
                    "name": "python",
                    "version": "3.9.0"
                }
            },
            "cells": [
                {
                    "id": "cell-1",
                    "cell_type": "markdown",
                    "metadata": {},
                    "source": ["# Hello World\n", "This is a test notebook."]
                },
                {
                    "id": "cell-2",
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["print(\"Hello, World!\")"],
                    "outputs": [
                        {
                            "output_type": "stream",
                            "name": "stdout",
                            "text": ["Hello, World!\n"]
                        }
                    ]
                }
            ]
        }"##;

        let result = parse_notebook_from_str(notebook_json);
        assert!(
            result.is_ok(),
            "Failed to parse notebook: {:?}",
            result.err()
        );

        let notebook = result.unwrap();
        assert_eq!(notebook.nbformat, (4, 5));
        assert_eq!(notebook.cells.len(), 2);
        assert_eq!(notebook.cells[0].cell_type(), Some(CellType::Markdown));
        assert_eq!(notebook.cells[1].cell_type(), Some(CellType::Code));
        assert_eq!(
            notebook.cells[0].source(),
            "# Hello World\nThis is a test notebook."
        );
        assert_eq!(notebook.metadata.kernel_name, Some("python3".to_string()));
        assert_eq!(notebook.metadata.language, Some("python".to_string()));
    }

    #[test]
    fn test_source_as_plain_string() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 2,
            "metadata": {},
            "cells": [
                {"cell_type": "raw", "metadata": {}, "source": "raw text"}
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert_eq!(notebook.cells[0].cell_type(), Some(CellType::Raw));
        assert_eq!(notebook.cells[0].source(), "raw text");
    }

    #[test]
    fn test_extract_code_output() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "id": "cell-1",
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["2 + 2"],
                    "outputs": [
                        {
                            "output_type": "execute_result",
                            "execution_count": 1,
                            "data": {
                                "text/plain": "4",
                                "text/html": ["<b>", "4", "</b>"],
                                "application/json": {"value": 4}
                            },
                            "metadata": {}
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let Cell::Code(code) = &notebook.cells[0] else {
            panic!("expected code cell");
        };
        assert_eq!(code.execution_count, Some(1));
        assert_eq!(code.outputs.len(), 1);
        let Output::ExecuteResult { data, .. } = &code.outputs[0] else {
            panic!("expected execute_result");
        };
        assert_eq!(data.get("text/plain"), Some("4"));
        assert_eq!(data.get("text/html"), Some("<b>4</b>"));
        assert_eq!(data.get("application/json"), Some(r#"{"value":4}"#));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_error_output() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {
                    "id": "cell-1",
                    "cell_type": "code",
                    "metadata": {},
                    "execution_count": 1,
                    "source": ["1 / 0"],
                    "outputs": [
                        {
                            "output_type": "error",
                            "ename": "ZeroDivisionError",
                            "evalue": "division by zero",
                            "traceback": [
                                "Traceback (most recent call last):",
                                "ZeroDivisionError: division by zero"
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let Cell::Code(code) = &notebook.cells[0] else {
            panic!("expected code cell");
        };
        assert_eq!(code.outputs[0].output_type(), Some(OutputType::Error));
        match &code.outputs[0] {
            Output::Error {
                ename, traceback, ..
            } => {
                assert_eq!(ename, "ZeroDivisionError");
                assert_eq!(traceback.len(), 2);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_cell_and_output_types_are_kept() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [
                {"cell_type": "heading", "level": 1, "source": "Old"},
                {
                    "cell_type": "code",
                    "source": "x",
                    "outputs": [{"output_type": "pyout", "text": "1"}]
                }
            ]
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        assert_eq!(
            notebook.cells[0],
            Cell::Unsupported {
                cell_type: "heading".to_string()
            }
        );
        assert_eq!(notebook.cells[0].cell_type(), None);
        let Cell::Code(code) = &notebook.cells[1] else {
            panic!("expected code cell");
        };
        assert_eq!(code.outputs, vec![Output::Unknown]);
    }

    #[test]
    fn test_metadata_title_description_authors() {
        let notebook_json = r#"{
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {
                "title": "  Explicit Title ",
                "description": "Explicit description",
                "authors": [{"name": "Ada"}, "Grace"],
                "kernelspec": {"name": "ir", "language": "R"}
            },
            "cells": []
        }"#;

        let notebook = parse_notebook_from_str(notebook_json).unwrap();
        let meta = &notebook.metadata;
        assert_eq!(meta.title.as_deref(), Some("Explicit Title"));
        assert_eq!(meta.description.as_deref(), Some("Explicit description"));
        assert_eq!(meta.authors, vec!["Ada".to_string(), "Grace".to_string()]);
        assert_eq!(meta.language.as_deref(), Some("R"));
        assert_eq!(meta.kernel_name.as_deref(), Some("ir"));
        assert!(meta.raw.contains_key("kernelspec"));
    }

    #[test]
    fn test_malformed_input() {
        let err = parse_notebook_from_str("{ not json").unwrap_err();
        assert!(matches!(err, NotebookError::MalformedInput(_)));

        let err = parse_notebook_from_str(r#"{"nbformat": 4, "metadata": {}}"#).unwrap_err();
        assert!(err.to_string().contains("missing `cells`"));

        let err = parse_notebook_from_str(r#"{"nbformat": 4, "cells": {}}"#).unwrap_err();
        assert!(matches!(err, NotebookError::MalformedInput(_)));

        let err = parse_notebook_from_str(r#"{"cells": [42]}"#).unwrap_err();
        assert!(err.to_string().contains("cell 0"));

        let err =
            parse_notebook_from_str(r#"{"cells": [{"cell_type": "code", "source": 7}]}"#)
                .unwrap_err();
        assert!(err.to_string().contains("cell 0"));
    }

    #[test]
    fn test_unsupported_version() {
        let err =
            parse_notebook_from_str(r#"{"nbformat": 3, "nbformat_minor": 0, "worksheets": []}"#)
                .unwrap_err();
        assert!(matches!(
            err,
            NotebookError::UnsupportedVersion { major: 3, minor: 0 }
        ));
    }

    #[test]
    fn test_from_markdown() {
        let notebook = Notebook::from_markdown("# Title\n\nBody");
        assert_eq!(notebook.cells.len(), 1);
        assert_eq!(notebook.markdown_cells().count(), 1);
        assert_eq!(notebook.cells[0].source(), "# Title\n\nBody");
    }

    #[test]
    fn test_cell_type_display() {
        assert_eq!(format!("{}", CellType::Code), "code");
        assert_eq!(format!("{}", CellType::Markdown), "markdown");
        assert_eq!(format!("{}", CellType::Raw), "raw");
    }

    #[test]
    fn test_output_type_display() {
        assert_eq!(format!("{}", OutputType::Stream), "stream");
        assert_eq!(format!("{}", OutputType::DisplayData), "display_data");
        assert_eq!(format!("{}", OutputType::ExecuteResult), "execute_result");
        assert_eq!(format!("{}", OutputType::Error), "error");
    }

    #[test]
    fn test_cell_type_from_str() {
        assert_eq!("code".parse::<CellType>().unwrap(), CellType::Code);
        assert_eq!("markdown".parse::<CellType>().unwrap(), CellType::Markdown);
        assert_eq!("raw".parse::<CellType>().unwrap(), CellType::Raw);

        // Short aliases
        assert_eq!("md".parse::<CellType>().unwrap(), CellType::Markdown);
        assert_eq!("text".parse::<CellType>().unwrap(), CellType::Raw);

        // Case insensitive
        assert_eq!("CODE".parse::<CellType>().unwrap(), CellType::Code);
        assert_eq!("Markdown".parse::<CellType>().unwrap(), CellType::Markdown);

        assert!("invalid".parse::<CellType>().is_err());
    }

    #[test]
    fn test_output_type_from_str() {
        assert_eq!("stream".parse::<OutputType>().unwrap(), OutputType::Stream);
        assert_eq!("stderr".parse::<OutputType>().unwrap(), OutputType::Stream);
        assert_eq!(
            "display-data".parse::<OutputType>().unwrap(),
            OutputType::DisplayData
        );
        assert_eq!(
            "Execute_Result".parse::<OutputType>().unwrap(),
            OutputType::ExecuteResult
        );
        assert_eq!(
            "traceback".parse::<OutputType>().unwrap(),
            OutputType::Error
        );
        assert!("invalid".parse::<OutputType>().is_err());
    }
}
