//! API reference stub pages generated from a static TOML manifest.
//!
//! The manifest lists every documented symbol explicitly: nothing is
//! discovered by importing or inspecting code. It describes three kinds of
//! page:
//!
//! - `[[page]]`: a reference page with sections of entries (signature plus
//!   description)
//! - `[[module]]`: a stub page for a module with a usage snippet
//! - `[[index]]`: a landing page linking every module of a group
//!
//! ```toml
//! language = "python"
//! import_line = "import pixeltable as pxt"
//!
//! [[page]]
//! path = "core/core.mdx"
//! title = "Core API"
//! intro = "Tables, views and directories."
//!
//! [[page.section]]
//! heading = "Table Operations"
//!
//! [[page.section.entry]]
//! name = "create_table"
//! signature = "create_table(path: str, schema: dict | None = None)"
//! description = "Create a new base table."
//! ```

use crate::error::{ConvertError, Result};
use crate::format::Dialect;
use crate::frontmatter::Frontmatter;
use crate::metadata::clean_description;
use crate::sanitize::sanitize;
use crate::text::{fenced_block, title_case};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::fs;
use std::path::{Component, Path, PathBuf};

const DESCRIPTION_CHARS: usize = 150;

/// Kind of documented symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Function,
    Class,
    Exception,
    Constant,
}

/// One documented symbol
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiEntry {
    pub name: String,
    /// Defaults to `name()` for functions and `class name` otherwise
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: EntryKind,
}

impl ApiEntry {
    fn signature(&self) -> String {
        match (&self.signature, self.kind) {
            (Some(signature), _) if !signature.trim().is_empty() => signature.trim().to_string(),
            (_, EntryKind::Function) => format!("{}()", self.name),
            (_, EntryKind::Constant) => self.name.clone(),
            (_, EntryKind::Class | EntryKind::Exception) => format!("class {}", self.name),
        }
    }
}

/// Titled group of entries on a reference page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSection {
    pub heading: String,
    #[serde(default, rename = "entry")]
    pub entries: Vec<ApiEntry>,
}

/// Reference page with sections of entries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiPage {
    pub path: PathBuf,
    pub title: String,
    #[serde(default)]
    pub sidebar_position: Option<i64>,
    #[serde(default)]
    pub intro: String,
    #[serde(default, rename = "section")]
    pub sections: Vec<ApiSection>,
}

/// Stub page for a module
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleStub {
    pub path: PathBuf,
    pub name: String,
    /// Defaults to the title-cased `name`
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Expression the usage snippet calls through, e.g. `pxt.functions.image`
    pub access_path: String,
    /// Index group this module is listed under
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub sidebar_position: Option<i64>,
}

impl ModuleStub {
    #[must_use]
    pub fn display_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| title_case(&self.name))
    }
}

/// Landing page linking the modules of one group
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexPage {
    pub path: PathBuf,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub group: String,
    #[serde(default)]
    pub sidebar_position: Option<i64>,
}

/// Static description of an API reference
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiManifest {
    /// Language tag for signature and usage code blocks
    #[serde(default = "default_language")]
    pub language: String,
    /// First line of every usage snippet
    #[serde(default)]
    pub import_line: Option<String>,
    #[serde(default, rename = "page")]
    pub pages: Vec<ApiPage>,
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleStub>,
    #[serde(default, rename = "index")]
    pub indexes: Vec<IndexPage>,
}

fn default_language() -> String {
    "python".to_string()
}

impl ApiManifest {
    /// Decode and validate a manifest
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Manifest`] if the TOML does not decode, a
    /// page path is absolute or leaves the output directory, or two pages
    /// share a path.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read a manifest file
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::IoError`] if the file cannot be read, and
    /// [`ConvertError::Manifest`] as for [`ApiManifest::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    fn page_paths(&self) -> impl Iterator<Item = &Path> {
        self.pages
            .iter()
            .map(|page| page.path.as_path())
            .chain(self.modules.iter().map(|module| module.path.as_path()))
            .chain(self.indexes.iter().map(|index| index.path.as_path()))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for path in self.page_paths() {
            let escapes = path.components().any(|component| {
                !matches!(component, Component::Normal(_) | Component::CurDir)
            });
            if path.as_os_str().is_empty() || escapes {
                return Err(ConvertError::Manifest(format!(
                    "page path must be relative and inside the output directory: {}",
                    path.display()
                )));
            }
            if !seen.insert(path) {
                return Err(ConvertError::Manifest(format!(
                    "duplicate page path: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// One generated file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub path: PathBuf,
    pub content: String,
}

/// Render every page of `manifest` as MDX, in manifest order: pages,
/// modules, indexes
#[must_use]
pub fn generate(manifest: &ApiManifest) -> Vec<GeneratedPage> {
    generate_with(manifest, Dialect::Mdx)
}

/// Render every page of `manifest` for `dialect`
#[must_use]
pub fn generate_with(manifest: &ApiManifest, dialect: Dialect) -> Vec<GeneratedPage> {
    let writer = PageWriter { manifest, dialect };
    let pages = manifest.pages.iter().map(|page| GeneratedPage {
        path: page.path.clone(),
        content: writer.reference_page(page),
    });
    let modules = manifest.modules.iter().map(|module| GeneratedPage {
        path: module.path.clone(),
        content: writer.module_page(module),
    });
    let indexes = manifest.indexes.iter().map(|index| GeneratedPage {
        path: index.path.clone(),
        content: writer.index_page(index),
    });
    pages.chain(modules).chain(indexes).collect()
}

struct PageWriter<'m> {
    manifest: &'m ApiManifest,
    dialect: Dialect,
}

impl PageWriter<'_> {
    fn header(&self, title: &str, description: &str, position: Option<i64>) -> String {
        let description = if description.trim().is_empty() {
            title.to_string()
        } else {
            clean_description(description, DESCRIPTION_CHARS)
        };
        let mut out = Frontmatter::new(title, description)
            .with_sidebar_position(position)
            .render();
        let _ = writeln!(out, "# {}\n", self.prose(title));
        out
    }

    fn prose(&self, text: &str) -> String {
        sanitize(text.trim(), self.dialect)
    }

    fn reference_page(&self, page: &ApiPage) -> String {
        let mut out = self.header(&page.title, &page.intro, page.sidebar_position);
        if !page.intro.trim().is_empty() {
            let _ = writeln!(out, "{}\n", self.prose(&page.intro));
        }
        for section in &page.sections {
            let _ = writeln!(out, "## {}\n", self.prose(&section.heading));
            for entry in &section.entries {
                let _ = writeln!(out, "### {}\n", self.prose(&entry.name));
                let _ = writeln!(
                    out,
                    "{}\n",
                    fenced_block(&self.manifest.language, &entry.signature())
                );
                if !entry.description.trim().is_empty() {
                    let _ = writeln!(out, "{}\n", self.prose(&entry.description));
                }
                out.push_str("---\n\n");
            }
        }
        finish(out)
    }

    fn module_page(&self, module: &ModuleStub) -> String {
        let title = module.display_name();
        let mut out = self.header(&title, &module.description, module.sidebar_position);
        if !module.description.trim().is_empty() {
            let _ = writeln!(out, "{}\n", self.prose(&module.description));
        }
        out.push_str("*Detailed reference for this module is not generated yet.*\n\n");
        out.push_str("## Usage\n\n");

        let mut usage = String::new();
        if let Some(import_line) = &self.manifest.import_line {
            let _ = writeln!(usage, "{import_line}\n");
        }
        let _ = write!(
            usage,
            "# Access functions from this module\n{}.<function_name>()",
            module.access_path
        );
        out.push_str(&fenced_block(&self.manifest.language, &usage));
        out.push('\n');
        out
    }

    fn index_page(&self, index: &IndexPage) -> String {
        let mut out = self.header(&index.title, &index.description, index.sidebar_position);
        if !index.description.trim().is_empty() {
            let _ = writeln!(out, "{}\n", self.prose(&index.description));
        }

        let members: Vec<&ModuleStub> = self
            .manifest
            .modules
            .iter()
            .filter(|module| module.group.as_deref() == Some(index.group.as_str()))
            .collect();
        if members.is_empty() {
            out.push_str("*See the individual module pages for detailed documentation.*\n");
            return out;
        }

        out.push_str("## Available Modules\n\n");
        for module in members {
            let link = relative_link(&index.path, &module.path);
            let _ = write!(out, "- **[{}]({link})**", self.prose(&module.display_name()));
            if module.description.trim().is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, ": {}", self.prose(&module.description));
            }
        }
        out
    }
}

/// Trim the trailing separator and blank lines down to one newline
fn finish(mut out: String) -> String {
    let trimmed = out.trim_end().trim_end_matches("---").trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// Link from the page at `from` to the page at `to`, without extension
fn relative_link(from: &Path, to: &Path) -> String {
    let from_dir: Vec<_> = from
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let target = to.with_extension("");
    let to_parts: Vec<_> = target.components().collect();

    let common = from_dir
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let mut link = String::new();
    if common == from_dir.len() {
        link.push_str("./");
    } else {
        for _ in common..from_dir.len() {
            link.push_str("../");
        }
    }
    let rest: Vec<String> = to_parts[common..]
        .iter()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    link.push_str(&rest.join("/"));
    link
}
