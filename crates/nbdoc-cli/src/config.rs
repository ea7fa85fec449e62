//! `.nbdoc.toml` configuration files.
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--format`, `--output-dir`, ...)
//! 2. Project config (`./.nbdoc.toml`)
//! 3. User config (`~/.nbdoc.toml`)
//! 4. Built-in defaults
//!
//! Sections merge field by field, so a project file that only sets
//! `convert.dialect` keeps the user's `convert.output_dir`.

use anyhow::{Context, Result};
use colored::Colorize;
use nbdoc_core::{ConvertOptions, Dialect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory
pub const CONFIG_FILE_NAME: &str = ".nbdoc.toml";

/// Merged configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Defaults for `convert` and `batch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert: Option<ConvertConfig>,

    /// Frontmatter description extraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionConfig>,

    /// Defaults for `batch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Output dialect (mdx or markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,

    /// Fence language for code cells when the notebook names none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Directory for converted pages (default: next to the input)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Lines longer than this are replaced with a note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_chars: Option<usize>,

    /// `sidebar_position` written into every frontmatter block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_chars: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,

    /// Description used when a notebook has no usable prose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Stop at the first failed file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    /// Worker threads (0 = one per core)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,

    /// Keep a `.backup` copy of pages that get overwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
}

/// Copy every field `other` sets over the fields of `self`
trait Overlay {
    fn overlay(&mut self, other: Self);
}

macro_rules! impl_overlay {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl Overlay for $ty {
            fn overlay(&mut self, other: Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            }
        }
    };
}

impl_overlay!(ConvertConfig { dialect, language, output_dir, max_line_chars, sidebar_position });
impl_overlay!(DescriptionConfig { min_chars, max_chars, fallback });
impl_overlay!(BatchConfig { fail_fast, parallel, backup });

fn overlay_section<T: Overlay + Default>(base: &mut Option<T>, other: Option<T>) {
    if let Some(other) = other {
        base.get_or_insert_with(T::default).overlay(other);
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this schema.
    /// Parse errors are also explained on stderr.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  [convert]");
            eprintln!("  dialect = \"mdx\"       # mdx or markdown");
            eprintln!("  output_dir = \"docs\"");
            eprintln!();
            eprintln!("  Run 'nbdoc config init' to write a commented template");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })?;

        Ok(config)
    }

    /// Find and load configuration files.
    /// Returns (`user_config`, `project_config`)
    #[must_use]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        (Self::load_user_config(), Self::load_project_config())
    }

    /// Load and merge the user and project configs
    #[must_use]
    pub fn discover() -> Self {
        let (user, project) = Self::discover_configs();
        Self::merge(user, project)
    }

    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    fn load_user_config() -> Option<Self> {
        Self::load_optional(&Self::user_config_path()?, "user")
    }

    fn load_project_config() -> Option<Self> {
        Self::load_optional(&Self::project_config_path(), "project")
    }

    /// A broken config file is reported and ignored
    fn load_optional(path: &Path, scope: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("Loaded {scope} config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!(
                    "{} Failed to load {scope} config from {}: {e}",
                    "Warning:".yellow().bold(),
                    path.display(),
                );
                None
            }
        }
    }

    /// Merge configs with precedence: project config > user config
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = Self::default();
        for config in [user_config, project_config].into_iter().flatten() {
            overlay_section(&mut merged.convert, config.convert);
            overlay_section(&mut merged.description, config.description);
            overlay_section(&mut merged.batch, config.batch);
        }
        merged
    }

    fn convert_section(&self) -> ConvertConfig {
        self.convert.clone().unwrap_or_default()
    }

    fn batch_section(&self) -> BatchConfig {
        self.batch.clone().unwrap_or_default()
    }

    /// Dialect from the CLI, then the config, then MDX.
    ///
    /// # Errors
    ///
    /// Fails if the configured dialect is not a known name.
    pub fn resolve_dialect(&self, cli_value: Option<Dialect>) -> Result<Dialect> {
        if let Some(dialect) = cli_value {
            return Ok(dialect);
        }
        match self.convert_section().dialect {
            Some(name) => name
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{CONFIG_FILE_NAME}: convert.dialect: {e}")),
            None => Ok(Dialect::default()),
        }
    }

    /// Output directory from the CLI, then the config; `None` means next to the input
    #[must_use]
    pub fn resolve_output_dir(&self, cli_value: Option<PathBuf>) -> Option<PathBuf> {
        cli_value.or_else(|| self.convert_section().output_dir)
    }

    #[must_use]
    pub fn resolve_fail_fast(&self, cli_value: bool) -> bool {
        cli_value || self.batch_section().fail_fast.unwrap_or(false)
    }

    #[must_use]
    pub fn resolve_backup(&self, cli_value: bool) -> bool {
        cli_value || self.batch_section().backup.unwrap_or(false)
    }

    #[must_use]
    pub fn resolve_parallel(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.batch_section().parallel).unwrap_or(0)
    }

    /// Converter options with config values applied over the defaults
    #[must_use]
    pub fn convert_options(&self, dialect: Dialect, language: Option<String>) -> ConvertOptions {
        let mut options = ConvertOptions {
            dialect,
            ..ConvertOptions::default()
        };
        let convert = self.convert_section();
        if let Some(language) = language.or(convert.language) {
            options.default_language = language;
        }
        if let Some(max) = convert.max_line_chars {
            options.max_line_chars = max;
        }
        options.sidebar_position = convert.sidebar_position;

        if let Some(description) = &self.description {
            if let Some(min) = description.min_chars {
                options.description.min_chars = min;
            }
            if let Some(max) = description.max_chars {
                options.description.max_chars = max;
            }
            if let Some(fallback) = &description.fallback {
                options.description.fallback.clone_from(fallback);
            }
        }
        options
    }
}

/// Commented template written by `nbdoc config init`
pub const CONFIG_TEMPLATE: &str = r#"# nbdoc configuration
#
# Project config: ./.nbdoc.toml (overrides the user config)
# User config:    ~/.nbdoc.toml
# Command-line flags override both.

[convert]
# Output dialect: "mdx" (Docusaurus) or "markdown"
dialect = "mdx"
# Fence language for code cells when the notebook does not name one
language = "python"
# Directory for converted pages (default: next to each input)
# output_dir = "docs/notebooks"
# Lines longer than this are replaced with a note
max_line_chars = 2000
# sidebar_position = 1

[description]
# A prose line must be longer than this to become the description
min_chars = 20
# Longer descriptions are cut and end in "..."
max_chars = 150
# fallback = "Jupyter notebook converted to documentation"

[batch]
# Stop at the first failed file
fail_fast = false
# Worker threads (0 = one per core)
parallel = 0
# Keep a .backup copy of pages that get overwritten
backup = false
"#;
