// CLI handlers mirror their flags one-to-one and report counts for display.
#![allow(
    clippy::cast_possible_truncation,  // progress bar lengths - safe ranges
    clippy::cast_precision_loss,       // f64 sufficient for display purposes
    clippy::too_many_lines,            // CLI main() is necessarily large
    clippy::too_many_arguments,        // args mirror CLI options
    clippy::needless_pass_by_value,    // clap requires owned strings
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
    clippy::unnecessary_wraps,         // consistent Result return for CLI handlers
)]

//! nbdoc CLI - Notebook to MDX conversion tool
//!
//! Converts Jupyter notebooks into documentation pages and repairs pages
//! that a strict MDX compiler rejects.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use nbdoc_cli::config::CONFIG_TEMPLATE;
use nbdoc_cli::{
    check_destination, expand_glob_patterns, write_output, Config, SkipReason, CONFIG_FILE_NAME,
};
use nbdoc_core::{
    add_frontmatter, diagnose_with, ApiManifest, ConversionStats, Diagnostic,
    Dialect, InputFormat, NotebookConverter, RenderedDocument,
};
use nbdoc_notebook::{parse_notebook, Cell, Notebook};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if verbose output is requested
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Default `env_logger` filter; `RUST_LOG` overrides it
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

/// Output dialect flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum OutputFormat {
    /// MDX for Docusaurus (escapes braces and angle brackets)
    Mdx,
    /// Plain Markdown
    Markdown,
}

impl From<OutputFormat> for Dialect {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Mdx => Self::Mdx,
            OutputFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "nbdoc",
    about = "Convert Jupyter notebooks to MDX documentation pages",
    long_about = "Convert Jupyter notebooks to MDX (Docusaurus) or Markdown pages.\n\
                  \n\
                  Prose is escaped so a strict MDX compiler accepts it; code cells and\n\
                  outputs become fenced blocks; images become placeholders.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a notebook or Markdown file to one page
    #[command(long_about = "Convert a notebook (.ipynb) or Markdown file (.md, .mdx) to one page.\n\
                      \n\
                      The page is written next to the input with a slugified name\n\
                      (My Notebook.ipynb → my-notebook.mdx) unless -o or --output-dir is given.\n\
                      \n\
                      Examples:\n  \
                        nbdoc convert intro.ipynb\n  \
                        nbdoc convert intro.ipynb -o docs/intro.mdx --force\n  \
                        cat intro.ipynb | nbdoc convert - > intro.mdx")]
    Convert {
        /// Input file path, or '-' to read notebook JSON from stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file path.
        /// When reading from stdin, output goes to stdout unless -o is specified
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Directory for the page (default: next to the input, or from config)
        #[arg(long, value_name = "DIR", conflicts_with = "output")]
        output_dir: Option<PathBuf>,

        /// Output dialect (default: mdx, or from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Fence language for code cells when the notebook names none
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Overwrite an existing output file
        #[arg(long)]
        force: bool,

        /// Leave an existing output file alone and exit successfully
        #[arg(long, conflicts_with = "force")]
        no_clobber: bool,

        /// Keep a .backup copy of an output file that gets overwritten
        #[arg(long)]
        backup: bool,

        /// Show what would be written without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert many notebooks at once
    #[command(long_about = "Convert many notebooks and Markdown files.\n\
                      \n\
                      Inputs may be files, directories (searched recursively) or glob\n\
                      patterns. Failures are reported and the batch continues unless\n\
                      --fail-fast is given; the exit code is non-zero if any file failed.\n\
                      \n\
                      Examples:\n  \
                        nbdoc batch notebooks/ -o docs/notebooks\n  \
                        nbdoc batch 'tutorials/*.ipynb' --force --backup\n  \
                        find . -name '*.ipynb' | nbdoc batch --stdin -o docs")]
    Batch {
        /// Input files, directories or glob patterns
        #[arg(value_name = "INPUTS", required_unless_present = "stdin")]
        inputs: Vec<PathBuf>,

        /// Read input paths from stdin, one per line
        #[arg(long)]
        stdin: bool,

        /// Output directory (default: next to each input, or from config)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output dialect (default: mdx, or from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Stop at the first failed file
        #[arg(long)]
        fail_fast: bool,

        /// Worker threads (default: one per core)
        #[arg(short = 'j', long = "parallel", value_name = "N")]
        parallel: Option<usize>,

        /// Overwrite existing output files
        #[arg(long)]
        force: bool,

        /// Keep .backup copies of output files that get overwritten
        #[arg(long)]
        backup: bool,
    },

    /// Sanitize existing pages in place
    #[command(long_about = "Sanitize existing .mdx/.md pages in place.\n\
                      \n\
                      Frontmatter is kept verbatim. Each changed file gets a .backup copy\n\
                      unless --no-backup is given.\n\
                      \n\
                      Examples:\n  \
                        nbdoc fix docs/notebooks/*.mdx\n  \
                        nbdoc fix docs/ --dry-run")]
    Fix {
        /// Files, directories or glob patterns
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Do not write .backup copies
        #[arg(long)]
        no_backup: bool,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Dialect (default: from each file's extension)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Add a frontmatter block to pages that lack one
    Frontmatter {
        /// Files, directories or glob patterns
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report MDX problems by line number
    #[command(long_about = "Report problems a strict MDX compiler would reject.\n\
                      \n\
                      Exits with a non-zero status when anything is found.\n\
                      \n\
                      Examples:\n  \
                        nbdoc check docs/\n  \
                        nbdoc check page.mdx --json")]
    Check {
        /// Files, directories or glob patterns
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Output findings as JSON
        #[arg(long)]
        json: bool,

        /// Dialect (default: from each file's extension)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show title, description and cell counts of a notebook
    Info {
        /// Notebook or Markdown file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate API reference stubs from a TOML manifest
    #[command(long_about = "Generate API reference stubs from a TOML manifest.\n\
                      \n\
                      Example:\n  \
                        nbdoc apidoc --manifest api.toml -o docs/api --force")]
    Apidoc {
        /// Manifest file
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Overwrite existing pages
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts.\n\
                      \n\
                      Examples:\n  \
                        nbdoc completion bash > ~/.local/share/bash-completion/completions/nbdoc\n  \
                        nbdoc completion zsh > ~/.zfunc/_nbdoc\n  \
                        nbdoc completion fish > ~/.config/fish/completions/nbdoc.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Manage .nbdoc.toml configuration
    #[command(long_about = "Manage configuration files.\n\
                      \n\
                      Project config (./.nbdoc.toml) overrides user config (~/.nbdoc.toml);\n\
                      command-line flags override both.\n\
                      \n\
                      Examples:\n  \
                        nbdoc config init              # Create ./.nbdoc.toml\n  \
                        nbdoc config init --global     # Create ~/.nbdoc.toml\n  \
                        nbdoc config show --json       # Effective configuration\n  \
                        nbdoc config path --all        # Where config files are looked up")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a commented .nbdoc.toml
    Init {
        /// Create in the home directory (~/.nbdoc.toml) instead of the current directory
        #[arg(long)]
        global: bool,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Display the current effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Show the path(s) to configuration file(s)
    Path {
        /// Show all config file paths (user and project)
        #[arg(long)]
        all: bool,
    },
}

fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.log_filter()),
    )
    .target(env_logger::Target::Stderr)
    .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    init_logging(verbosity);

    let config = Config::discover();

    match args.command {
        Commands::Convert {
            input,
            output,
            output_dir,
            format,
            language,
            force,
            no_clobber,
            backup,
            dry_run,
        } => convert_command(
            &input,
            output,
            output_dir,
            format,
            language,
            force,
            no_clobber,
            backup,
            dry_run,
            &config,
            verbosity,
        ),
        Commands::Batch {
            inputs,
            stdin,
            output,
            format,
            fail_fast,
            parallel,
            force,
            backup,
        } => batch_command(
            inputs, stdin, output, format, fail_fast, parallel, force, backup, &config, verbosity,
        ),
        Commands::Fix {
            inputs,
            no_backup,
            dry_run,
            format,
        } => fix_command(&inputs, no_backup, dry_run, format, &config, verbosity),
        Commands::Frontmatter { inputs, dry_run } => {
            frontmatter_command(&inputs, dry_run, &config, verbosity)
        }
        Commands::Check {
            inputs,
            json,
            format,
        } => check_command(&inputs, json, format, &config, verbosity),
        Commands::Info { input, json } => info_command(&input, json, &config),
        Commands::Apidoc {
            manifest,
            output,
            force,
        } => apidoc_command(&manifest, &output, force, verbosity),
        Commands::Completion { shell } => completion_command(shell),
        Commands::Config { action } => config_command(action, verbosity),
    }
}

/// File name for status lines
fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}

fn print_stats(stats: &ConversionStats) {
    eprintln!(
        "  {} {} markdown, {} code, {} raw ({} empty, {} unsupported skipped)",
        "Cells:".bright_black(),
        stats.markdown_cells,
        stats.code_cells,
        stats.raw_cells,
        stats.empty_cells,
        stats.unsupported_cells
    );
    eprintln!(
        "  {} {} rendered, {} skipped, {} image placeholders",
        "Outputs:".bright_black(),
        stats.outputs_rendered,
        stats.outputs_skipped,
        stats.image_placeholders
    );
    eprintln!("  {} {}", "Sanitizer:".bright_black(), stats.sanitizer);
}

/// Dialect for an existing page: the flag, else its extension, else MDX
fn dialect_for_path(path: &Path, cli_value: Option<OutputFormat>) -> Dialect {
    if let Some(format) = cli_value {
        return format.into();
    }
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("md" | "markdown") => Dialect::Markdown,
        _ => Dialect::Mdx,
    }
}

fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let expanded = expand_glob_patterns(inputs)?;
    if expanded.is_empty() {
        eprintln!("{} No input files found", "Error:".red().bold());
        anyhow::bail!("No input files found");
    }
    Ok(expanded)
}

/// Expand inputs for commands that edit pages; notebooks are left out
fn expand_pages(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let (notebooks, pages): (Vec<_>, Vec<_>) = expand_inputs(inputs)?
        .into_iter()
        .partition(|path| InputFormat::from_path(path) == Some(InputFormat::Notebook));
    for notebook in &notebooks {
        log::warn!("Skipping notebook {} (convert it first)", notebook.display());
    }
    if pages.is_empty() {
        eprintln!("{} No Markdown or MDX files found", "Error:".red().bold());
        anyhow::bail!("No Markdown or MDX files found");
    }
    Ok(pages)
}

// ============================================================================
// convert
// ============================================================================

fn convert_command(
    input: &str,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    language: Option<String>,
    force: bool,
    no_clobber: bool,
    backup: bool,
    dry_run: bool,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let dialect = config.resolve_dialect(format.map(Dialect::from))?;
    let converter = NotebookConverter::with_options(config.convert_options(dialect, language));

    if input == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Failed to read notebook from stdin")?;
        let destination = output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("notebook.{}", dialect.extension())));
        let document = converter
            .convert_bytes(&bytes, &destination)
            .context("Failed to convert notebook from stdin")?;

        if output.is_none() {
            io::stdout()
                .lock()
                .write_all(document.content.as_bytes())
                .context("Failed to write to stdout")?;
            return Ok(());
        }
        return write_converted(
            Path::new("-"),
            &document,
            force,
            no_clobber,
            backup,
            dry_run,
            verbosity,
        );
    }

    let input_path = PathBuf::from(input);
    if !input_path.exists() {
        eprintln!(
            "{} Input file not found: {}",
            "Error:".red().bold(),
            input_path.display()
        );
        anyhow::bail!("Input file not found: {}", input_path.display());
    }
    if InputFormat::from_path(&input_path).is_none() {
        eprintln!(
            "{} Unsupported input format: {}",
            "Error:".red().bold(),
            input_path.display()
        );
        eprintln!(
            "{} Supported extensions: .ipynb, .md, .markdown, .mdx",
            "Help:".cyan().bold()
        );
        anyhow::bail!("Unsupported input format: {}", input_path.display());
    }

    let destination = output.unwrap_or_else(|| {
        converter.output_path(&input_path, config.resolve_output_dir(output_dir).as_deref())
    });
    let start = Instant::now();
    let document = converter
        .convert_file_to(&input_path, &destination)
        .with_context(|| format!("Failed to convert {}", input_path.display()))?;
    log::debug!(
        "Converted {} in {:.3}s",
        input_path.display(),
        start.elapsed().as_secs_f64()
    );

    write_converted(
        &input_path,
        &document,
        force,
        no_clobber,
        backup,
        dry_run,
        verbosity,
    )
}

fn write_converted(
    input: &Path,
    document: &RenderedDocument,
    force: bool,
    no_clobber: bool,
    backup: bool,
    dry_run: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let destination = &document.path;
    match check_destination(input, destination, force) {
        Ok(()) => {}
        Err(SkipReason::Exists) if no_clobber => {
            if verbosity.should_show_output() {
                eprintln!(
                    "{} {} already exists (--no-clobber)",
                    "Skip:".yellow().bold(),
                    destination.display()
                );
            }
            return Ok(());
        }
        Err(reason) => {
            eprintln!(
                "{} {}: {reason}",
                "Error:".red().bold(),
                destination.display()
            );
            anyhow::bail!("{}: {reason}", destination.display());
        }
    }

    if dry_run {
        println!(
            "{} Would write {} ({} bytes, title: {:?})",
            "Dry run:".cyan().bold(),
            destination.display(),
            document.content.len(),
            document.title
        );
        if verbosity.is_verbose() {
            print_stats(&document.stats);
        }
        return Ok(());
    }

    let backup = write_output(destination, &document.content, backup)?;

    if verbosity.should_show_output() {
        eprintln!(
            "{} {} -> {}",
            "✓".green().bold(),
            display_name(input),
            destination.display()
        );
        if let Some(backup) = backup {
            eprintln!(
                "  {} previous version saved to {}",
                "Backup:".bright_black(),
                backup.display()
            );
        }
    }
    if verbosity.is_verbose() {
        print_stats(&document.stats);
    }
    Ok(())
}

// ============================================================================
// batch
// ============================================================================

/// What happened to one batch input
enum Outcome {
    Converted { backup: Option<PathBuf> },
    Skipped(String),
    Failed(String),
}

struct ProcessResult {
    input_path: PathBuf,
    output_path: PathBuf,
    outcome: Outcome,
}

fn batch_command(
    inputs: Vec<PathBuf>,
    read_from_stdin: bool,
    output_dir: Option<PathBuf>,
    format: Option<OutputFormat>,
    fail_fast: bool,
    parallel: Option<usize>,
    force: bool,
    backup: bool,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    use rayon::prelude::*;

    // Resolve final values with precedence: CLI > config > defaults
    let dialect = config.resolve_dialect(format.map(Dialect::from))?;
    let output_dir = config.resolve_output_dir(output_dir);
    let fail_fast = config.resolve_fail_fast(fail_fast);
    let backup = config.resolve_backup(backup);
    let converter = NotebookConverter::with_options(config.convert_options(dialect, None));

    // Sequential by default under fail-fast so "first failure" is well defined
    let num_workers = match config.resolve_parallel(parallel) {
        0 if fail_fast && parallel.is_none() => 1,
        0 => rayon::current_num_threads(),
        n => n,
    };

    if let Some(dir) = &output_dir {
        if dir.exists() && !dir.is_dir() {
            eprintln!(
                "{} Output path is not a directory: {}",
                "Error:".red().bold(),
                dir.display()
            );
            anyhow::bail!("Output path is not a directory: {}", dir.display());
        }
    }

    let inputs = if read_from_stdin {
        io::stdin()
            .lock()
            .lines()
            .map_while(std::result::Result::ok)
            .filter(|line| !line.trim().is_empty())
            .map(|line| PathBuf::from(line.trim()))
            .collect()
    } else {
        inputs
    };
    let expanded_inputs = expand_inputs(&inputs)?;

    // Destinations are planned up front so two inputs never race for one page
    let mut claimed = HashSet::new();
    let plan: Vec<(PathBuf, PathBuf, bool)> = expanded_inputs
        .into_iter()
        .map(|input| {
            let output = converter.output_path(&input, output_dir.as_deref());
            let duplicate = !claimed.insert(output.clone());
            (input, output, duplicate)
        })
        .collect();

    let total_files = plan.len();
    if verbosity.should_show_output() {
        let parallel_msg = if num_workers > 1 {
            format!(" with {} workers", num_workers.to_string().cyan())
        } else {
            " (sequential)".to_string()
        };
        eprintln!(
            "{} Processing {} files{}...",
            "Info:".blue().bold(),
            total_files.to_string().cyan(),
            parallel_msg
        );
    }

    let progress = if verbosity.should_show_output() {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .expect("template is compile-time constant")
                .progress_chars("█▓▒░  "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let start_time = Instant::now();
    let should_stop = AtomicBool::new(false);

    let process_file = |(input_path, output_path, duplicate): &(PathBuf, PathBuf, bool)| {
        let result = |outcome| ProcessResult {
            input_path: input_path.clone(),
            output_path: output_path.clone(),
            outcome,
        };

        if fail_fast && should_stop.load(Ordering::SeqCst) {
            return result(Outcome::Skipped("previous error".to_string()));
        }
        if *duplicate {
            return result(Outcome::Skipped(SkipReason::Duplicate.to_string()));
        }
        if let Err(reason) = check_destination(input_path, output_path, force) {
            return result(Outcome::Skipped(reason.to_string()));
        }

        let written = converter
            .convert_file_to(input_path, output_path)
            .map_err(anyhow::Error::from)
            .and_then(|document| write_output(output_path, &document.content, backup));

        match written {
            Ok(backup) => result(Outcome::Converted { backup }),
            Err(e) => {
                log::debug!("{}: {e:#}", input_path.display());
                if fail_fast {
                    should_stop.store(true, Ordering::SeqCst);
                }
                result(Outcome::Failed(format!("{e:#}")))
            }
        }
    };

    let results: Vec<ProcessResult> = if num_workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()
            .context("Failed to build worker pool")?;
        pool.install(|| {
            plan.par_iter()
                .map(|item| {
                    let result = process_file(item);
                    progress.inc(1);
                    result
                })
                .collect()
        })
    } else {
        plan.iter()
            .map(|item| {
                let result = process_file(item);
                progress.inc(1);
                result
            })
            .collect()
    };

    progress.finish_and_clear();

    let mut succeeded = 0;
    let mut skipped = 0;
    let mut failures = Vec::new();
    for result in &results {
        let input_name = display_name(&result.input_path);
        match &result.outcome {
            Outcome::Converted { backup } => {
                succeeded += 1;
                if verbosity.is_verbose() {
                    eprintln!(
                        "{} {} -> {}",
                        "✓".green().bold(),
                        input_name.bright_white(),
                        result.output_path.display().to_string().bright_black()
                    );
                    if let Some(backup) = backup {
                        eprintln!("  {} {}", "Backup:".bright_black(), backup.display());
                    }
                }
            }
            Outcome::Skipped(reason) => {
                skipped += 1;
                if verbosity.should_show_output() {
                    eprintln!("{} Skipped {input_name} ({reason})", "Skip:".yellow().bold());
                }
            }
            Outcome::Failed(error) => failures.push((input_name, error)),
        }
    }

    let failed = failures.len();
    let elapsed = start_time.elapsed();

    if verbosity.should_show_output() {
        eprintln!("\n{}", "=== Batch Conversion Summary ===".bold());
        eprintln!("{:<16} {}", "Total files:", total_files.to_string().cyan());
        eprintln!("{:<16} {}", "Succeeded:", succeeded.to_string().green());
        eprintln!(
            "{:<16} {}",
            "Failed:",
            if failed > 0 {
                failed.to_string().red()
            } else {
                failed.to_string().normal()
            }
        );
        eprintln!("{:<16} {}", "Skipped:", skipped.to_string().yellow());
        eprintln!("{:<16} {:.2}s", "Total time:", elapsed.as_secs_f64());
        if num_workers > 1 {
            eprintln!("{:<16} {}", "Workers:", num_workers.to_string().cyan());
        }
    }

    if !failures.is_empty() {
        eprintln!("\n{}", "Failures:".red().bold());
        for (input_name, error) in &failures {
            eprintln!("  {} {} - {error}", "✗".red().bold(), input_name.bright_white());
        }
        anyhow::bail!("Batch conversion failed: {failed} of {total_files} files failed");
    }

    Ok(())
}

// ============================================================================
// fix / frontmatter
// ============================================================================

fn fix_command(
    inputs: &[PathBuf],
    no_backup: bool,
    dry_run: bool,
    format: Option<OutputFormat>,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let files = expand_pages(inputs)?;
    let mut fixed = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for path in &files {
        let dialect = dialect_for_path(path, format);
        let converter = NotebookConverter::with_options(config.convert_options(dialect, None));

        let result = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|text| {
                let (repaired, report) = converter.fix_document(&text);
                if repaired == text {
                    return Ok(None);
                }
                if !dry_run {
                    write_output(path, &repaired, !no_backup)?;
                }
                Ok(Some(report))
            });

        match result {
            Ok(None) => {
                unchanged += 1;
                if verbosity.is_verbose() {
                    eprintln!("{} {} (no changes)", "✓".green().bold(), path.display());
                }
            }
            Ok(Some(report)) => {
                fixed += 1;
                if verbosity.should_show_output() {
                    let verb = if dry_run { "Would fix" } else { "Fixed" };
                    eprintln!(
                        "{} {verb} {} ({report})",
                        "✓".green().bold(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {} - {e:#}", "✗".red().bold(), path.display());
            }
        }
    }

    if verbosity.should_show_output() {
        eprintln!(
            "{} {fixed} fixed, {unchanged} unchanged, {failed} failed",
            "Info:".blue().bold()
        );
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be fixed", files.len());
    }
    Ok(())
}

fn frontmatter_command(
    inputs: &[PathBuf],
    dry_run: bool,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let options = config.convert_options(Dialect::default(), None).description;
    let files = expand_pages(inputs)?;
    let mut added = 0;
    let mut present = 0;
    let mut failed = 0;

    for path in &files {
        let result = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|text| match add_frontmatter(&text, path, &options) {
                None => Ok(false),
                Some(updated) => {
                    if !dry_run {
                        write_output(path, &updated, false)?;
                    }
                    Ok(true)
                }
            });

        match result {
            Ok(true) => {
                added += 1;
                if verbosity.should_show_output() {
                    let verb = if dry_run { "Would add" } else { "Added" };
                    eprintln!(
                        "{} {verb} frontmatter to {}",
                        "✓".green().bold(),
                        path.display()
                    );
                }
            }
            Ok(false) => {
                present += 1;
                if verbosity.is_verbose() {
                    eprintln!(
                        "{} {} already has frontmatter",
                        "Skip:".yellow().bold(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {} - {e:#}", "✗".red().bold(), path.display());
            }
        }
    }

    if verbosity.should_show_output() {
        eprintln!(
            "{} {added} updated, {present} already had frontmatter, {failed} failed",
            "Info:".blue().bold()
        );
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be updated", files.len());
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileReport {
    fn check(path: &Path, converter: &NotebookConverter) -> Self {
        let read = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
        match read {
            Ok(text) => Self {
                path: path.to_path_buf(),
                diagnostics: diagnose_with(&text, &converter.options().sanitize_options()),
                error: None,
            },
            Err(e) => Self {
                path: path.to_path_buf(),
                diagnostics: Vec::new(),
                error: Some(format!("{e:#}")),
            },
        }
    }
}

fn check_command(
    inputs: &[PathBuf],
    json_output: bool,
    format: Option<OutputFormat>,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let files = expand_pages(inputs)?;
    let reports: Vec<FileReport> = files
        .iter()
        .map(|path| {
            let converter = NotebookConverter::with_options(
                config.convert_options(dialect_for_path(path, format), None),
            );
            FileReport::check(path, &converter)
        })
        .collect();

    let problems: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    let files_with_problems = reports.iter().filter(|r| !r.diagnostics.is_empty()).count();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if let Some(error) = &report.error {
                eprintln!("{} {} - {error}", "✗".red().bold(), report.path.display());
            }
            for diagnostic in &report.diagnostics {
                println!("{}: {diagnostic}", report.path.display());
            }
        }
    }

    if problems == 0 && failed == 0 {
        if verbosity.should_show_output() && !json_output {
            eprintln!(
                "{} No problems found in {} files",
                "✓".green().bold(),
                files.len()
            );
        }
        return Ok(());
    }

    if verbosity.should_show_output() && !json_output {
        if problems > 0 {
            eprintln!(
                "{} {problems} problems in {files_with_problems} of {} files",
                "✗".red().bold(),
                files.len()
            );
            eprintln!("{} Run 'nbdoc fix' to repair them", "Help:".cyan().bold());
        }
        if failed > 0 {
            eprintln!(
                "{} {failed} of {} files could not be read",
                "✗".red().bold(),
                files.len()
            );
        }
    }
    std::process::exit(1);
}

// ============================================================================
// info
// ============================================================================

#[derive(Debug, Serialize)]
struct CellCounts {
    total: usize,
    markdown: usize,
    code: usize,
    raw: usize,
    unsupported: usize,
}

#[derive(Debug, Serialize)]
struct NotebookInfo {
    path: PathBuf,
    format: String,
    title: String,
    description: String,
    language: Option<String>,
    kernel: Option<String>,
    authors: Vec<String>,
    nbformat: String,
    cells: CellCounts,
    outputs: usize,
    output_types: BTreeMap<String, usize>,
    image_placeholders: usize,
    destination: PathBuf,
}

fn notebook_info(path: &Path, config: &Config) -> Result<NotebookInfo> {
    let format = InputFormat::from_path(path)
        .ok_or_else(|| anyhow::anyhow!("Unsupported input format: {}", path.display()))?;
    let notebook = match format {
        InputFormat::Notebook => parse_notebook(path)
            .with_context(|| format!("Failed to read notebook {}", path.display()))?,
        InputFormat::Markdown => Notebook::from_markdown(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
    };

    let dialect = config.resolve_dialect(None)?;
    let converter = NotebookConverter::with_options(config.convert_options(dialect, None));
    let destination = converter.output_path(path, config.resolve_output_dir(None).as_deref());
    let document = converter.convert_notebook(&notebook, &destination);

    let mut output_types = BTreeMap::new();
    let mut outputs = 0;
    for cell in &notebook.cells {
        if let Cell::Code(code) = cell {
            for output in &code.outputs {
                outputs += 1;
                let name = output
                    .output_type()
                    .map_or_else(|| "unknown".to_string(), |t| t.to_string());
                *output_types.entry(name).or_insert(0) += 1;
            }
        }
    }

    let count = |wanted: fn(&Cell) -> bool| notebook.cells.iter().filter(|c| wanted(c)).count();

    Ok(NotebookInfo {
        path: path.to_path_buf(),
        format: format.to_string(),
        title: document.title,
        description: document.description,
        language: notebook.metadata.language.clone(),
        kernel: notebook.metadata.kernel_name.clone(),
        authors: notebook.metadata.authors.clone(),
        nbformat: format!("{}.{}", notebook.nbformat.0, notebook.nbformat.1),
        cells: CellCounts {
            total: notebook.cells.len(),
            markdown: count(|c| matches!(c, Cell::Markdown(_))),
            code: count(|c| matches!(c, Cell::Code(_))),
            raw: count(|c| matches!(c, Cell::Raw(_))),
            unsupported: count(|c| matches!(c, Cell::Unsupported { .. })),
        },
        outputs,
        output_types,
        image_placeholders: document.stats.image_placeholders,
        destination,
    })
}

fn info_command(input: &Path, json_output: bool, config: &Config) -> Result<()> {
    if !input.exists() {
        eprintln!(
            "{} Input file not found: {}",
            "Error:".red().bold(),
            input.display()
        );
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let info = notebook_info(input, config)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.path.display().to_string().bold());
    println!("  {:<14} {}", "Format:", info.format);
    println!("  {:<14} {}", "Title:", info.title.bright_white());
    println!("  {:<14} {}", "Description:", info.description);
    println!(
        "  {:<14} {}",
        "Language:",
        info.language.as_deref().unwrap_or("unknown")
    );
    if let Some(kernel) = &info.kernel {
        println!("  {:<14} {kernel}", "Kernel:");
    }
    if !info.authors.is_empty() {
        println!("  {:<14} {}", "Authors:", info.authors.join(", "));
    }
    println!("  {:<14} {}", "nbformat:", info.nbformat);
    println!(
        "  {:<14} {} ({} markdown, {} code, {} raw, {} unsupported)",
        "Cells:",
        info.cells.total.to_string().cyan(),
        info.cells.markdown,
        info.cells.code,
        info.cells.raw,
        info.cells.unsupported
    );
    let breakdown: Vec<String> = info
        .output_types
        .iter()
        .map(|(name, count)| format!("{count} {name}"))
        .collect();
    if breakdown.is_empty() {
        println!("  {:<14} 0", "Outputs:");
    } else {
        println!(
            "  {:<14} {} ({})",
            "Outputs:",
            info.outputs.to_string().cyan(),
            breakdown.join(", ")
        );
    }
    println!("  {:<14} {}", "Images:", info.image_placeholders);
    println!("  {:<14} {}", "Destination:", info.destination.display());
    Ok(())
}

// ============================================================================
// apidoc / completion
// ============================================================================

fn apidoc_command(
    manifest_path: &Path,
    output_dir: &Path,
    force: bool,
    verbosity: Verbosity,
) -> Result<()> {
    let manifest = ApiManifest::from_path(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let pages = nbdoc_core::generate(&manifest);

    let mut written = 0;
    let mut skipped = 0;
    for page in &pages {
        let path = output_dir.join(&page.path);
        if path.exists() && !force {
            skipped += 1;
            if verbosity.should_show_output() {
                eprintln!(
                    "{} {} ({})",
                    "Skip:".yellow().bold(),
                    path.display(),
                    SkipReason::Exists
                );
            }
            continue;
        }
        write_output(&path, &page.content, false)?;
        written += 1;
        if verbosity.is_verbose() {
            eprintln!("{} {}", "✓".green().bold(), path.display());
        }
    }

    if verbosity.should_show_output() {
        eprintln!(
            "{} Generated {written} pages in {} ({skipped} skipped)",
            "✓".green().bold(),
            output_dir.display()
        );
    }
    Ok(())
}

fn completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

// ============================================================================
// config
// ============================================================================

fn config_command(action: ConfigAction, verbosity: Verbosity) -> Result<()> {
    match action {
        ConfigAction::Init { global, force } => config_init(global, force, verbosity),
        ConfigAction::Show { json } => config_show(json),
        ConfigAction::Path { all } => config_path(all),
    }
}

/// Create a new configuration file from the commented template
fn config_init(global: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if global {
        Config::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
    } else {
        Config::project_config_path()
    };

    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration file already exists: {}",
            "Error:".red().bold(),
            config_path.display()
        );
        eprintln!("{} Use --force to overwrite", "Hint:".cyan().bold());
        std::process::exit(1);
    }

    fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }

    Ok(())
}

/// Display the current effective configuration
fn config_show(json_output: bool) -> Result<()> {
    let merged = Config::discover();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        println!("{}", toml::to_string_pretty(&merged)?);
    }

    Ok(())
}

fn config_path(all: bool) -> Result<()> {
    let home_config = Config::user_config_path();
    let project_config = Config::project_config_path();

    if all {
        println!("{}", "Configuration file paths:".bold());
        println!();

        let status = |path: &Path| {
            if path.exists() {
                "exists".green()
            } else {
                "not found".yellow()
            }
        };
        if let Some(home) = &home_config {
            println!(
                "  {} {} ({})",
                "User:".bright_black(),
                home.display(),
                status(home)
            );
        }
        println!(
            "  {} {} ({})",
            "Project:".bright_black(),
            project_config.display(),
            status(&project_config)
        );
    } else {
        // Effective path: project if present, else user, else where init would write
        let effective = if project_config.exists() {
            project_config
        } else {
            home_config
                .filter(|home| home.exists())
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
        };
        println!("{}", effective.display());
    }

    Ok(())
}
