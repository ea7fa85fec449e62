//! Integration tests for all CLI commands
//!
//! Tests each command with real invocations inside a temporary directory,
//! with `HOME` pointed there so no user config leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a CLI command running in `dir`
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nbdoc"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn notebook_json(cells: serde_json::Value) -> String {
    json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {"language_info": {"name": "python"}},
        "cells": cells,
    })
    .to_string()
}

fn write_notebook(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        notebook_json(json!([
            {"cell_type": "markdown", "source": "# Title\nHello {world}"},
            {"cell_type": "code", "source": "print(1)", "outputs": [
                {"output_type": "stream", "name": "stdout", "text": "1\n"}
            ]}
        ])),
    )
    .unwrap();
    path
}

// ============ CONVERT COMMAND TESTS ============

#[test]
fn test_convert_help() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .arg("convert")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a notebook"));
}

#[test]
fn test_convert_writes_next_to_input() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "My Notebook.ipynb");

    cli(temp.path())
        .args(["convert", "My Notebook.ipynb"])
        .assert()
        .success()
        .stderr(predicate::str::contains("my-notebook.mdx"));

    let page = fs::read_to_string(temp.path().join("my-notebook.mdx")).unwrap();
    assert!(page.starts_with("---\ntitle: "));
    assert!(page.contains("Hello \\{world\\}"));
    assert!(page.contains("```python\nprint(1)\n```"));
}

#[test]
fn test_convert_markdown_format() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");

    cli(temp.path())
        .args(["convert", "nb.ipynb", "-f", "markdown", "--output-dir", "out"])
        .assert()
        .success();

    let page = fs::read_to_string(temp.path().join("out/nb.md")).unwrap();
    assert!(page.contains("Hello {world}"));
}

#[test]
fn test_convert_refuses_existing_output() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");
    fs::write(temp.path().join("nb.mdx"), "old").unwrap();

    cli(temp.path())
        .args(["convert", "nb.ipynb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(temp.path().join("nb.mdx")).unwrap(), "old");

    cli(temp.path())
        .args(["convert", "nb.ipynb", "--no-clobber"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(temp.path().join("nb.mdx")).unwrap(), "old");

    cli(temp.path())
        .args(["convert", "nb.ipynb", "--force", "--backup"])
        .assert()
        .success();
    assert!(fs::read_to_string(temp.path().join("nb.mdx"))
        .unwrap()
        .contains("Hello"));
    assert_eq!(
        fs::read_to_string(temp.path().join("nb.mdx.backup")).unwrap(),
        "old"
    );
}

#[test]
fn test_convert_refuses_to_overwrite_input() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.mdx"), "Some {x}\n").unwrap();

    cli(temp.path())
        .args(["convert", "page.mdx", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite the input"));
    assert_eq!(
        fs::read_to_string(temp.path().join("page.mdx")).unwrap(),
        "Some {x}\n"
    );
}

#[test]
fn test_convert_dry_run() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");

    cli(temp.path())
        .args(["convert", "nb.ipynb", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would write"));
    assert!(!temp.path().join("nb.mdx").exists());
}

#[test]
fn test_convert_from_stdin_to_stdout() {
    let temp = TempDir::new().unwrap();
    let input = notebook_json(json!([
        {"cell_type": "markdown", "source": "# Piped\nUse <b>bold</b> and {x}"}
    ]));

    cli(temp.path())
        .args(["convert", "-"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("title: \"Piped\""))
        .stdout(predicate::str::contains("Use <b>bold</b> and \\{x\\}"));
}

#[test]
fn test_convert_missing_input() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .args(["convert", "missing.ipynb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_convert_malformed_notebook() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.ipynb"), r#"{"cells": 3}"#).unwrap();

    cli(temp.path())
        .args(["convert", "bad.ipynb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert"));
    assert!(!temp.path().join("bad.mdx").exists());
}

#[test]
fn test_convert_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("doc.pdf"), "x").unwrap();

    cli(temp.path())
        .args(["convert", "doc.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported input format"));
}

#[test]
fn test_convert_uses_project_config() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");
    fs::write(
        temp.path().join(".nbdoc.toml"),
        "[convert]\ndialect = \"markdown\"\noutput_dir = \"site\"\n",
    )
    .unwrap();

    cli(temp.path()).args(["convert", "nb.ipynb"]).assert().success();
    assert!(temp.path().join("site/nb.md").exists());
}

// ============ FIX / FRONTMATTER / CHECK TESTS ============

#[test]
fn test_fix_rewrites_in_place_with_backup() {
    let temp = TempDir::new().unwrap();
    let page = temp.path().join("page.mdx");
    fs::write(&page, "---\ntitle: Page\n---\nValue {x} <!-- note -->\n").unwrap();

    cli(temp.path())
        .args(["fix", "page.mdx"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Fixed"));

    assert_eq!(
        fs::read_to_string(&page).unwrap(),
        "---\ntitle: Page\n---\nValue \\{x\\} {/* note */}\n"
    );
    assert!(temp.path().join("page.mdx.backup").exists());

    // Second run has nothing to do
    cli(temp.path())
        .args(["fix", "page.mdx", "--no-backup"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 unchanged"));
}

#[test]
fn test_fix_dry_run_leaves_file() {
    let temp = TempDir::new().unwrap();
    let page = temp.path().join("page.mdx");
    fs::write(&page, "Value {x}\n").unwrap();

    cli(temp.path())
        .args(["fix", "page.mdx", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Would fix"));
    assert_eq!(fs::read_to_string(&page).unwrap(), "Value {x}\n");
    assert!(!temp.path().join("page.mdx.backup").exists());
}

#[test]
fn test_frontmatter_added_once() {
    let temp = TempDir::new().unwrap();
    let page = temp.path().join("getting_started.md");
    fs::write(&page, "Some introductory text that is long enough.\n").unwrap();

    cli(temp.path())
        .args(["frontmatter", "getting_started.md"])
        .assert()
        .success();
    let text = fs::read_to_string(&page).unwrap();
    assert!(text.starts_with("---\ntitle: \"Getting Started\"\n"));
    assert!(text.ends_with("Some introductory text that is long enough.\n"));

    cli(temp.path())
        .args(["frontmatter", "getting_started.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 already had frontmatter"));
    assert_eq!(fs::read_to_string(&page).unwrap(), text);
}

#[test]
fn test_check_reports_findings() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.mdx"), "fine\nValue {x}\n").unwrap();
    fs::write(temp.path().join("good.mdx"), "Value \\{x\\}\n").unwrap();

    cli(temp.path())
        .args(["check", "bad.mdx", "good.mdx"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("bad.mdx: line 2"))
        .stdout(predicate::str::contains("unescaped-brace"));

    cli(temp.path())
        .args(["check", "good.mdx"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No problems found"));
}

#[test]
fn test_check_body_opening_with_rule() {
    let temp = TempDir::new().unwrap();
    let text = "---\ntitle: \"T\"\n---\n---\nbad {x}\n---\n";
    fs::write(temp.path().join("page.mdx"), text).unwrap();

    cli(temp.path())
        .args(["check", "page.mdx"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("page.mdx: line 5"))
        .stdout(predicate::str::contains("unescaped-brace"));

    cli(temp.path())
        .args(["fix", "page.mdx", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 escaped braces"));
}

#[test]
fn test_check_continues_past_unreadable_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.mdx"), "Value {x}\n").unwrap();

    cli(temp.path())
        .args(["check", "missing.mdx", "bad.mdx"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("bad.mdx: line 1"))
        .stderr(predicate::str::contains("missing.mdx"))
        .stderr(predicate::str::contains("1 of 2 files could not be read"));
}

#[test]
fn test_check_json() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.mdx"), "<!-- c -->\n").unwrap();

    let output = cli(temp.path())
        .args(["check", "bad.mdx", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["diagnostics"][0]["kind"], "html_comment");
    assert_eq!(reports[0]["diagnostics"][0]["line"], 1);
}

#[test]
fn test_check_markdown_files_allow_braces() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.md"), "Value {x}\n").unwrap();

    cli(temp.path())
        .args(["check", "page.md"])
        .assert()
        .success();
}

// ============ INFO TESTS ============

#[test]
fn test_info_text() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");

    cli(temp.path())
        .args(["info", "nb.ipynb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title"))
        .stdout(predicate::str::contains("python"))
        .stdout(predicate::str::contains("1 stream"));
}

#[test]
fn test_info_json() {
    let temp = TempDir::new().unwrap();
    write_notebook(temp.path(), "nb.ipynb");

    let output = cli(temp.path())
        .args(["info", "nb.ipynb", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["title"], "Title");
    assert_eq!(info["language"], "python");
    assert_eq!(info["cells"]["total"], 2);
    assert_eq!(info["cells"]["code"], 1);
    assert_eq!(info["outputs"], 1);
    assert_eq!(info["nbformat"], "4.5");
}

// ============ APIDOC TESTS ============

#[test]
fn test_apidoc_generates_pages() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("api.toml"),
        r#"
import_line = "import pixeltable as pxt"

[[page]]
path = "core.mdx"
title = "Core"

[[page.section]]
heading = "Tables"

[[page.section.entry]]
name = "get_table"
description = "Returns a table."

[[module]]
path = "ext/strings.mdx"
name = "strings"
description = "String helpers."
access_path = "pxt.functions.string"
"#,
    )
    .unwrap();

    cli(temp.path())
        .args(["apidoc", "--manifest", "api.toml", "-o", "docs"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated 2 pages"));

    let core = fs::read_to_string(temp.path().join("docs/core.mdx")).unwrap();
    assert!(core.contains("### get_table"));
    assert!(temp.path().join("docs/ext/strings.mdx").exists());

    cli(temp.path())
        .args(["apidoc", "--manifest", "api.toml", "-o", "docs"])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 skipped"));
}

#[test]
fn test_apidoc_rejects_escaping_paths() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("api.toml"),
        "[[page]]\npath = \"../outside.mdx\"\ntitle = \"X\"\n",
    )
    .unwrap();

    cli(temp.path())
        .args(["apidoc", "--manifest", "api.toml", "-o", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inside the output directory"));
    assert!(!temp.path().join("outside.mdx").exists());
}

// ============ COMPLETION / CONFIG TESTS ============

#[test]
fn test_completion_bash() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nbdoc"));
}

#[test]
fn test_config_init_show_path() {
    let temp = TempDir::new().unwrap();

    cli(temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(temp.path().join(".nbdoc.toml").exists());

    cli(temp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let output = cli(temp.path())
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["convert"]["dialect"], "mdx");
    assert_eq!(config["description"]["max_chars"], 150);

    cli(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".nbdoc.toml"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let temp = TempDir::new().unwrap();
    cli(temp.path())
        .args(["-q", "-v", "config", "path"])
        .assert()
        .failure();
}
