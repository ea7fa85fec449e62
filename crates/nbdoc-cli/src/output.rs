//! Input discovery and safe writing of converted pages.

use anyhow::{Context, Result};
use nbdoc_core::InputFormat;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a destination is not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The page already exists and `--force` was not given
    Exists,
    /// The destination is the input file itself
    SameAsInput,
    /// An earlier input in the same batch maps to this destination
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exists => "output exists (use --force to overwrite)",
            Self::SameAsInput => "output would overwrite the input (use 'nbdoc fix' instead)",
            Self::Duplicate => "another input already writes this output",
        };
        write!(f, "{s}")
    }
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Whether `path` has an extension nbdoc can convert
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    InputFormat::from_path(path).is_some()
}

/// Expand glob patterns and directories to concrete file paths.
///
/// Directories are searched recursively for supported files. Plain paths
/// are kept as-is and existence is not checked, so the converter reports
/// missing files. Duplicates keep their first position.
///
/// # Errors
///
/// Fails on an invalid glob pattern or an unreadable glob entry.
pub fn expand_glob_patterns(patterns: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for pattern in patterns {
        let pattern_str = pattern.to_string_lossy();
        if pattern.is_dir() {
            let nested = pattern.join("**").join("*");
            expanded.extend(
                glob_files(&nested.to_string_lossy())?
                    .into_iter()
                    .filter(|path| is_supported(path)),
            );
        } else if has_glob_chars(&pattern_str) {
            expanded.extend(glob_files(&pattern_str)?);
        } else {
            expanded.push(pattern.clone());
        }
    }

    let mut seen = HashSet::new();
    expanded.retain(|path| seen.insert(path.clone()));
    Ok(expanded)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let matches = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
    let mut files = Vec::new();
    for entry in matches {
        let path = entry.with_context(|| "Failed to read glob entry")?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// `page.mdx` → `page.mdx.backup`
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    path.with_file_name(name)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Check whether `destination` may be written for `input`
///
/// # Errors
///
/// Returns the [`SkipReason`] when it may not.
pub fn check_destination(
    input: &Path,
    destination: &Path,
    force: bool,
) -> std::result::Result<(), SkipReason> {
    if same_file(input, destination) {
        return Err(SkipReason::SameAsInput);
    }
    if destination.exists() && !force {
        return Err(SkipReason::Exists);
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
///
/// With `backup`, an existing file is first copied to [`backup_path`].
/// Returns the backup location when one was made.
///
/// # Errors
///
/// Fails if a directory, the backup or the page cannot be written.
pub fn write_output(path: &Path, content: &str, backup: bool) -> Result<Option<PathBuf>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let backup = if backup && path.exists() {
        let target = backup_path(path);
        fs::copy(path, &target)
            .with_context(|| format!("Failed to write backup: {}", target.display()))?;
        Some(target)
    } else {
        None
    };

    fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("docs/page.mdx")),
            PathBuf::from("docs/page.mdx.backup")
        );
    }

    #[test]
    fn test_write_output_creates_dirs_and_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/page.mdx");

        assert_eq!(write_output(&path, "one", true).unwrap(), None);
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");

        let backup = write_output(&path, "two", true).unwrap().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
        assert_eq!(fs::read_to_string(backup).unwrap(), "one");
    }

    #[test]
    fn test_check_destination() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("page.mdx");
        fs::write(&input, "x").unwrap();
        let other = temp.path().join("other.mdx");

        assert_eq!(
            check_destination(&input, &input, true),
            Err(SkipReason::SameAsInput)
        );
        assert_eq!(check_destination(&input, &other, false), Ok(()));
        fs::write(&other, "y").unwrap();
        assert_eq!(
            check_destination(&input, &other, false),
            Err(SkipReason::Exists)
        );
        assert_eq!(check_destination(&input, &other, true), Ok(()));
    }

    #[test]
    fn test_expand_directories_and_globs() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("a.ipynb"), "{}").unwrap();
        fs::write(temp.path().join("nested/b.ipynb"), "{}").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let from_dir = expand_glob_patterns(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(from_dir.len(), 2);
        assert!(from_dir.iter().all(|p| is_supported(p)));

        let pattern = temp.path().join("*.ipynb");
        let from_glob = expand_glob_patterns(&[pattern.clone(), pattern]).unwrap();
        assert_eq!(from_glob, vec![temp.path().join("a.ipynb")]);

        let missing = temp.path().join("missing.ipynb");
        assert_eq!(
            expand_glob_patterns(&[missing.clone()]).unwrap(),
            vec![missing]
        );
    }
}
