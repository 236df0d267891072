//! `lint-file-names`: every path segment must be kebab-case

use crate::commands::Context;
use crate::config::FileNameConfig;
use crate::error::{AppError, EXIT_FAILURE};
use colored::Colorize;
use regex::Regex;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

static KEBAB_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\da-z]+(-[\da-z]+)*)?(\.([\da-z]+(-[\da-z])*))*$").unwrap()
});
static CAMEL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

/// Returns true if a single path segment is kebab-case
pub fn is_kebab_case(segment: &str) -> bool {
    KEBAB_CASE.is_match(segment)
}

/// `fooBar_baz qux.TS` → `foo-bar-baz-qux.ts`
pub fn to_kebab_case(name: &str) -> String {
    let name = CAMEL_BOUNDARY.replace_all(name, "$1-$2");
    SEPARATORS.replace_all(&name, "-").to_lowercase()
}

/// Case-sensitive existence check: the exact file name must be listed in
/// its directory
fn exists_case_sensitive(path: &Path) -> bool {
    let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    std::fs::read_dir(dir)
        .map(|entries| entries.flatten().any(|entry| entry.file_name() == name))
        .unwrap_or(false)
}

/// Root-relative prefixes whose last segment is not kebab-case, sorted
///
/// Relative input paths are resolved against `root`. Missing files are
/// ignored, as are ignored base names and files in ignored directories.
pub fn find_invalid_paths(root: &Path, files: &[PathBuf], config: &FileNameConfig) -> Vec<PathBuf> {
    let mut invalid = BTreeSet::new();

    for file in files {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            root.join(file)
        };
        if !exists_case_sensitive(&path) {
            continue;
        }

        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if config.ignored_files.contains(&base_name) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.iter().any(|s| config.ignored_dirs.contains(s)) {
            continue;
        }

        for (index, segment) in segments.iter().enumerate() {
            if !is_kebab_case(segment) {
                invalid.insert(segments[..=index].iter().collect::<PathBuf>());
            }
        }
    }

    invalid.into_iter().collect()
}

/// Suggested replacement: the last segment converted to kebab-case
pub fn suggest(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| to_kebab_case(&n.to_string_lossy()))
        .unwrap_or_default();
    path.with_file_name(name)
}

/// Check the given files
pub fn run(ctx: &Context, files: &[PathBuf]) -> Result<u8, AppError> {
    let invalid = find_invalid_paths(&ctx.root, files, &ctx.config.file_names);
    if invalid.is_empty() {
        return Ok(0);
    }

    ctx.logger.error("These file names are not kebab-case:");
    let mut stdout = io::stdout().lock();
    for path in &invalid {
        writeln!(
            stdout,
            "{} {} {}",
            path.display().to_string().red(),
            "->".yellow(),
            suggest(path).display().to_string().green()
        )?;
    }
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(EXIT_FAILURE)
}
