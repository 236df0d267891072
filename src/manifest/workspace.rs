//! Workspace package enumeration from pnpm-workspace.yaml
//!
//! Supports the `packages:` list with:
//! - Globs: `'packages/*'`, `apps/**`
//! - Plain directories: `tools/cli`
//! - Negations: `'!**/test/**'`

use crate::error::ManifestError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// pnpm workspace definition file
pub const WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Package manifest file name
pub const PACKAGE_JSON: &str = "package.json";

/// A package of the workspace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkspacePackage {
    /// Absolute package directory
    pub dir: PathBuf,
}

impl WorkspacePackage {
    /// Path of the package's package.json
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(PACKAGE_JSON)
    }
}

/// Returns true if the directory is a pnpm workspace root
pub fn is_pnpm_workspace(dir: &Path) -> bool {
    dir.join(WORKSPACE_FILE).exists()
}

/// Finds the nearest ancestor of `start` that is a pnpm workspace root
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| is_pnpm_workspace(dir))
        .map(Path::to_path_buf)
}

/// The part of pnpm-workspace.yaml that lists packages
#[derive(Debug, Default, Deserialize)]
struct WorkspaceFile {
    #[serde(default)]
    packages: Option<Vec<String>>,
}

/// Reads the `packages:` patterns of pnpm-workspace.yaml
///
/// Block and flow lists are both accepted; an empty file or a file without
/// `packages` lists nothing.
pub fn parse_workspace_patterns(content: &str, path: &Path) -> Result<Vec<String>, ManifestError> {
    let file: Option<WorkspaceFile> = serde_yaml::from_str(content)
        .map_err(|e| ManifestError::yaml_parse_error(path, e.to_string()))?;
    Ok(file.and_then(|f| f.packages).unwrap_or_default())
}

/// Lists every package of the workspace, the root package included
///
/// Without pnpm-workspace.yaml only the root package is returned.
pub fn find_workspace_packages(root: &Path) -> Result<Vec<WorkspacePackage>, ManifestError> {
    let mut dirs = BTreeSet::new();
    if root.join(PACKAGE_JSON).exists() {
        dirs.insert(root.to_path_buf());
    }

    let workspace_file = root.join(WORKSPACE_FILE);
    if !workspace_file.exists() {
        return Ok(into_packages(dirs));
    }

    let content = std::fs::read_to_string(&workspace_file)
        .map_err(|e| ManifestError::read_error(&workspace_file, e))?;

    let (excludes, includes): (Vec<_>, Vec<_>) = parse_workspace_patterns(&content, &workspace_file)?
        .into_iter()
        .partition(|p| p.starts_with('!'));

    let excludes = excludes
        .iter()
        .map(|p| {
            glob::Pattern::new(p.trim_start_matches('!')).map_err(|e| {
                ManifestError::InvalidWorkspacePattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for pattern in &includes {
        let full = root.join(pattern.trim_end_matches('/'));
        let full = full.to_string_lossy();
        let entries = glob::glob(&full).map_err(|e| ManifestError::InvalidWorkspacePattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for dir in entries.flatten() {
            if !dir.join(PACKAGE_JSON).is_file() || is_in_node_modules(&dir) {
                continue;
            }
            let relative = dir.strip_prefix(root).unwrap_or(&dir);
            if excludes.iter().any(|ex| ex.matches_path(relative)) {
                continue;
            }
            dirs.insert(dir);
        }
    }

    Ok(into_packages(dirs))
}

fn is_in_node_modules(dir: &Path) -> bool {
    dir.components().any(|c| c.as_os_str() == "node_modules")
}

fn into_packages(dirs: BTreeSet<PathBuf>) -> Vec<WorkspacePackage> {
    dirs.into_iter().map(|dir| WorkspacePackage { dir }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn add_package(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PACKAGE_JSON), "{}").unwrap();
    }

    fn patterns(content: &str) -> Vec<String> {
        parse_workspace_patterns(content, Path::new(WORKSPACE_FILE)).unwrap()
    }

    #[test]
    fn test_parse_patterns() {
        let content = "packages:\n  - 'packages/*'\n  - \"apps/**\"\n  - tools/cli # cli\n  - '!**/test/**'\ncatalog:\n  react: 18\n";
        assert_eq!(
            patterns(content),
            vec!["packages/*", "apps/**", "tools/cli", "!**/test/**"]
        );
    }

    #[test]
    fn test_parse_patterns_flow_list() {
        assert_eq!(
            patterns("packages: ['packages/*', \"apps/*\"]\n"),
            vec!["packages/*", "apps/*"]
        );
    }

    #[test]
    fn test_parse_patterns_empty() {
        assert!(patterns("").is_empty());
        assert!(patterns("# no packages yet\n").is_empty());
        assert!(patterns("packages:\n").is_empty());
        assert!(patterns("onlyBuiltDependencies:\n  - esbuild\n").is_empty());
    }

    #[test]
    fn test_parse_patterns_invalid_yaml() {
        let err = parse_workspace_patterns("packages: [a\n", Path::new(WORKSPACE_FILE)).unwrap_err();
        assert!(matches!(err, ManifestError::YamlParseError { .. }));
    }

    #[test]
    fn test_find_packages_flow_list() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(PACKAGE_JSON), "{}").unwrap();
        fs::write(root.join(WORKSPACE_FILE), "packages: ['packages/*']\n").unwrap();
        add_package(root, "packages/a");

        let packages = find_workspace_packages(root).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].dir, root.join("packages/a"));
    }

    #[test]
    fn test_root_only_without_workspace_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PACKAGE_JSON), "{}").unwrap();
        add_package(dir.path(), "packages/a");

        let packages = find_workspace_packages(dir.path()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].dir, dir.path());
    }

    #[test]
    fn test_find_packages_with_globs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(PACKAGE_JSON), "{}").unwrap();
        fs::write(
            root.join(WORKSPACE_FILE),
            "packages:\n  - 'packages/*'\n  - 'tools/cli'\n  - '!packages/legacy'\n",
        )
        .unwrap();
        add_package(root, "packages/a");
        add_package(root, "packages/b");
        add_package(root, "packages/legacy");
        add_package(root, "tools/cli");
        // Directory without package.json is not a package
        fs::create_dir_all(root.join("packages/docs")).unwrap();

        let packages = find_workspace_packages(root).unwrap();
        let dirs: Vec<_> = packages
            .iter()
            .map(|p| p.dir.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from(""),
                PathBuf::from("packages/a"),
                PathBuf::from("packages/b"),
                PathBuf::from("tools/cli"),
            ]
        );
    }

    #[test]
    fn test_find_workspace_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(WORKSPACE_FILE), "packages: []\n").unwrap();
        let nested = dir.path().join("packages/a/src");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_workspace_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_manifest_path() {
        let package = WorkspacePackage {
            dir: PathBuf::from("/repo/packages/a"),
        };
        assert_eq!(
            package.manifest_path(),
            PathBuf::from("/repo/packages/a/package.json")
        );
    }
}
