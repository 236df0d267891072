//! wsguard.toml configuration
//!
//! Every section is optional; an absent file yields the defaults below.
//!
//! ```toml
//! [sync]
//! exempt = ["some-ai-sdk"]
//! override_file = "web-module.json"
//!
//! [[sync.multi_version]]
//! name = "axios"
//! threshold = "1.0.0"
//! below = "axios@<1"
//! at_or_above = "axios@1"
//!
//! [[lint.tasks]]
//! name = "eslint"
//! patterns = ["*.{js,ts,tsx}"]
//! command = "eslint --cache"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// File name of the configuration at the workspace root
pub const CONFIG_FILE: &str = "wsguard.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub sync: SyncConfig,
    pub lint: LintConfig,
    pub file_names: FileNameConfig,
    pub branch: BranchConfig,
    pub prepare: PrepareConfig,
}

/// `[sync]`: dependency-version synchronization
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Dependencies allowed to have several versions across the workspace
    pub exempt: Vec<String>,
    /// Dependencies locked per major line instead of to a single version
    pub multi_version: Vec<MultiVersionRule>,
    /// Per-package override file of the secondary build target
    pub override_file: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            exempt: Vec::new(),
            multi_version: Vec::new(),
            override_file: "web-module.json".to_string(),
        }
    }
}

/// A dependency whose lock entry depends on the currently declared version
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MultiVersionRule {
    /// Dependency name
    pub name: String,
    /// Versions below this use `below`, the rest `at_or_above`
    pub threshold: String,
    /// Override key for declared versions below the threshold
    pub below: String,
    /// Override key for declared versions at or above the threshold
    pub at_or_above: String,
}

/// `[lint]`: changed-file linting
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Default base branch
    pub base_branch: String,
    /// Environment variable that overrides the base branch (set by CI)
    pub base_branch_env: String,
    /// Command run by `lint-fix`, `--diff <base>...HEAD` is appended
    pub fix_command: String,
    /// Linters run over changed files
    pub tasks: Vec<LintTask>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            base_branch: "master".to_string(),
            base_branch_env: "CHANGE_TARGET".to_string(),
            fix_command: "lint-staged --no-stash --allow-empty -p false".to_string(),
            tasks: Vec::new(),
        }
    }
}

/// A linter and the files it applies to
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LintTask {
    /// Display name
    pub name: String,
    /// File patterns, matched anywhere in the tree
    pub patterns: Vec<String>,
    /// Command line; matched files are appended
    pub command: String,
}

/// `[file_names]`: kebab-case lint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileNameConfig {
    /// Base names never checked
    pub ignored_files: Vec<String>,
    /// Directory names whose contents are never checked
    pub ignored_dirs: Vec<String>,
}

impl Default for FileNameConfig {
    fn default() -> Self {
        Self {
            ignored_files: [
                "README.md",
                "CHANGELOG.md",
                "LICENSE.txt",
                "CODEOWNERS",
                "Jenkinsfile",
                "pull_request_template.md",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ignored_dirs: vec!["__mocks__".to_string()],
        }
    }
}

/// `[branch]`: branch-name lint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BranchConfig {
    /// Pattern a branch name must match
    pub valid: String,
    /// Branches that are never checked (main line, automation branches)
    pub ignored: String,
    /// Naming guide linked from the warning
    pub guide_url: Option<String>,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            valid: r"^(feature|chore|bugfix|hotfix|beta|release)(/[\w.#-]+)+$".to_string(),
            ignored: r"(^master$)|(^v(\d+.){3})".to_string(),
            guide_url: None,
        }
    }
}

/// `[prepare]`: install-time hook
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PrepareConfig {
    /// Task-runner task that builds the repository tooling
    pub build_task: String,
    /// Environment variable that forces a build without cache
    pub skip_cache_env: String,
    /// Install git hooks and shared git config outside CI
    pub git_hooks: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            build_task: "build:tool".to_string(),
            skip_cache_env: "WSGUARD_SKIP_CACHE".to_string(),
            git_hooks: true,
        }
    }
}

impl ToolConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::toml_parse_error(path, e.to_string()))
    }

    /// Load `wsguard.toml` from the workspace root, defaults when absent
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::read_error(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.sync.override_file, "web-module.json");
        assert!(config.sync.exempt.is_empty());
        assert_eq!(config.lint.base_branch, "master");
        assert_eq!(config.lint.base_branch_env, "CHANGE_TARGET");
        assert!(config
            .file_names
            .ignored_files
            .contains(&"README.md".to_string()));
        assert_eq!(config.prepare.build_task, "build:tool");
        assert!(config.prepare.git_hooks);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = ToolConfig::load(dir.path()).unwrap();
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let content = r#"
[sync]
exempt = ["ai-sdk"]
override_file = "module.json"

[[sync.multi_version]]
name = "axios"
threshold = "1.0.0"
below = "axios@<1"
at_or_above = "axios@1"

[lint]
base_branch = "main"

[[lint.tasks]]
name = "eslint"
patterns = ["*.{js,ts}"]
command = "eslint --cache"

[branch]
guide_url = "https://example.com/branches"
"#;
        let config = ToolConfig::parse(content, Path::new("wsguard.toml")).unwrap();
        assert_eq!(config.sync.exempt, vec!["ai-sdk"]);
        assert_eq!(config.sync.override_file, "module.json");
        assert_eq!(config.sync.multi_version.len(), 1);
        assert_eq!(config.sync.multi_version[0].below, "axios@<1");
        assert_eq!(config.lint.base_branch, "main");
        // Untouched keys keep their defaults
        assert_eq!(config.lint.base_branch_env, "CHANGE_TARGET");
        assert_eq!(config.lint.tasks[0].patterns, vec!["*.{js,ts}"]);
        assert_eq!(
            config.branch.guide_url.as_deref(),
            Some("https://example.com/branches")
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = ToolConfig::parse("[sync]\nexcempt = []\n", Path::new("wsguard.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse TOML"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[prepare]\ngit_hooks = false\n",
        )
        .unwrap();
        let config = ToolConfig::load(dir.path()).unwrap();
        assert!(!config.prepare.git_hooks);
    }
}
