//! Subcommand implementations
//!
//! Each command returns the process exit code on completion; errors are
//! mapped to exit codes by `AppError::exit_code`.

pub mod check_branch;
pub mod check_env;
pub mod lint_changed;
pub mod lint_file_names;
pub mod lint_fix;
pub mod prepare;
pub mod sync_overrides;
pub mod turbo_run;

use crate::config::ToolConfig;
use crate::env::Env;
use crate::output::Logger;
use crate::process::CommandRunner;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs, resolved once at startup
pub struct Context {
    /// Workspace root
    pub root: PathBuf,
    /// Parsed wsguard.toml
    pub config: ToolConfig,
    /// Status output
    pub logger: Logger,
    /// External command runner
    pub runner: Arc<dyn CommandRunner>,
    /// Environment snapshot
    pub env: Env,
}

impl Context {
    /// Create a context
    pub fn new(
        root: impl Into<PathBuf>,
        config: ToolConfig,
        logger: Logger,
        runner: Arc<dyn CommandRunner>,
        env: Env,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            logger,
            runner,
            env,
        }
    }

    /// Whether the process runs in CI
    pub fn is_ci(&self) -> bool {
        self.env.is_ci()
    }
}

/// Converts a child's exit status into our exit code
pub(crate) fn passthrough_code(code: Option<i32>) -> u8 {
    code.and_then(|c| u8::try_from(c).ok())
        .filter(|c| *c != 0)
        .unwrap_or(crate::error::EXIT_FAILURE)
}
