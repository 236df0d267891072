//! CLI argument parsing module for wsguard

use crate::output::Verbosity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const SYNC_EXIT_CODES: &str = "\
Exit codes:
  0  every dependency matches the lock table
  1  drift found, or the command failed
  2  unsanctioned dependency in an override file
  3  unsanctioned dependency in a package manifest";

/// Workflow guards for pnpm monorepos
#[derive(Parser, Debug, Clone)]
#[command(name = "wsguard", version, about = "Workflow guards for pnpm monorepos")]
pub struct CliArgs {
    /// Workspace root (default: nearest directory with pnpm-workspace.yaml)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Output verbosity selected by the flags
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check every manifest against the pnpm.overrides lock table
    #[command(after_help = SYNC_EXIT_CODES)]
    SyncOverrides {
        /// Rewrite drifted manifests and stage them
        #[arg(long)]
        fix: bool,
    },

    /// Verify the node and pnpm versions of the current shell
    CheckEnv,

    /// Lint files changed since the base branch
    LintChanged {
        /// Base branch (default: $CHANGE_TARGET, then the configured branch)
        #[arg(long)]
        base: Option<String>,
    },

    /// Check that file and directory names are kebab-case
    LintFileNames {
        /// Files to check, relative to the workspace root
        files: Vec<PathBuf>,
    },

    /// Auto-fix lint errors in the changes since the base branch
    LintFix {
        /// Base branch (default: the configured branch)
        base: Option<String>,
    },

    /// Warn when the current branch name breaks the naming convention
    CheckBranch,

    /// Build the tooling and install git hooks
    Prepare,

    /// Run a turbo task and explain failures
    TurboRun {
        /// Task name
        task: String,

        /// Extra arguments passed to turbo
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
