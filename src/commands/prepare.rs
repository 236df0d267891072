//! `prepare`: install-time setup of the workspace
//!
//! Builds the repository tooling and, outside CI, installs the git hooks
//! and the shared git config. Both run at the same time; any failure is
//! fatal.

use crate::commands::{turbo_run, Context};
use crate::error::AppError;
use crate::git::Git;
use crate::process::{CommandSpec, OutputMode};

/// Shared git config included into the local repository config
pub const SHARED_GIT_CONFIG: &str = "../.gitconfig";

/// Arguments for the tooling build
fn build_args(ctx: &Context) -> Vec<String> {
    let mut args = vec!["--output-logs".to_string(), "errors-only".to_string()];
    if ctx.env.contains(&ctx.config.prepare.skip_cache_env) {
        args.push("--force".to_string());
    }
    args
}

async fn build_tooling(ctx: &Context) -> Result<u8, AppError> {
    turbo_run::run(ctx, &ctx.config.prepare.build_task, &build_args(ctx)).await
}

async fn install_hooks(ctx: &Context) -> Result<(), AppError> {
    if !ctx.config.prepare.git_hooks {
        return Ok(());
    }
    if ctx.is_ci() {
        ctx.logger.debug("CI detected, skipping git hooks");
        return Ok(());
    }

    let hooks = CommandSpec::new("simple-git-hooks")
        .cwd(&ctx.root)
        .mode(OutputMode::Inherit)
        .echo(true);
    ctx.runner.run_checked(&hooks).await?;
    Git::new(ctx.runner.as_ref(), &ctx.root)
        .config_include(SHARED_GIT_CONFIG)
        .await?;
    Ok(())
}

/// Run the install-time setup
pub async fn run(ctx: &Context) -> Result<u8, AppError> {
    let (code, ()) = tokio::try_join!(build_tooling(ctx), install_hooks(ctx))?;
    if code == 0 {
        ctx.logger.success("Workspace prepared");
    }
    Ok(code)
}
