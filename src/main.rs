//! wsguard - workflow guards for pnpm monorepos

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use wsguard::cli::{CliArgs, Command};
use wsguard::commands::{
    check_branch, check_env, lint_changed, lint_file_names, lint_fix, prepare, sync_overrides,
    turbo_run, Context,
};
use wsguard::config::ToolConfig;
use wsguard::env::Env;
use wsguard::error::{AppError, IoError};
use wsguard::manifest::find_workspace_root;
use wsguard::output::Logger;
use wsguard::process::SystemRunner;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Directory the commands operate on
fn resolve_root(args: &CliArgs) -> anyhow::Result<PathBuf> {
    if let Some(ref root) = args.root {
        if !root.is_dir() {
            return Err(IoError::directory_not_found(root).into());
        }
        return Ok(root.clone());
    }
    let cwd = std::env::current_dir()?;
    Ok(find_workspace_root(&cwd).unwrap_or(cwd))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let logger = Logger::new(args.verbosity());
    let root = resolve_root(&args)?;
    logger.debug(format!("wsguard v{}", env!("CARGO_PKG_VERSION")));
    logger.debug(format!("workspace root: {}", root.display()));

    let config = ToolConfig::load(&root)?;
    let ctx = Context::new(
        root,
        config,
        logger,
        Arc::new(SystemRunner::new()),
        Env::from_process(),
    );

    let result = dispatch(&ctx, args.command).await;
    match result {
        Ok(code) => Ok(ExitCode::from(code)),
        Err(e) => {
            ctx.logger.error(e.to_string());
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}

async fn dispatch(ctx: &Context, command: Command) -> Result<u8, AppError> {
    match command {
        Command::SyncOverrides { fix } => sync_overrides::run(ctx, fix).await,
        Command::CheckEnv => check_env::run(ctx).await,
        Command::LintChanged { base } => lint_changed::run(ctx, base).await,
        Command::LintFileNames { files } => lint_file_names::run(ctx, &files),
        Command::LintFix { base } => lint_fix::run(ctx, base).await,
        Command::CheckBranch => check_branch::run(ctx).await,
        Command::Prepare => prepare::run(ctx).await,
        Command::TurboRun { task, args } => turbo_run::run(ctx, &task, &args).await,
    }
}
