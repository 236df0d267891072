//! `lint-fix`: update the base branch, run the fixing linters over the
//! branch's changes and report whether anything was fixed

use crate::commands::Context;
use crate::error::AppError;
use crate::git::Git;
use crate::output::Verbosity;
use crate::process::{CommandSpec, OutputMode};
use colored::Colorize;

/// Run the fix flow against `base` (configured base branch when absent)
pub async fn run(ctx: &Context, base: Option<String>) -> Result<u8, AppError> {
    let git = Git::new(ctx.runner.as_ref(), &ctx.root);
    let base = base.unwrap_or_else(|| ctx.config.lint.base_branch.clone());

    if ctx.logger.verbosity() == Verbosity::Verbose {
        let branches = git.local_branches().await?;
        ctx.logger
            .debug(format!("local branches: {}", branches.join(", ")));
    }

    ctx.logger.warn(format!(
        "Updating local {} to the latest remote version...",
        base.green()
    ));
    git.fetch_branch(&base).await?;

    let spec = CommandSpec::parse(&ctx.config.lint.fix_command)?
        .arg("--diff")
        .arg(format!("{}...HEAD", base))
        .cwd(&ctx.root)
        .env("LINT_FIX", "1")
        .mode(OutputMode::Inherit)
        .echo(true);
    ctx.runner.run_checked(&spec).await?;

    println!();
    if git.has_staged_files().await? {
        ctx.logger.warn("Commit the auto-fixed files!");
    } else {
        ctx.logger.success("No lint errors found locally");
    }
    Ok(0)
}
