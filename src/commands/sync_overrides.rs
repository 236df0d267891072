//! `sync-overrides`: keep workspace dependency versions on the versions
//! locked in the root manifest's `pnpm.overrides`

use crate::commands::Context;
use crate::domain::SyncReport;
use crate::error::{AppError, EXIT_FAILURE};
use crate::manifest::find_workspace_packages;
use crate::output::TextFormatter;
use crate::progress::Progress;
use crate::sync::{load_lock_table, Synchronizer};
use std::io::{self, Write};

/// Run the synchronization and print its report
pub async fn run(ctx: &Context, fix: bool) -> Result<u8, AppError> {
    let mut progress = Progress::spinner(
        ctx.logger.verbosity().show_progress(),
        "Scanning workspace packages...",
    );

    let table = load_lock_table(&ctx.root, &ctx.config.sync).await?;
    ctx.logger.debug(format!(
        "{} locked dependencies: {}",
        table.len(),
        table.keys().collect::<Vec<_>>().join(", ")
    ));
    let packages = find_workspace_packages(&ctx.root)?;
    progress.set_message(format!("Checking {} packages...", packages.len()));

    let synchronizer = Synchronizer::new(&ctx.root, table, &ctx.config.sync.override_file, fix);
    let report = synchronizer.run(&packages, ctx.runner.as_ref()).await?;
    progress.finish_and_clear();

    ctx.logger.debug(format!(
        "{} packages scanned, {} drifted dependencies",
        packages.len(),
        report.total_records()
    ));

    present(ctx, &report, fix)
}

fn present(ctx: &Context, report: &SyncReport, fix: bool) -> Result<u8, AppError> {
    let formatter = TextFormatter::new(ctx.logger.verbosity());
    let mut stdout = io::stdout().lock();

    if let Some(code) = report.violation_exit_code() {
        ctx.logger
            .error("Dependencies must be locked in pnpm.overrides of the root package.json:");
        formatter.format_violations(&report.violations, &mut stdout)?;
        stdout.flush()?;
        return Ok(code);
    }

    if !report.has_drift() {
        ctx.logger
            .success("All dependency versions match the versions locked in pnpm.overrides");
        return Ok(0);
    }

    if fix {
        ctx.logger.success(format!(
            "Synchronized {} dependencies in {} files",
            report.total_records(),
            report.written.len()
        ));
        formatter.format_fixed(report, &mut stdout)?;
        stdout.flush()?;
        return Ok(0);
    }

    ctx.logger.error(
        "Versions are locked in pnpm.overrides of the root package.json, update these dependencies:",
    );
    formatter.format_drift(report, &mut stdout)?;
    formatter.format_fix_hint(&mut stdout)?;
    stdout.flush()?;
    Ok(EXIT_FAILURE)
}
