//! `turbo-run`: run a turbo task and explain which package failed

use crate::commands::Context;
use crate::error::{AppError, CommandError, EXIT_FAILURE};
use crate::output::boxed;
use crate::process::{CommandSpec, OutputMode};
use colored::Colorize;
use console::strip_ansi_codes;
use regex::Regex;
use std::sync::LazyLock;

/// Marker that makes CI skip the task-runner cache
pub const SKIP_CACHE_FLAG: &str = "[skip cache]";

static FAILED_TASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\nFailed: {4}(?<package>[\w\-@/]+)#(?<script>[\w:-]+)").unwrap()
});

const RULE: &str = "----------------------------------------------------------------------";

/// Package script named in turbo's failure summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTask {
    pub package: String,
    pub script: String,
}

impl FailedTask {
    /// Command that reproduces the failure locally
    pub fn repro_command(&self) -> String {
        format!("pnpm --filter {} {}", self.package, self.script)
    }
}

/// Finds the `Failed:    <package>#<script>` summary line
pub fn find_failed_task(stdout: &str) -> Option<FailedTask> {
    let captures = FAILED_TASK.captures(stdout.trim_end())?;
    Some(FailedTask {
        package: captures.name("package")?.as_str().to_string(),
        script: captures.name("script")?.as_str().to_string(),
    })
}

/// The failed task's own output lines with turbo's `<package>:<script>: ` prefix removed
pub fn task_output(stdout: &str, task: &FailedTask) -> String {
    let prefix = format!("{}:{}: ", task.package, task.script);
    stdout
        .lines()
        .filter(|line| strip_ansi_codes(line).starts_with(&prefix))
        .map(|line| line.split_once(' ').map_or(line, |(_, rest)| rest))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_diagnostics(ctx: &Context, stdout: &str, task: &FailedTask) {
    ctx.logger.error(format!(
        "running {} of {} failed!",
        task.script.yellow(),
        task.package.yellow()
    ));

    println!(
        "{}",
        "------------------------------ output ------------------------------\n".yellow()
    );
    println!("{}", task_output(stdout, task));
    println!("{}", format!("\n{}\n", RULE).yellow());

    println!(
        "{}",
        boxed(
            &"Run the command below locally to reproduce the error"
                .red()
                .to_string(),
            &task.repro_command().green().to_string(),
        )
    );

    if !ctx.is_ci() {
        return;
    }
    if let Some(title) = ctx.env.non_empty("CHANGE_TITLE") {
        if !title.contains(SKIP_CACHE_FLAG) {
            println!();
            println!(
                "{}",
                boxed(
                    &"If it passes locally, rename the pull request like this to skip the CI cache"
                        .red()
                        .to_string(),
                    &format!("{} {}", title, SKIP_CACHE_FLAG).green().to_string(),
                )
            );
        }
    }
}

/// Run `turbo run <task> <args>`
///
/// A failure turbo attributes to a package script is explained and exits
/// with 1; any other failure keeps turbo's exit code.
pub async fn run(ctx: &Context, task: &str, args: &[String]) -> Result<u8, AppError> {
    let spec = CommandSpec::new("turbo")
        .arg("run")
        .arg(task)
        .args(args.iter().cloned())
        .cwd(&ctx.root)
        .mode(OutputMode::Tee)
        .echo(true);
    let output = ctx.runner.run(&spec).await?;
    if output.success() {
        return Ok(0);
    }

    match find_failed_task(&output.stdout) {
        Some(failed) => {
            print_diagnostics(ctx, &output.stdout, &failed);
            Ok(EXIT_FAILURE)
        }
        None => Err(CommandError::failed(spec.display(), output.code, output.stderr).into()),
    }
}
