//! `lint-changed`: run the configured linters over files changed since the
//! base branch
//!
//! Linters only read files, so all tasks run at the same time.

use crate::commands::{passthrough_code, Context};
use crate::config::LintTask;
use crate::error::{AppError, ConfigError};
use crate::git::Git;
use crate::output::{boxed, format_duration};
use crate::process::{CommandOutput, CommandSpec, OutputMode};
use colored::Colorize;
use glob::{MatchOptions, Pattern};
use std::time::Instant;
use tokio::task::JoinSet;

/// Above this many files the echoed command line shows a count instead
const MAX_LISTED_FILES: usize = 10;

/// Expands `{a,b}` alternations, nested groups included
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(open + i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{}{}{}", prefix, &pattern[w[0] + 1..w[1]], suffix)))
        .collect()
}

/// File matcher for one lint task
///
/// A pattern applies anywhere in the tree, as if prefixed with `**/`.
pub struct FileMatcher {
    patterns: Vec<Pattern>,
}

impl FileMatcher {
    /// Compile the task's patterns
    pub fn new(task: &LintTask) -> Result<Self, ConfigError> {
        let mut patterns = Vec::new();
        for raw in &task.patterns {
            for expanded in expand_braces(raw) {
                for candidate in [expanded.clone(), format!("**/{}", expanded)] {
                    let pattern = Pattern::new(&candidate).map_err(|e| {
                        ConfigError::invalid_pattern(
                            format!("lint.tasks.{}", task.name),
                            raw.clone(),
                            e.to_string(),
                        )
                    })?;
                    patterns.push(pattern);
                }
            }
        }
        Ok(Self { patterns })
    }

    /// Returns true if the root-relative path matches
    pub fn matches(&self, path: &str) -> bool {
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::default()
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, options))
    }

    /// Files of `changed` matched by this task, in input order
    pub fn select(&self, changed: &[String]) -> Vec<String> {
        changed
            .iter()
            .filter(|f| self.matches(f))
            .cloned()
            .collect()
    }
}

/// Command line as echoed before running, long file lists abbreviated
fn echo_line(spec: &CommandSpec, files: &[String]) -> String {
    let files = if files.len() > MAX_LISTED_FILES {
        format!("<...{} files>", files.len())
    } else {
        files.join(" ")
    };
    let mut parts = vec![spec.program.bold().to_string()];
    parts.extend(spec.args.iter().cloned());
    parts.push(files.green().to_string());
    format!("$ {}", parts.join(" "))
}

struct TaskFailure {
    name: String,
    output: CommandOutput,
    files: Vec<String>,
}

/// Run every configured lint task over the changed files
pub async fn run(ctx: &Context, base: Option<String>) -> Result<u8, AppError> {
    let lint = &ctx.config.lint;
    let base = base
        .or_else(|| ctx.env.non_empty(&lint.base_branch_env).map(String::from))
        .unwrap_or_else(|| lint.base_branch.clone());
    ctx.logger.info(format!("Base branch: {}", base.green()));

    let changed = Git::new(ctx.runner.as_ref(), &ctx.root)
        .changed_files(&base)
        .await?;
    ctx.logger
        .debug(format!("{} changed files since {}", changed.len(), base));

    let mut set = JoinSet::new();
    for (index, task) in lint.tasks.iter().enumerate() {
        let files = FileMatcher::new(task)?.select(&changed);
        if files.is_empty() {
            ctx.logger.info(
                format!("no files matched, skip {}", task.name.magenta().bold())
                    .yellow()
                    .to_string(),
            );
            continue;
        }

        let command = CommandSpec::parse(&task.command)?;
        println!("{}\n", echo_line(&command, &files).magenta());
        let spec = command
            .args(files.iter().cloned())
            .cwd(&ctx.root)
            .mode(OutputMode::Inherit);

        let runner = ctx.runner.clone();
        let name = task.name.clone();
        set.spawn(async move {
            let start = Instant::now();
            let result = runner.run(&spec).await;
            (index, name, files, start.elapsed(), result)
        });
    }

    let mut failures = Vec::new();
    while let Some(joined) = set.join_next().await {
        let (index, name, files, elapsed, result) = joined?;
        let output = result?;
        if output.success() {
            ctx.logger
                .success(format!("{} {}", name, format_duration(elapsed)));
        } else {
            failures.push((index, TaskFailure { name, output, files }));
        }
    }

    failures.sort_by_key(|(index, _)| *index);
    let Some((_, failure)) = failures.into_iter().next() else {
        ctx.logger.success("Lint passed");
        return Ok(0);
    };

    ctx.logger.error(format!(
        "{} failed with exit code {}",
        failure.name,
        failure
            .output
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string())
    ));
    println!(
        "{}",
        boxed(
            &"Lint failed, run the fix command below locally!".red().to_string(),
            &format!("wsguard lint-fix {}", base).green().to_string(),
        )
    );
    ctx.logger.error(format!(
        "Changed files:\n{}",
        failure
            .files
            .iter()
            .map(|f| f.green().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    ));

    Ok(passthrough_code(failure.output.code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::FakeRunner;
    use crate::config::ToolConfig;
    use crate::env::Env;
    use crate::output::{Logger, Verbosity};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn task(name: &str, patterns: &[&str], command: &str) -> LintTask {
        LintTask {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            command: command.to_string(),
        }
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("*.ts"), vec!["*.ts"]);
        assert_eq!(expand_braces("*.{js,ts}"), vec!["*.js", "*.ts"]);
        assert_eq!(
            expand_braces("{src,lib}/*.{js,{c,m}ts}"),
            vec![
                "src/*.js", "src/*.cts", "src/*.mts", "lib/*.js", "lib/*.cts", "lib/*.mts"
            ]
        );
        assert_eq!(expand_braces("broken{a,b"), vec!["broken{a,b"]);
    }

    #[test]
    fn test_matcher_anywhere_in_tree() {
        let matcher = FileMatcher::new(&task("eslint", &["*.{js,ts,tsx}"], "eslint")).unwrap();
        assert!(matcher.matches("index.ts"));
        assert!(matcher.matches("packages/a/src/app.tsx"));
        assert!(!matcher.matches("packages/a/style.css"));
        assert!(!matcher.matches("packages/a/app.ts.snap"));
    }

    #[test]
    fn test_matcher_directory_pattern() {
        let matcher = FileMatcher::new(&task("style", &["src/**/*.css"], "stylelint")).unwrap();
        assert!(matcher.matches("packages/a/src/x/y.css"));
        assert!(matcher.matches("src/a.css"));
        assert!(!matcher.matches("lib/a.css"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(FileMatcher::new(&task("bad", &["[z-a"], "x")).is_err());
    }

    #[test]
    fn test_echo_line_abbreviates() {
        let spec = CommandSpec::parse("eslint --cache").unwrap();
        let few = vec!["a.ts".to_string(), "b.ts".to_string()];
        let many: Vec<String> = (0..11).map(|i| format!("f{}.ts", i)).collect();
        let strip = |s: String| console::strip_ansi_codes(&s).to_string();
        assert_eq!(strip(echo_line(&spec, &few)), "$ eslint --cache a.ts b.ts");
        assert_eq!(strip(echo_line(&spec, &many)), "$ eslint --cache <...11 files>");
    }

    fn context(runner: Arc<FakeRunner>, tasks: Vec<LintTask>, env: Env) -> (TempDir, Context) {
        let dir = TempDir::new().unwrap();
        let mut config = ToolConfig::default();
        config.lint.tasks = tasks;
        let ctx = Context::new(
            dir.path(),
            config,
            Logger::new(Verbosity::Quiet),
            runner,
            env,
        );
        (dir, ctx)
    }

    #[tokio::test]
    async fn test_runs_matching_tasks_with_files() {
        let runner = Arc::new(
            FakeRunner::default().respond("git diff", CommandOutput::ok("src/a.ts\nREADME.md\n")),
        );
        let (_dir, ctx) = context(
            runner.clone(),
            vec![
                task("eslint", &["*.ts"], "eslint --cache"),
                task("stylelint", &["*.css"], "stylelint"),
            ],
            Env::default().with("CHANGE_TARGET", "develop"),
        );

        assert_eq!(run(&ctx, None).await.unwrap(), 0);
        assert_eq!(
            runner.commands(),
            vec![
                "git diff --name-only --diff-filter=ACMR develop...HEAD",
                "eslint --cache src/a.ts"
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_passes_exit_code_through() {
        let runner = Arc::new(
            FakeRunner::default()
                .respond("git diff", CommandOutput::ok("src/a.ts\n"))
                .respond("eslint", CommandOutput::failed(2, "")),
        );
        let (_dir, ctx) = context(
            runner,
            vec![task("eslint", &["*.ts"], "eslint")],
            Env::default(),
        );
        assert_eq!(run(&ctx, Some("master".to_string())).await.unwrap(), 2);
    }
}
