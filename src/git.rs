//! Thin git wrapper over the command runner
//!
//! Every call runs in the workspace root. A non-zero git exit becomes a
//! `CommandError::Failed` carrying the command line and git's stderr.

use crate::error::CommandError;
use crate::process::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};

/// Git operations used by the workflow commands
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    cwd: PathBuf,
}

impl<'a> Git<'a> {
    /// Create a wrapper running git in `cwd`
    pub fn new(runner: &'a dyn CommandRunner, cwd: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            cwd: cwd.into(),
        }
    }

    async fn git<I, S>(&self, args: I) -> Result<String, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new("git").args(args).cwd(&self.cwd);
        let output = self.runner.run_checked(&spec).await?;
        Ok(output.stdout)
    }

    /// Stage one file
    pub async fn add(&self, path: &Path) -> Result<(), CommandError> {
        self.git(["add".to_string(), path.to_string_lossy().into_owned()])
            .await
            .map(|_| ())
    }

    /// Files added, copied, modified or renamed since the merge base with `base`
    pub async fn changed_files(&self, base: &str) -> Result<Vec<String>, CommandError> {
        let stdout = self
            .git([
                "diff".to_string(),
                "--name-only".to_string(),
                "--diff-filter=ACMR".to_string(),
                format!("{}...HEAD", base),
            ])
            .await?;
        Ok(non_empty_lines(&stdout))
    }

    /// Name of the checked out branch
    pub async fn current_branch(&self) -> Result<String, CommandError> {
        let stdout = self.git(["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(stdout.trim().to_string())
    }

    /// Local branches except the current one
    pub async fn local_branches(&self) -> Result<Vec<String>, CommandError> {
        let stdout = self.git(["branch"]).await?;
        Ok(parse_branch_list(&stdout))
    }

    /// Fast-forward the local `base` branch from origin
    pub async fn fetch_branch(&self, base: &str) -> Result<(), CommandError> {
        self.git([
            "fetch".to_string(),
            "-u".to_string(),
            "origin".to_string(),
            format!("{0}:{0}", base),
        ])
        .await
        .map(|_| ())
    }

    /// Returns true if the index has staged changes
    pub async fn has_staged_files(&self) -> Result<bool, CommandError> {
        let stdout = self.git(["diff", "--name-only", "--cached"]).await?;
        Ok(!stdout.trim().is_empty())
    }

    /// Add a shared config file to the repository's local git config
    pub async fn config_include(&self, path: &str) -> Result<(), CommandError> {
        self.git(["config", "--local", "include.path", path])
            .await
            .map(|_| ())
    }
}

fn non_empty_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parses `git branch` output, dropping the current (`*`) branch
fn parse_branch_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.trim_start().starts_with('*'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedRunner {
        output: CommandOutput,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        fn new(output: CommandOutput) -> Self {
            Self {
                output,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_call(&self) -> CommandSpec {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(self.output.clone())
        }
    }

    #[tokio::test]
    async fn test_changed_files() {
        let runner = ScriptedRunner::new(CommandOutput::ok("src/a.ts\n\nsrc/b.tsx\n"));
        let git = Git::new(&runner, "/repo");

        let files = git.changed_files("master").await.unwrap();
        assert_eq!(files, vec!["src/a.ts", "src/b.tsx"]);

        let call = runner.last_call();
        assert_eq!(
            call.display(),
            "git diff --name-only --diff-filter=ACMR master...HEAD"
        );
        assert_eq!(call.cwd, Some(PathBuf::from("/repo")));
    }

    #[tokio::test]
    async fn test_current_branch_trims() {
        let runner = ScriptedRunner::new(CommandOutput::ok("feature/login\n"));
        let git = Git::new(&runner, "/repo");
        assert_eq!(git.current_branch().await.unwrap(), "feature/login");
    }

    #[tokio::test]
    async fn test_fetch_branch_refspec() {
        let runner = ScriptedRunner::new(CommandOutput::ok(""));
        let git = Git::new(&runner, "/repo");
        git.fetch_branch("develop").await.unwrap();
        assert_eq!(
            runner.last_call().display(),
            "git fetch -u origin develop:develop"
        );
    }

    #[tokio::test]
    async fn test_has_staged_files() {
        let runner = ScriptedRunner::new(CommandOutput::ok("package.json\n"));
        assert!(Git::new(&runner, "/repo").has_staged_files().await.unwrap());

        let runner = ScriptedRunner::new(CommandOutput::ok("\n"));
        assert!(!Git::new(&runner, "/repo").has_staged_files().await.unwrap());
    }

    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let runner = ScriptedRunner::new(CommandOutput::failed(128, "fatal: bad revision\n"));
        let git = Git::new(&runner, "/repo");
        let err = git.changed_files("nope").await.unwrap_err();
        assert!(err.to_string().contains("fatal: bad revision"));
    }

    #[test]
    fn test_parse_branch_list() {
        let stdout = "  develop\n* feature/x\n  master\n";
        assert_eq!(parse_branch_list(stdout), vec!["develop", "master"]);
    }
}
