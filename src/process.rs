//! External command execution
//!
//! This module provides:
//! - A command description (`CommandSpec`) with capture/inherit/tee output modes
//! - The `CommandRunner` trait so callers can be tested with a mock
//! - `SystemRunner`, which spawns real processes with tokio
//!
//! A non-zero exit status is not an error here; callers inspect
//! `CommandOutput` or convert it with `CommandOutput::check`.

use crate::error::CommandError;
use async_trait::async_trait;
use colored::Colorize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// How the output streams of a command are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Collect stdout and stderr
    #[default]
    Capture,
    /// Forward both streams to the terminal
    Inherit,
    /// Forward stdout to the terminal and also collect it; stderr is inherited
    Tee,
}

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory (inherits the current one when unset)
    pub cwd: Option<PathBuf>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
    /// Output handling
    pub mode: OutputMode,
    /// Print `$ <command line>` before running
    pub echo: bool,
}

impl CommandSpec {
    /// Create a command for a program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Split a whitespace-separated command line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let program = parts.next().ok_or(CommandError::Empty)?;
        Ok(Self::new(program).args(parts))
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the output mode
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Echo the command line before running
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The command line as typed by a user
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Collected stdout (empty when inherited)
    pub stdout: String,
    /// Collected stderr (empty when inherited)
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero exit into `CommandError::Failed`
    pub fn check(self, spec: &CommandSpec) -> Result<Self, CommandError> {
        if self.success() {
            Ok(self)
        } else {
            Err(CommandError::failed(
                spec.display(),
                self.code,
                self.stderr.trim(),
            ))
        }
    }
}

/// Trait for running external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;

    /// Run a command and fail on a non-zero exit
    async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.run(spec).await?.check(spec)
    }
}

/// Runner that executes real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }

    fn build(&self, spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(ref cwd) = spec.cwd {
            command.current_dir(cwd);
        }
        if spec.mode != OutputMode::Capture {
            // Children writing to a pipe or our terminal keep their colors
            command.env("FORCE_COLOR", "true");
        }
        command.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        command
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        if spec.echo {
            println!("{}", format!("$ {}", spec.display()).dimmed());
        }

        let spawn_error = |e: std::io::Error| CommandError::spawn(spec.display(), e);
        let mut command = self.build(spec);

        match spec.mode {
            OutputMode::Capture => {
                let output = command
                    .stdin(Stdio::null())
                    .output()
                    .await
                    .map_err(spawn_error)?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            OutputMode::Inherit => {
                let status = command.status().await.map_err(spawn_error)?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..CommandOutput::default()
                })
            }
            OutputMode::Tee => {
                let mut child = command
                    .stdout(Stdio::piped())
                    .spawn()
                    .map_err(spawn_error)?;

                let mut captured = String::new();
                if let Some(stdout) = child.stdout.take() {
                    let mut lines = BufReader::new(stdout).lines();
                    while let Some(line) = lines.next_line().await.map_err(spawn_error)? {
                        println!("{}", line);
                        captured.push_str(&line);
                        captured.push('\n');
                    }
                }

                let status = child.wait().await.map_err(spawn_error)?;
                Ok(CommandOutput {
                    code: status.code(),
                    stdout: captured,
                    stderr: String::new(),
                })
            }
        }
    }
}
