//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Issues with wsguard.toml or the root manifest
//! - ManifestError: Issues with package.json / override file parsing and writing
//! - SyncError: Lock table resolution failures
//! - CommandError: External command failures
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for drift reports, lint failures and generic failures
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for an override file referencing an unsanctioned dependency
pub const EXIT_UNSANCTIONED_OVERRIDE_FILE: u8 = 2;

/// Exit code for a package manifest referencing an unsanctioned dependency
pub const EXIT_UNSANCTIONED_MANIFEST: u8 = 3;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Lock table resolution errors
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// A concurrent scan task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing a report to the terminal failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Command(CommandError::Failed { code: Some(code), .. }) => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(EXIT_FAILURE)
            }
            _ => EXIT_FAILURE,
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error (for wsguard.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// A field of the root manifest has an unexpected shape
    #[error("invalid field '{field}' in {path}: {message}")]
    InvalidField {
        path: PathBuf,
        field: String,
        message: String,
    },

    /// A configured regular expression does not compile
    #[error("invalid pattern '{pattern}' for {key}: {message}")]
    InvalidPattern {
        key: String,
        pattern: String,
        message: String,
    },

    /// A multi-version threshold is not a semantic version
    #[error("invalid threshold '{threshold}' for multi-version dependency '{name}'")]
    InvalidThreshold { name: String, threshold: String },
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// YAML parsing error (for pnpm-workspace.yaml)
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// Invalid workspace glob in pnpm-workspace.yaml
    #[error("invalid workspace pattern '{pattern}': {message}")]
    InvalidWorkspacePattern { pattern: String, message: String },
}

/// Errors raised while resolving a dependency against the lock table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Dependency has no lock table entry
    #[error("dependency '{name}' is not locked in pnpm.overrides")]
    Unsanctioned { name: String },

    /// A multi-version bucket key is missing from pnpm.overrides
    #[error("override '{key}' for multi-version dependency '{name}' is missing")]
    MissingOverride { name: String, key: String },

    /// Declared version cannot be compared against a multi-version threshold
    #[error("cannot resolve '{name}': declared version '{declared}' is not a version number")]
    UnresolvableVersion { name: String, declared: String },
}

/// Errors related to external commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command line was empty
    #[error("empty command")]
    Empty,

    /// Failed to start the process
    #[error("failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited unsuccessfully
    #[error("'{command}' failed with {}: {stderr}", exit_description(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidField error
    pub fn invalid_field(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidField {
            path: path.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidPattern error
    pub fn invalid_pattern(
        key: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidPattern {
            key: key.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SyncError {
    /// Creates a new Unsanctioned error
    pub fn unsanctioned(name: impl Into<String>) -> Self {
        SyncError::Unsanctioned { name: name.into() }
    }
}

impl CommandError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        CommandError::Failed {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
