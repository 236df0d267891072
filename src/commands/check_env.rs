//! `check-env`: verify node and package-manager versions before install

use crate::commands::Context;
use crate::error::{AppError, IoError, EXIT_FAILURE};
use crate::manifest::{PackageManifest, PACKAGE_JSON};
use crate::process::CommandSpec;
use colored::Colorize;
use std::fmt;

/// Node version pin at the workspace root
pub const NVMRC: &str = ".nvmrc";

const FROZEN_LOCKFILE_DOCS: &str = "https://pnpm.io/cli/install#--frozen-lockfile";

/// Versions found on this machine and required by the workspace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toolchain {
    /// Running node version (`v20.11.1`)
    pub node: Option<String>,
    /// Required node version from .nvmrc
    pub required_node: Option<String>,
    /// Package manager that invoked us (`pnpm`), `unknown` when not run by one
    pub package_manager: String,
    /// Version of that package manager
    pub package_manager_version: String,
    /// Required pnpm version from `packageManager`
    pub required_pnpm: Option<String>,
}

/// First requirement the environment does not meet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Node { current: String, required: String },
    PackageManager { current: String },
    PnpmVersion { current: String, required: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Node { current, required } => write!(
                f,
                "node {} does not match the version {} required by .nvmrc, switch node to {}",
                current.green(),
                required.green(),
                required.green()
            ),
            Mismatch::PackageManager { current } => write!(
                f,
                "dependencies are being installed with {}, use {} instead",
                current.green(),
                "pnpm".green()
            ),
            Mismatch::PnpmVersion { current, required } => write!(
                f,
                "pnpm {} does not match the required version {}, run `corepack enable` to switch to {}",
                current.green(),
                required.green(),
                required.green()
            ),
        }
    }
}

/// Adds the `v` prefix `node --version` prints
fn normalize_node(version: &str) -> String {
    let version = version.trim();
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}

/// Splits `pnpm/9.1.0 npm/? node/v20.11.1 linux x64` into name and version
pub fn parse_user_agent(agent: Option<&str>) -> (String, String) {
    let spec = agent
        .and_then(|a| a.split_whitespace().next())
        .unwrap_or_default();
    match spec.rsplit_once('/') {
        Some((name, version)) if !name.is_empty() => (name.to_string(), version.to_string()),
        _ => ("unknown".to_string(), String::new()),
    }
}

impl Toolchain {
    /// Checks node, package manager and pnpm version, in that order
    pub fn check(&self) -> Result<(), Mismatch> {
        if let (Some(current), Some(required)) = (&self.node, &self.required_node) {
            if normalize_node(current) != normalize_node(required) {
                return Err(Mismatch::Node {
                    current: normalize_node(current),
                    required: normalize_node(required),
                });
            }
        }

        if self.package_manager != "pnpm" {
            return Err(Mismatch::PackageManager {
                current: self.package_manager.clone(),
            });
        }

        if let Some(required) = &self.required_pnpm {
            if &self.package_manager_version != required {
                return Err(Mismatch::PnpmVersion {
                    current: self.package_manager_version.clone(),
                    required: required.clone(),
                });
            }
        }

        Ok(())
    }

    fn current(&self) -> String {
        format!(
            "node {}, {}@{}",
            self.node.as_deref().unwrap_or("?"),
            self.package_manager,
            self.package_manager_version
        )
    }

    fn required(&self) -> String {
        format!(
            "node {}, pnpm@{}",
            self.required_node
                .as_deref()
                .map(normalize_node)
                .unwrap_or_else(|| "?".to_string()),
            self.required_pnpm.as_deref().unwrap_or("?")
        )
    }
}

/// Collect the toolchain versions of this machine and workspace
pub async fn detect(ctx: &Context) -> Result<Toolchain, AppError> {
    let nvmrc = ctx.root.join(NVMRC);
    let required_node = match tokio::fs::read_to_string(&nvmrc).await {
        Ok(content) => Some(content.trim().to_string()).filter(|v| !v.is_empty()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            ctx.logger.debug("no .nvmrc found, skipping the node version check");
            None
        }
        Err(e) => return Err(IoError::generic(nvmrc, e).into()),
    };

    let node = if required_node.is_some() {
        let spec = CommandSpec::new("node").arg("--version").cwd(&ctx.root);
        let output = ctx.runner.run_checked(&spec).await?;
        Some(output.stdout.trim().to_string())
    } else {
        None
    };

    let (package_manager, package_manager_version) =
        parse_user_agent(ctx.env.get("npm_config_user_agent"));

    let root_manifest = PackageManifest::read(&ctx.root.join(PACKAGE_JSON)).await?;
    let required_pnpm = root_manifest.package_manager_version().map(String::from);

    Ok(Toolchain {
        node,
        required_node,
        package_manager,
        package_manager_version,
        required_pnpm,
    })
}

/// Run the environment check
pub async fn run(ctx: &Context) -> Result<u8, AppError> {
    if ctx.is_ci() {
        println!(
            "{}",
            "CI installs run pnpm with --frozen-lockfile to verify the lockfile matches local installs"
                .yellow()
        );
        println!("Read more: {}", FROZEN_LOCKFILE_DOCS.green());
    }

    let toolchain = detect(ctx).await?;
    match toolchain.check() {
        Ok(()) => {
            ctx.logger.success(format!(
                "Environment OK: {}",
                toolchain.current().dimmed()
            ));
            Ok(0)
        }
        Err(mismatch) => {
            ctx.logger.error(mismatch.to_string());
            ctx.logger
                .warn(format!("Current environment: {}", toolchain.current()));
            ctx.logger
                .warn(format!("Required environment: {}", toolchain.required()));
            ctx.logger
                .warn("Set up the development environment as described in the project docs!");
            Ok(EXIT_FAILURE)
        }
    }
}
