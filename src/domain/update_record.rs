//! Results of a synchronization run

use crate::error::{
    SyncError, EXIT_FAILURE, EXIT_UNSANCTIONED_MANIFEST, EXIT_UNSANCTIONED_OVERRIDE_FILE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Dependency section of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Development,
    /// `peerDependencies`
    Peer,
}

impl DependencyKind {
    /// JSON field holding this section
    pub fn field_name(&self) -> &'static str {
        match self {
            DependencyKind::Runtime => "dependencies",
            DependencyKind::Development => "devDependencies",
            DependencyKind::Peer => "peerDependencies",
        }
    }
}

/// Which kind of file a scan looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPass {
    /// Workspace package.json files
    PackageManifest,
    /// Per-package override files of the secondary build target
    OverrideFile,
}

impl SyncPass {
    /// Dependency sections checked by this pass, in processing order
    pub fn sections(&self) -> &'static [DependencyKind] {
        match self {
            SyncPass::PackageManifest => &[
                DependencyKind::Runtime,
                DependencyKind::Peer,
                DependencyKind::Development,
            ],
            SyncPass::OverrideFile => &[DependencyKind::Runtime, DependencyKind::Development],
        }
    }
}

/// A declared specifier that disagrees with the lock table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRecord {
    /// Dependency name
    pub dependency: String,
    /// Section the dependency is declared in
    pub kind: DependencyKind,
    /// Declared specifier
    pub old: String,
    /// Specifier required by the lock table
    pub new: String,
}

impl UpdateRecord {
    /// Creates a new UpdateRecord
    pub fn new(
        dependency: impl Into<String>,
        kind: DependencyKind,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            kind,
            old: old.into(),
            new: new.into(),
        }
    }
}

/// All drifted dependencies of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDrift {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Pass that produced the records
    pub pass: SyncPass,
    /// Drifted dependencies in declaration order
    pub records: Vec<UpdateRecord>,
}

impl ManifestDrift {
    /// Creates an empty drift for a file
    pub fn new(path: impl Into<PathBuf>, pass: SyncPass) -> Self {
        Self {
            path: path.into(),
            pass,
            records: Vec::new(),
        }
    }

    /// Returns true if nothing drifted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Configuration problem that stops a run before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Dependency has no lock entry and is not exempt
    Unsanctioned {
        pass: SyncPass,
        path: PathBuf,
        dependency: String,
    },
    /// Override files may not reference a dependency locked per major line
    MultiVersionInOverrideFile { path: PathBuf, dependency: String },
    /// Lock table could not resolve a sanctioned dependency
    Unresolvable {
        pass: SyncPass,
        path: PathBuf,
        error: SyncError,
    },
}

impl Violation {
    /// Process exit code for this violation
    pub fn exit_code(&self) -> u8 {
        match self {
            Violation::Unsanctioned {
                pass: SyncPass::PackageManifest,
                ..
            } => EXIT_UNSANCTIONED_MANIFEST,
            Violation::Unsanctioned {
                pass: SyncPass::OverrideFile,
                ..
            } => EXIT_UNSANCTIONED_OVERRIDE_FILE,
            Violation::MultiVersionInOverrideFile { .. } | Violation::Unresolvable { .. } => {
                EXIT_FAILURE
            }
        }
    }

    /// File the violation was found in
    pub fn path(&self) -> &PathBuf {
        match self {
            Violation::Unsanctioned { path, .. }
            | Violation::MultiVersionInOverrideFile { path, .. }
            | Violation::Unresolvable { path, .. } => path,
        }
    }

    fn pass(&self) -> SyncPass {
        match self {
            Violation::Unsanctioned { pass, .. } | Violation::Unresolvable { pass, .. } => *pass,
            Violation::MultiVersionInOverrideFile { .. } => SyncPass::OverrideFile,
        }
    }

    /// Ordering key: primary pass first, then by path
    pub fn sort_key(&self) -> (SyncPass, PathBuf) {
        (self.pass(), self.path().clone())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Unsanctioned {
                path, dependency, ..
            } => write!(
                f,
                "{}: {} is not locked in pnpm.overrides of the root package.json",
                path.display(),
                dependency
            ),
            Violation::MultiVersionInOverrideFile { path, dependency } => write!(
                f,
                "{}: {} is used with several versions and cannot be pinned to a single one",
                path.display(),
                dependency
            ),
            Violation::Unresolvable { path, error, .. } => {
                write!(f, "{}: {}", path.display(), error)
            }
        }
    }
}

/// Outcome of a synchronization run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files with drift, sorted by path
    pub drifts: Vec<ManifestDrift>,
    /// Configuration problems, primary pass first
    pub violations: Vec<Violation>,
    /// Files rewritten by auto-fix, relative to the root
    pub written: Vec<PathBuf>,
}

impl SyncReport {
    /// Total number of drifted dependencies
    pub fn total_records(&self) -> usize {
        self.drifts.iter().map(|d| d.records.len()).sum()
    }

    /// Returns true if any file drifted
    pub fn has_drift(&self) -> bool {
        self.drifts.iter().any(|d| !d.is_empty())
    }

    /// Exit code of the first violation, if any
    pub fn violation_exit_code(&self) -> Option<u8> {
        self.violations.first().map(Violation::exit_code)
    }
}
