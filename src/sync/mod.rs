//! Dependency-version synchronization across the workspace
//!
//! Workflow: read manifests → scan both passes concurrently → sort →
//! (no violations and `--fix`) write → stage with git, one file at a time.
//!
//! Nothing is written while any file of either pass has a violation.

mod scan;

pub use scan::{manifest_specifier, scan_override_file, scan_package_manifest, ScanResult};

use crate::config::SyncConfig;
use crate::domain::{SyncReport, VersionLockTable, Violation};
use crate::error::{AppError, ManifestError};
use crate::git::Git;
use crate::manifest::{write_manifest, PackageManifest, WorkspacePackage, PACKAGE_JSON};
use crate::process::CommandRunner;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Builds the lock table from the root manifest's `pnpm.overrides`
pub async fn load_lock_table(
    root: &Path,
    config: &SyncConfig,
) -> Result<VersionLockTable, AppError> {
    let path = root.join(PACKAGE_JSON);
    let manifest = PackageManifest::read(&path).await?;
    let overrides = manifest.pnpm_overrides(&path)?;
    Ok(VersionLockTable::new(overrides, config)?)
}

/// A scanned file and its in-memory, already synchronized manifest
struct ScannedFile {
    path: PathBuf,
    manifest: PackageManifest,
    result: ScanResult,
}

/// Runs both synchronization passes over a workspace
pub struct Synchronizer {
    root: PathBuf,
    table: Arc<VersionLockTable>,
    override_file: String,
    fix: bool,
}

impl Synchronizer {
    /// Create a synchronizer for the workspace at `root`
    pub fn new(
        root: impl Into<PathBuf>,
        table: VersionLockTable,
        override_file: impl Into<String>,
        fix: bool,
    ) -> Self {
        Self {
            root: root.into(),
            table: Arc::new(table),
            override_file: override_file.into(),
            fix,
        }
    }

    /// Scan every package, then persist and stage fixes when allowed
    pub async fn run(
        &self,
        packages: &[WorkspacePackage],
        runner: &dyn CommandRunner,
    ) -> Result<SyncReport, AppError> {
        let manifests = self.read_manifests(packages).await?;
        let members: Arc<BTreeSet<String>> = Arc::new(
            manifests
                .iter()
                .filter_map(|(_, manifest)| manifest.name.clone())
                .collect(),
        );

        let mut scans = self.scan(manifests, packages, members).await?;
        scans.sort_by(|a, b| {
            let key = |s: &ScannedFile| (s.result.drift.pass, s.result.drift.path.clone());
            key(a).cmp(&key(b))
        });

        let mut violations: Vec<Violation> = scans
            .iter()
            .flat_map(|s| s.result.violations.iter().cloned())
            .collect();
        violations.sort_by_key(Violation::sort_key);

        let mut report = SyncReport {
            drifts: scans
                .iter()
                .filter(|s| !s.result.drift.is_empty())
                .map(|s| s.result.drift.clone())
                .collect(),
            violations,
            written: Vec::new(),
        };

        if !self.fix || !report.violations.is_empty() {
            return Ok(report);
        }

        for scan in scans.iter().filter(|s| !s.result.drift.is_empty()) {
            write_manifest(&scan.path, &scan.manifest).await?;
            report.written.push(scan.result.drift.path.clone());
        }

        // git holds an index lock, so files are staged strictly one after another
        let git = Git::new(runner, &self.root);
        for path in &report.written {
            git.add(path).await?;
        }

        Ok(report)
    }

    async fn read_manifests(
        &self,
        packages: &[WorkspacePackage],
    ) -> Result<Vec<(PathBuf, PackageManifest)>, AppError> {
        let mut set = JoinSet::new();
        for package in packages {
            let path = package.manifest_path();
            set.spawn(async move {
                let manifest = PackageManifest::read(&path).await;
                (path, manifest)
            });
        }

        let mut manifests = Vec::with_capacity(packages.len());
        while let Some(joined) = set.join_next().await {
            let (path, manifest) = joined?;
            manifests.push((path, manifest?));
        }
        Ok(manifests)
    }

    async fn scan(
        &self,
        manifests: Vec<(PathBuf, PackageManifest)>,
        packages: &[WorkspacePackage],
        members: Arc<BTreeSet<String>>,
    ) -> Result<Vec<ScannedFile>, AppError> {
        let mut set: JoinSet<Result<Option<ScannedFile>, ManifestError>> = JoinSet::new();

        for (path, mut manifest) in manifests {
            let table = Arc::clone(&self.table);
            let members = Arc::clone(&members);
            let relative = self.relative(&path);
            set.spawn(async move {
                let result = scan_package_manifest(&mut manifest, &relative, &table, &members);
                Ok(Some(ScannedFile {
                    path,
                    manifest,
                    result,
                }))
            });
        }

        for package in packages {
            let table = Arc::clone(&self.table);
            let path = package.dir.join(&self.override_file);
            let relative = self.relative(&path);
            set.spawn(async move {
                let mut manifest = match PackageManifest::read(&path).await {
                    Ok(manifest) => manifest,
                    Err(ManifestError::NotFound { .. }) => return Ok(None),
                    Err(e) => return Err(e),
                };
                let result = scan_override_file(&mut manifest, &relative, &table);
                Ok(Some(ScannedFile {
                    path,
                    manifest,
                    result,
                }))
            });
        }

        let mut scans = Vec::new();
        while let Some(joined) = set.join_next().await {
            if let Some(scan) = joined?? {
                scans.push(scan);
            }
        }
        Ok(scans)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }
}
