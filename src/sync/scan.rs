//! Per-file comparison against the lock table
//!
//! Scanning updates the in-memory manifest with the locked specifiers;
//! whether it is persisted is decided by the caller.

use crate::domain::{
    is_local_reference, is_plain_version, is_reference, ManifestDrift, SyncPass, UpdateRecord,
    VersionLockTable, VersionSpec, Violation,
};
use crate::manifest::PackageManifest;
use std::collections::BTreeSet;
use std::path::Path;

/// Drift and violations found in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub drift: ManifestDrift,
    pub violations: Vec<Violation>,
}

/// Specifier a package manifest has to declare for a locked value
///
/// Plain versions get a caret; ranges, URLs and `workspace:` references
/// are used verbatim.
pub fn manifest_specifier(locked: &str) -> String {
    if is_plain_version(locked) && !is_reference(locked) {
        format!("^{}", locked)
    } else {
        locked.to_string()
    }
}

/// Primary pass over a workspace package.json
///
/// `members` are the names of the workspace's own packages; they are
/// resolved by the package manager and never locked.
pub fn scan_package_manifest(
    manifest: &mut PackageManifest,
    relative: &Path,
    table: &VersionLockTable,
    members: &BTreeSet<String>,
) -> ScanResult {
    let pass = SyncPass::PackageManifest;
    let mut drift = ManifestDrift::new(relative, pass);
    let mut violations = Vec::new();

    for &kind in pass.sections() {
        let Some(deps) = manifest.section(kind) else {
            continue;
        };

        let mut records = Vec::new();
        for (name, declared) in deps {
            if table.is_exempt(name) || is_local_reference(declared) || members.contains(name) {
                continue;
            }
            if !table.is_sanctioned(name) {
                violations.push(Violation::Unsanctioned {
                    pass,
                    path: relative.to_path_buf(),
                    dependency: name.clone(),
                });
                continue;
            }

            match table.resolve(name, &VersionSpec::parse(declared).stripped()) {
                Ok(locked) => {
                    let new = manifest_specifier(locked);
                    if *declared != new {
                        records.push(UpdateRecord::new(name, kind, declared, new));
                    }
                }
                Err(error) => violations.push(Violation::Unresolvable {
                    pass,
                    path: relative.to_path_buf(),
                    error,
                }),
            }
        }

        for record in &records {
            manifest.set_version(kind, &record.dependency, &record.new);
        }
        drift.records.extend(records);
    }

    ScanResult { drift, violations }
}

/// Secondary pass over a per-package override file
///
/// Override files pin exact locked values and may not reference
/// dependencies that are locked per major line.
pub fn scan_override_file(
    manifest: &mut PackageManifest,
    relative: &Path,
    table: &VersionLockTable,
) -> ScanResult {
    let pass = SyncPass::OverrideFile;
    let mut drift = ManifestDrift::new(relative, pass);
    let mut violations = Vec::new();

    for &kind in pass.sections() {
        let Some(deps) = manifest.section(kind) else {
            continue;
        };

        let mut records = Vec::new();
        for (name, declared) in deps {
            if table.is_multi_version(name) {
                violations.push(Violation::MultiVersionInOverrideFile {
                    path: relative.to_path_buf(),
                    dependency: name.clone(),
                });
                continue;
            }
            if table.is_exempt(name) {
                continue;
            }
            if !table.is_sanctioned(name) {
                violations.push(Violation::Unsanctioned {
                    pass,
                    path: relative.to_path_buf(),
                    dependency: name.clone(),
                });
                continue;
            }

            match table.resolve(name, &VersionSpec::parse(declared).stripped()) {
                Ok(locked) if declared != locked => {
                    records.push(UpdateRecord::new(name, kind, declared, locked));
                }
                Ok(_) => {}
                Err(error) => violations.push(Violation::Unresolvable {
                    pass,
                    path: relative.to_path_buf(),
                    error,
                }),
            }
        }

        for record in &records {
            manifest.set_version(kind, &record.dependency, &record.new);
        }
        drift.records.extend(records);
    }

    ScanResult { drift, violations }
}
