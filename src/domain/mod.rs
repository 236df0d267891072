//! Core domain models for wsguard
//!
//! This module contains the fundamental types used throughout the application:
//! - Version specifier parsing and comparison
//! - The version-lock table derived from `pnpm.overrides`
//! - Synchronization results (update records, violations, reports)

mod lock_table;
mod update_record;
mod version_diff;
mod version_spec;

pub use lock_table::VersionLockTable;
pub use update_record::{
    DependencyKind, ManifestDrift, SyncPass, SyncReport, UpdateRecord, Violation,
};
pub use version_diff::{DiffLevel, OperatorChange, VersionDiff};
pub use version_spec::{
    is_local_reference, is_plain_version, is_reference, RangeOperator, VersionSpec,
};
