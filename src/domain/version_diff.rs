//! Classification of the difference between two version specifiers
//!
//! Only used for presentation: the level decides how the new specifier is
//! highlighted, never whether a dependency is out of sync.

use super::{RangeOperator, VersionSpec};
use serde::{Deserialize, Serialize};

/// How far apart two versions are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffLevel {
    /// First segment differs, or the new version is still below 1.0.0
    MajorOrPrerelease,
    /// Second segment differs
    Minor,
    /// A later segment differs
    Patch,
    /// Every segment of the new version matches
    Unchanged,
}

/// How the leading range operator changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorChange {
    /// Same operator on both sides
    Unchanged,
    /// Old had none, new has one (range loosened)
    Added,
    /// Old had one, new has none (range tightened)
    Removed,
    /// Both have an operator but different ones
    Changed,
}

/// Difference between an old and a new specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDiff {
    /// Parsed old specifier
    pub old: VersionSpec,
    /// Parsed new specifier
    pub new: VersionSpec,
    /// Index of the first segment of `new` that differs from `old`
    pub first_difference: Option<usize>,
    /// Level of the value change
    pub level: DiffLevel,
    /// Change of the leading operator
    pub operator_change: OperatorChange,
}

impl VersionDiff {
    /// Compares two specifiers
    pub fn between(old: &str, new: &str) -> Self {
        let old = VersionSpec::parse(old);
        let new = VersionSpec::parse(new);

        let first_difference = new
            .segments
            .iter()
            .enumerate()
            .position(|(i, segment)| old.segments.get(i) != Some(segment));

        let level = match first_difference {
            None => DiffLevel::Unchanged,
            Some(0) => DiffLevel::MajorOrPrerelease,
            Some(_) if new.segments.first().is_some_and(|s| s == "0") => {
                DiffLevel::MajorOrPrerelease
            }
            Some(1) => DiffLevel::Minor,
            Some(_) => DiffLevel::Patch,
        };

        let operator_change = match (old.operator, new.operator) {
            (a, b) if a == b => OperatorChange::Unchanged,
            (RangeOperator::None, _) => OperatorChange::Added,
            (_, RangeOperator::None) => OperatorChange::Removed,
            _ => OperatorChange::Changed,
        };

        Self {
            old,
            new,
            first_difference,
            level,
            operator_change,
        }
    }

    /// Segments of the new version shared with the old one
    pub fn common_segments(&self) -> &[String] {
        let end = self.first_difference.unwrap_or(self.new.segments.len());
        &self.new.segments[..end]
    }

    /// Segments of the new version that changed
    pub fn changed_segments(&self) -> &[String] {
        let start = self.first_difference.unwrap_or(self.new.segments.len());
        &self.new.segments[start..]
    }
}
