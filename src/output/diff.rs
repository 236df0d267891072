//! Highlighting of the changed part of a version specifier
//!
//! `^18.2.0 -> ^18.3.1` renders as `^18.` + `3.1` in cyan: the shared
//! leading segments stay plain and the rest is colored by how far the
//! versions are apart.

use crate::domain::{DiffLevel, OperatorChange, VersionDiff};
use colored::{ColoredString, Colorize};

/// Renders `new` with its changes relative to `old` highlighted
///
/// - changed segments: red (major or below 1.0.0), cyan (minor), green (patch)
/// - leading range operator: yellow when it changed, gray otherwise
pub fn colorize_version_diff(old: &str, new: &str) -> String {
    let diff = VersionDiff::between(old, new);

    let operator = diff.new.operator.as_str();
    let operator = match diff.operator_change {
        OperatorChange::Unchanged => operator.bright_black(),
        _ => operator.yellow(),
    };

    let common = diff.common_segments().join(".");
    let changed = diff.changed_segments().join(".");
    let mid_dot = if !diff.common_segments().is_empty() && !diff.changed_segments().is_empty() {
        "."
    } else {
        ""
    };

    format!(
        "{}{}{}{}",
        operator,
        common,
        mid_dot,
        level_color(diff.level, &changed)
    )
}

fn level_color(level: DiffLevel, text: &str) -> ColoredString {
    match level {
        DiffLevel::MajorOrPrerelease => text.red(),
        DiffLevel::Minor => text.cyan(),
        DiffLevel::Patch | DiffLevel::Unchanged => text.green(),
    }
}
