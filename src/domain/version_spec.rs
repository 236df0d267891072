//! Version specifier parsing for package.json dependency values
//!
//! A specifier is split into a leading range operator and its dotted
//! segments:
//! - `^1.2.3` → Caret, ["1", "2", "3"]
//! - `~0.4` → Tilde, ["0", "4"]
//! - `1.2.3-beta.1` → None, ["1", "2", "3-beta", "1"]
//!
//! Parsing never fails; anything that is not a version simply yields
//! segments that will not compare equal to a real version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of workspace-local references (`workspace:*`, `workspace:^`)
pub const WORKSPACE_PREFIX: &str = "workspace:";

/// Leading range operator of a version specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeOperator {
    /// Bare version (e.g., `1.2.3`)
    #[default]
    None,
    /// Caret range (e.g., `^1.2.3`) - compatible with major version
    Caret,
    /// Tilde range (e.g., `~1.2.3`) - compatible with minor version
    Tilde,
}

impl RangeOperator {
    /// Returns the operator as it appears in a specifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOperator::None => "",
            RangeOperator::Caret => "^",
            RangeOperator::Tilde => "~",
        }
    }
}

/// A parsed version specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The raw specifier as it appears in the manifest
    pub raw: String,
    /// Leading range operator
    pub operator: RangeOperator,
    /// Dot-separated segments after the operator
    pub segments: Vec<String>,
}

impl VersionSpec {
    /// Parses a specifier into operator and segments
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (operator, rest) = if let Some(rest) = trimmed.strip_prefix('^') {
            (RangeOperator::Caret, rest)
        } else if let Some(rest) = trimmed.strip_prefix('~') {
            (RangeOperator::Tilde, rest)
        } else {
            (RangeOperator::None, trimmed)
        };

        let segments = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('.').map(str::to_string).collect()
        };

        Self {
            raw: raw.to_string(),
            operator,
            segments,
        }
    }

    /// Returns the specifier without its leading operator
    pub fn stripped(&self) -> String {
        self.segments.join(".")
    }

    /// Returns `(major, minor, patch)` when the specifier starts with a number
    ///
    /// Missing or non-numeric trailing segments count as 0, and prerelease
    /// tails (`3-beta`) are cut at the dash.
    pub fn numeric(&self) -> Option<(u64, u64, u64)> {
        let number = |segment: Option<&String>| -> Option<u64> {
            let segment = segment?;
            let head = segment.split(['-', '+']).next().unwrap_or_default();
            head.parse().ok()
        };

        let major = number(self.segments.first())?;
        let minor = number(self.segments.get(1)).unwrap_or(0);
        let patch = number(self.segments.get(2)).unwrap_or(0);
        Some((major, minor, patch))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Returns true for values that are used verbatim instead of as a version:
/// URLs and workspace-local references
pub fn is_reference(value: &str) -> bool {
    value.starts_with("http") || value.starts_with(WORKSPACE_PREFIX)
}

/// Returns true for a single concrete version such as `18.2.0` or
/// `1.0.0-beta.2`: a dotted numeric core with an optional prerelease or
/// build tail
///
/// Ranges (`>=1`, `<2`, `1.x`, `*`, `1 || 2`) and tagged values are not.
pub fn is_plain_version(value: &str) -> bool {
    let core = value.split(['-', '+']).next().unwrap_or_default();
    !core.is_empty()
        && core
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        && !value.chars().any(|c| c.is_whitespace() || "<>=|".contains(c))
}

/// Returns true for specifiers that point inside the repository
pub fn is_local_reference(value: &str) -> bool {
    value.starts_with(WORKSPACE_PREFIX) || value.starts_with("link:") || value.starts_with("file:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_caret() {
        let spec = VersionSpec::parse("^1.2.3");
        assert_eq!(spec.operator, RangeOperator::Caret);
        assert_eq!(spec.segments, vec!["1", "2", "3"]);
        assert_eq!(spec.stripped(), "1.2.3");
    }

    #[test]
    fn test_parse_tilde_partial() {
        let spec = VersionSpec::parse("~0.4");
        assert_eq!(spec.operator, RangeOperator::Tilde);
        assert_eq!(spec.segments, vec!["0", "4"]);
        assert_eq!(spec.numeric(), Some((0, 4, 0)));
    }

    #[test]
    fn test_parse_bare() {
        let spec = VersionSpec::parse("1.2.3");
        assert_eq!(spec.operator, RangeOperator::None);
        assert_eq!(spec.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_prerelease_numeric() {
        let spec = VersionSpec::parse("^14.0.0-canary.1");
        assert_eq!(spec.segments, vec!["14", "0", "0-canary", "1"]);
        assert_eq!(spec.numeric(), Some((14, 0, 0)));
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        let spec = VersionSpec::parse("");
        assert!(spec.segments.is_empty());
        assert_eq!(spec.numeric(), None);

        let spec = VersionSpec::parse("latest");
        assert_eq!(spec.segments, vec!["latest"]);
        assert_eq!(spec.numeric(), None);
    }

    #[test]
    fn test_operator_as_str() {
        assert_eq!(RangeOperator::Caret.as_str(), "^");
        assert_eq!(RangeOperator::Tilde.as_str(), "~");
        assert_eq!(RangeOperator::None.as_str(), "");
    }

    #[test]
    fn test_is_reference() {
        assert!(is_reference("https://registry.example.com/pkg.tgz"));
        assert!(is_reference("workspace:*"));
        assert!(!is_reference("1.2.3"));
        assert!(!is_reference("link:../foo"));
    }

    #[test]
    fn test_is_local_reference() {
        assert!(is_local_reference("workspace:^"));
        assert!(is_local_reference("link:../foo"));
        assert!(is_local_reference("file:../foo.tgz"));
        assert!(!is_local_reference("^1.0.0"));
    }

    #[test]
    fn test_is_plain_version() {
        assert!(is_plain_version("18.2.0"));
        assert!(is_plain_version("4"));
        assert!(is_plain_version("1.0.0-beta.2"));
        assert!(is_plain_version("1.0.0+build.5"));
        assert!(!is_plain_version("^1.0.0"));
        assert!(!is_plain_version(">=1.0.0"));
        assert!(!is_plain_version("<2"));
        assert!(!is_plain_version("1.x"));
        assert!(!is_plain_version("*"));
        assert!(!is_plain_version("1 || 2"));
        assert!(!is_plain_version("1.2.3 - 2.0.0"));
        assert!(!is_plain_version("latest"));
        assert!(!is_plain_version(""));
    }
}
