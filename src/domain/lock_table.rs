//! Version-lock table built from `pnpm.overrides`
//!
//! Maps a dependency name to the single version or range every workspace
//! package has to declare. Multi-version rules pick one of two override
//! entries depending on the version the caller currently declares.

use super::VersionSpec;
use crate::config::{MultiVersionRule, SyncConfig};
use crate::error::{ConfigError, SyncError};
use indexmap::IndexMap;
use semver::Version;
use std::collections::BTreeSet;

/// Multi-version rule with a parsed threshold
#[derive(Debug, Clone, PartialEq, Eq)]
struct ThresholdRule {
    threshold: Version,
    below: String,
    at_or_above: String,
}

/// Immutable lock table for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionLockTable {
    overrides: IndexMap<String, String>,
    rules: IndexMap<String, ThresholdRule>,
    exempt: BTreeSet<String>,
}

impl VersionLockTable {
    /// Creates a lock table from override entries and sync settings
    pub fn new(
        overrides: IndexMap<String, String>,
        config: &SyncConfig,
    ) -> Result<Self, ConfigError> {
        let rules = config
            .multi_version
            .iter()
            .map(|rule| Ok((rule.name.clone(), parse_rule(rule)?)))
            .collect::<Result<IndexMap<_, _>, ConfigError>>()?;

        Ok(Self {
            overrides,
            rules,
            exempt: config.exempt.iter().cloned().collect(),
        })
    }

    /// Resolves the locked value for `name`
    ///
    /// `declared` is the currently declared version without its range
    /// operator; it only matters for multi-version dependencies.
    pub fn resolve(&self, name: &str, declared: &str) -> Result<&str, SyncError> {
        if let Some(rule) = self.rules.get(name) {
            let (major, minor, patch) =
                VersionSpec::parse(declared)
                    .numeric()
                    .ok_or_else(|| SyncError::UnresolvableVersion {
                        name: name.to_string(),
                        declared: declared.to_string(),
                    })?;
            let key = if Version::new(major, minor, patch) < rule.threshold {
                &rule.below
            } else {
                &rule.at_or_above
            };
            return self
                .overrides
                .get(key)
                .map(String::as_str)
                .ok_or_else(|| SyncError::MissingOverride {
                    name: name.to_string(),
                    key: key.clone(),
                });
        }

        self.overrides
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SyncError::unsanctioned(name))
    }

    /// Returns true if `name` has a lock entry or a multi-version rule
    pub fn is_sanctioned(&self, name: &str) -> bool {
        self.overrides.contains_key(name) || self.rules.contains_key(name)
    }

    /// Returns true if `name` is excluded from single-version pinning
    pub fn is_exempt(&self, name: &str) -> bool {
        self.exempt.contains(name)
    }

    /// Returns true if `name` is locked per major line
    pub fn is_multi_version(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Names with a lock entry or a multi-version rule
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.overrides
            .keys()
            .chain(self.rules.keys())
            .map(String::as_str)
    }

    /// Number of override entries
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Returns true if there are no override entries
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

fn parse_rule(rule: &MultiVersionRule) -> Result<ThresholdRule, ConfigError> {
    let threshold =
        Version::parse(rule.threshold.trim()).map_err(|_| ConfigError::InvalidThreshold {
            name: rule.name.clone(),
            threshold: rule.threshold.clone(),
        })?;
    Ok(ThresholdRule {
        threshold,
        below: rule.below.clone(),
        at_or_above: rule.at_or_above.clone(),
    })
}
