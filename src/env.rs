//! Process environment snapshot and CI detection
//!
//! Commands read environment variables through `Env` so tests can supply
//! their own values instead of mutating the process environment.

use std::collections::BTreeMap;

/// Known CI environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiEnvironment {
    GitHubActions,
    GitLabCi,
    Jenkins,
    CircleCi,
    TravisCi,
    AzureDevOps,
    Bitbucket,
    /// `BUILD_ENV=CI` or a plain `CI` variable
    Generic,
}

/// Snapshot of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Add or replace a variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Value of a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of a variable, `None` when unset or empty
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Returns true if the variable is set, even to an empty value
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Detect the CI environment
    pub fn ci(&self) -> Option<CiEnvironment> {
        if self.contains("GITHUB_ACTIONS") {
            Some(CiEnvironment::GitHubActions)
        } else if self.contains("GITLAB_CI") {
            Some(CiEnvironment::GitLabCi)
        } else if self.contains("JENKINS_URL") {
            Some(CiEnvironment::Jenkins)
        } else if self.contains("CIRCLECI") {
            Some(CiEnvironment::CircleCi)
        } else if self.contains("TRAVIS") {
            Some(CiEnvironment::TravisCi)
        } else if self.contains("TF_BUILD") {
            Some(CiEnvironment::AzureDevOps)
        } else if self.contains("BITBUCKET_PIPELINE_UUID") {
            Some(CiEnvironment::Bitbucket)
        } else if self.get("BUILD_ENV") == Some("CI")
            || self.non_empty("CI").is_some_and(|v| v != "false")
        {
            Some(CiEnvironment::Generic)
        } else {
            None
        }
    }

    /// Check if running in any CI environment
    pub fn is_ci(&self) -> bool {
        self.ci().is_some()
    }
}
