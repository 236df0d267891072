//! `check-branch`: warn about branch names that do not follow the naming
//! convention
//!
//! Runs from the post-checkout hook, so it never fails the checkout.

use crate::commands::Context;
use crate::config::BranchConfig;
use crate::error::{AppError, ConfigError};
use crate::git::Git;
use crate::output::hyperlink;
use colored::Colorize;
use regex::Regex;

/// Compiled branch naming rules
pub struct BranchRules {
    valid: Regex,
    ignored: Regex,
}

impl BranchRules {
    /// Compile the configured patterns
    pub fn new(config: &BranchConfig) -> Result<Self, ConfigError> {
        let compile = |key: &str, pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| ConfigError::invalid_pattern(key, pattern, e.to_string()))
        };
        Ok(Self {
            valid: compile("branch.valid", &config.valid)?,
            ignored: compile("branch.ignored", &config.ignored)?,
        })
    }

    /// Returns true if the branch is ignored or follows the convention
    pub fn accepts(&self, branch: &str) -> bool {
        self.ignored.is_match(branch) || self.valid.is_match(branch)
    }
}

/// Warning shown for a branch with an invalid name
pub fn warning(guide_url: Option<&str>) -> String {
    let guide = match guide_url {
        Some(url) => hyperlink(url, "the branch naming convention"),
        None => "the branch naming convention".to_string(),
    };
    format!(
        "{}{}{} {}",
        "The current branch name does not follow ".yellow(),
        guide,
        ", it cannot be pushed! Rename it with:".yellow(),
        "git branch -m <new/branch/name>".green()
    )
}

/// Check the current branch
pub async fn run(ctx: &Context) -> Result<u8, AppError> {
    if ctx.is_ci() {
        ctx.logger.debug("CI detected, skipping the branch name check");
        return Ok(0);
    }

    let rules = BranchRules::new(&ctx.config.branch)?;
    let branch = Git::new(ctx.runner.as_ref(), &ctx.root)
        .current_branch()
        .await?;

    if !rules.accepts(&branch) {
        println!("{}", warning(ctx.config.branch.guide_url.as_deref()));
    }
    Ok(0)
}
