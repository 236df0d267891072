//! Terminal output
//!
//! This module provides:
//! - Status logging and framed call-to-action messages
//! - Version diff highlighting
//! - The synchronization report

mod diff;
mod terminal;
mod text;

pub use diff::colorize_version_diff;
pub use terminal::{boxed, format_duration, hyperlink, Logger};
pub use text::{TextFormatter, FIX_COMMAND, OVERRIDES_DOCS};

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings, errors and reports
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Additional diagnostics
    Verbose,
}

impl Verbosity {
    /// Derive the verbosity from CLI flags; quiet wins
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Whether progress indicators may be drawn
    pub fn show_progress(&self) -> bool {
        *self != Verbosity::Quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
    }

    #[test]
    fn test_show_progress() {
        assert!(!Verbosity::Quiet.show_progress());
        assert!(Verbosity::Verbose.show_progress());
    }
}
