//! Human-readable synchronization report
//!
//! This module provides:
//! - The drift listing (`path` underlined, one line per dependency)
//! - The call-to-action box pointing at the auto-fix command
//! - Violation and fixed-file summaries

use crate::domain::{SyncReport, Violation};
use crate::output::{boxed, colorize_version_diff, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Auto-fix command suggested in the drift report
pub const FIX_COMMAND: &str = "wsguard sync-overrides --fix";

/// Documentation of the override mechanism
pub const OVERRIDES_DOCS: &str = "https://pnpm.io/package_json#pnpmoverrides";

/// Text formatter for synchronization results
pub struct TextFormatter {
    verbosity: Verbosity,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Writes every drifted dependency grouped by file
    pub fn format_drift(&self, report: &SyncReport, writer: &mut dyn Write) -> std::io::Result<()> {
        for drift in report.drifts.iter().filter(|d| !d.is_empty()) {
            writeln!(writer)?;
            writeln!(writer, "{}", drift.path.display().to_string().underline())?;
            for record in &drift.records {
                let old = format!("{} ->", record.old).dimmed();
                let new = colorize_version_diff(&record.old, &record.new);
                if self.verbosity == Verbosity::Verbose {
                    writeln!(
                        writer,
                        "  {}: {} {} {}",
                        record.dependency,
                        old,
                        new,
                        format!("({})", record.kind.field_name()).dimmed()
                    )?;
                } else {
                    writeln!(writer, "  {}: {} {}", record.dependency, old, new)?;
                }
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Writes the box telling the user how to fix the drift
    pub fn format_fix_hint(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        let title = "Run the auto-fix command below locally!".red().to_string();
        let message = format!(
            "{}\n\nRead more: {}",
            FIX_COMMAND.magenta(),
            OVERRIDES_DOCS.green()
        );
        writeln!(writer, "{}", boxed(&title, &message))
    }

    /// Writes one line per violation
    pub fn format_violations(
        &self,
        violations: &[Violation],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for violation in violations {
            writeln!(writer, "  {} {}", "✖".red(), violation)?;
        }
        Ok(())
    }

    /// Writes the list of files rewritten by auto-fix
    pub fn format_fixed(&self, report: &SyncReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }
        for path in &report.written {
            writeln!(writer, "  {} {}", "✔".green(), path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKind, ManifestDrift, SyncPass, UpdateRecord};
    use console::strip_ansi_codes;
    use std::path::PathBuf;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        strip_ansi_codes(&String::from_utf8(buf).unwrap()).to_string()
    }

    fn sample_report() -> SyncReport {
        let mut drift = ManifestDrift::new("packages/a/package.json", SyncPass::PackageManifest);
        drift.records.push(UpdateRecord::new(
            "react",
            DependencyKind::Runtime,
            "^17.0.2",
            "^18.2.0",
        ));
        drift.records.push(UpdateRecord::new(
            "typescript",
            DependencyKind::Development,
            "~5.0.0",
            "^5.4.2",
        ));
        SyncReport {
            drifts: vec![
                drift,
                ManifestDrift::new("packages/b/package.json", SyncPass::PackageManifest),
            ],
            ..SyncReport::default()
        }
    }

    #[test]
    fn test_format_drift() {
        let formatter = TextFormatter::new(Verbosity::Normal);
        let output = render(|w| formatter.format_drift(&sample_report(), w));

        assert!(output.contains("packages/a/package.json"));
        assert!(output.contains("  react: ^17.0.2 -> ^18.2.0"));
        assert!(output.contains("  typescript: ~5.0.0 -> ^5.4.2"));
        // Files without drift are not listed
        assert!(!output.contains("packages/b"));
    }

    #[test]
    fn test_format_drift_verbose_shows_section() {
        let formatter = TextFormatter::new(Verbosity::Verbose);
        let output = render(|w| formatter.format_drift(&sample_report(), w));
        assert!(output.contains("(devDependencies)"));
    }

    #[test]
    fn test_format_fix_hint() {
        let formatter = TextFormatter::new(Verbosity::Normal);
        let output = render(|w| formatter.format_fix_hint(w));
        assert!(output.contains(FIX_COMMAND));
        assert!(output.contains(OVERRIDES_DOCS));
        assert!(output.contains('╭'));
    }

    #[test]
    fn test_format_violations() {
        let formatter = TextFormatter::new(Verbosity::Normal);
        let violations = vec![Violation::Unsanctioned {
            pass: SyncPass::OverrideFile,
            path: PathBuf::from("packages/a/web-module.json"),
            dependency: "left-pad".to_string(),
        }];
        let output = render(|w| formatter.format_violations(&violations, w));
        assert!(output.contains("packages/a/web-module.json: left-pad"));
    }

    #[test]
    fn test_format_fixed_quiet() {
        let report = SyncReport {
            written: vec![PathBuf::from("packages/a/package.json")],
            ..SyncReport::default()
        };
        let output = render(|w| TextFormatter::new(Verbosity::Normal).format_fixed(&report, w));
        assert!(output.contains("packages/a/package.json"));

        let output = render(|w| TextFormatter::new(Verbosity::Quiet).format_fixed(&report, w));
        assert!(output.is_empty());
    }
}
