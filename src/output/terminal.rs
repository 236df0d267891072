//! Terminal helpers shared by all subcommands
//!
//! - `Logger`: badge-prefixed status lines on stderr
//! - `boxed`: rounded call-to-action frame
//! - `format_duration`: colored elapsed time
//! - `hyperlink`: OSC-8 terminal link

use crate::output::Verbosity;
use colored::Colorize;
use console::measure_text_width;
use std::time::Duration;

/// Horizontal padding inside a box
const BOX_PADDING_X: usize = 3;

/// Status line writer
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    verbosity: Verbosity,
}

impl Logger {
    /// Create a logger for the given verbosity
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Current verbosity
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Returns true in quiet mode
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Neutral information, hidden in quiet mode
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.is_quiet() {
            eprintln!("{} {}", "ℹ".cyan(), message.as_ref());
        }
    }

    /// Completed step, hidden in quiet mode
    pub fn success(&self, message: impl AsRef<str>) {
        if !self.is_quiet() {
            eprintln!("{} {}", "✔".green(), message.as_ref());
        }
    }

    /// Something the user should look at
    pub fn warn(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", "⚠".yellow(), message.as_ref().yellow());
    }

    /// Failure
    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", "✖".red(), message.as_ref());
    }

    /// Diagnostics, only shown with --verbose
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("{} {}", "›".dimmed(), message.as_ref().dimmed());
        }
    }
}

/// Frames `title` and `message` in a rounded yellow box, lines centered
///
/// Widths are measured without ANSI escapes so colored text lines up.
pub fn boxed(title: &str, message: &str) -> String {
    let content = format!("{}\n\n{}", title, message);
    let lines: Vec<&str> = content.lines().collect();
    let text_width = lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0);
    let inner_width = text_width + BOX_PADDING_X * 2;

    let horizontal = "─".repeat(inner_width);
    let blank = format!("{}{}{}", "│".yellow(), " ".repeat(inner_width), "│".yellow());

    let mut out = Vec::with_capacity(lines.len() + 6);
    out.push(String::new());
    out.push(format!("{}", format!("╭{}╮", horizontal).yellow()));
    out.push(blank.clone());
    for line in lines {
        let free = text_width - measure_text_width(line);
        let left = free / 2;
        let right = free - left;
        out.push(format!(
            "{}{}{}{}{}",
            "│".yellow(),
            " ".repeat(BOX_PADDING_X + left),
            line,
            " ".repeat(BOX_PADDING_X + right),
            "│".yellow()
        ));
    }
    out.push(blank);
    out.push(format!("{}", format!("╰{}╯", horizontal).yellow()));
    out.push(String::new());
    out.join("\n")
}

/// Green milliseconds below 3 s, yellow seconds below 10 s, red otherwise
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 3_000 {
        format!("{}ms", millis).green().to_string()
    } else if millis < 10_000 {
        format!("{:.3}s", duration.as_secs_f64()).yellow().to_string()
    } else {
        format!("{:.3}s", duration.as_secs_f64()).red().to_string()
    }
}

/// OSC-8 hyperlink rendered as `title`
pub fn hyperlink(url: &str, title: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    #[test]
    fn test_boxed_lines_have_equal_width() {
        let rendered = boxed(
            &"Fix it locally!".red().to_string(),
            "wsguard sync-overrides --fix\n\nRead more: https://pnpm.io",
        );
        let widths: Vec<usize> = rendered
            .lines()
            .filter(|l| !l.is_empty())
            .map(measure_text_width)
            .collect();
        assert!(widths.len() >= 7);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_boxed_centers_text() {
        let plain = strip_ansi_codes(&boxed("ab", "abcd")).to_string();
        assert!(plain.contains("│    ab    │"));
        assert!(plain.contains("│   abcd   │"));
        assert!(plain.contains("╭──────────╮"));
    }

    #[test]
    fn test_format_duration_thresholds() {
        let plain = |ms| strip_ansi_codes(&format_duration(Duration::from_millis(ms))).to_string();
        assert_eq!(plain(250), "250ms");
        assert_eq!(plain(2_999), "2999ms");
        assert_eq!(plain(3_000), "3.000s");
        assert_eq!(plain(12_345), "12.345s");
    }

    #[test]
    fn test_hyperlink() {
        assert_eq!(
            hyperlink("https://example.com", "guide"),
            "\x1b]8;;https://example.com\x1b\\guide\x1b]8;;\x1b\\"
        );
    }

    #[test]
    fn test_logger_quiet() {
        let logger = Logger::new(Verbosity::Quiet);
        assert!(logger.is_quiet());
        assert_eq!(Logger::default().verbosity(), Verbosity::Normal);
    }
}
