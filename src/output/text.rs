use std::fmt::Write;

use crate::checker::{Severity, Violation, ViolationCounts};
use crate::error::Result;

use super::OutputFormatter;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// ANSI color codes
mod ansi {
    pub const RED: &str = "\x1b[91m";
    pub const GREEN: &str = "\x1b[92m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const BLUE: &str = "\x1b[94m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
}

/// Human-readable report: findings grouped by severity, then a summary.
pub struct TextFormatter {
    use_colors: bool,
    verbose: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self::with_verbose(mode, false)
    }

    /// `verbose` adds the info group and the info count.
    #[must_use]
    pub fn with_verbose(mode: ColorMode, verbose: bool) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
            verbose,
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                // Respect NO_COLOR environment variable
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    const fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => ansi::RED,
            Severity::Warning => ansi::YELLOW,
            Severity::Info => ansi::BLUE,
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{}{text}{}", ansi::BOLD, ansi::RESET)
        } else {
            text.to_string()
        }
    }

    fn format_group(&self, output: &mut String, title: &str, severity: Severity, violations: &[Violation]) {
        let group: Vec<_> = violations.iter().filter(|v| v.severity == severity).collect();
        if group.is_empty() {
            return;
        }

        let _ = writeln!(output, "\n{}", self.heading(title, Self::severity_color(severity)));
        for violation in group {
            let _ = writeln!(output, "  {violation}");
        }
    }

    fn format_summary(&self, output: &mut String, counts: ViolationCounts) {
        let _ = writeln!(output, "\n{}", self.heading("Summary:", ""));
        let _ = writeln!(
            output,
            "  {}",
            self.paint(&format!("Errors:   {}", counts.errors), ansi::RED)
        );
        let _ = writeln!(
            output,
            "  {}",
            self.paint(&format!("Warnings: {}", counts.warnings), ansi::YELLOW)
        );
        if self.verbose {
            let _ = writeln!(
                output,
                "  {}",
                self.paint(&format!("Info:     {}", counts.info), ansi::BLUE)
            );
        }

        if counts.is_clean() {
            let _ = writeln!(output, "\n{}", self.heading("✓ All checks passed!", ansi::GREEN));
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, violations: &[Violation]) -> Result<String> {
        let mut output = String::new();

        self.format_group(&mut output, "Errors:", Severity::Error, violations);
        self.format_group(&mut output, "Warnings:", Severity::Warning, violations);
        if self.verbose {
            self.format_group(&mut output, "Info:", Severity::Info, violations);
        }
        self.format_summary(&mut output, ViolationCounts::tally(violations));

        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
