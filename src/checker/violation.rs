use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Severity;

/// A single finding produced by a check.
///
/// Only constructed through [`Check::violation`](super::Check::violation) so the rule id
/// and severity always match the check that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Violation {
    pub(crate) fn new(rule_id: &str, severity: Severity, message: String) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message,
            file_path: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at(mut self, path: impl AsRef<Path>) -> Self {
        self.file_path = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub const fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The same finding with its path shown relative to `root` when it lies inside it.
    #[must_use]
    pub fn relative_to(mut self, root: &Path) -> Self {
        let relative = self
            .file_path
            .as_deref()
            .and_then(|path| path.strip_prefix(root).ok())
            .map(|relative| {
                if relative.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    relative.to_path_buf()
                }
            });
        if relative.is_some() {
            self.file_path = relative;
        }
        self
    }

    /// `[path]` or `[path:line]`, empty when no location is attached.
    #[must_use]
    pub fn location(&self) -> String {
        match (&self.file_path, self.line) {
            (Some(path), Some(line)) => format!(" [{}:{line}]", path.display()),
            (Some(path), None) => format!(" [{}]", path.display()),
            (None, _) => String::new(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}: {}",
            self.severity.icon(),
            self.severity.label(),
            self.location(),
            self.message
        )
    }
}

/// Per-severity tally of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViolationCounts {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl ViolationCounts {
    #[must_use]
    pub fn tally(violations: &[Violation]) -> Self {
        violations
            .iter()
            .fold(Self::default(), |mut counts, v| {
                match v.severity {
                    Severity::Error => counts.errors += 1,
                    Severity::Warning => counts.warnings += 1,
                    Severity::Info => counts.info += 1,
                }
                counts
            })
    }

    /// Zero errors and zero warnings. Info findings do not spoil a clean run.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    /// Whether the run should fail: any error, or any warning under strict mode.
    #[must_use]
    pub const fn is_failure(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }
}

#[cfg(test)]
#[path = "violation_tests.rs"]
mod tests;
