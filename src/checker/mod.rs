pub mod builtin;
mod external;
mod severity;
mod violation;

pub use external::load_external_checks;
pub use severity::Severity;
pub use violation::{Violation, ViolationCounts};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{ExcludeFilter, LintConfig, RuleConfig};
use crate::error::{LintError, Result};
use crate::repository::Repository;

/// Failure raised while a check is running. Never escapes the linter.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("external check failed: {0}")]
    External(String),

    #[error("{0}")]
    Message(String),
}

impl CheckError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Configuration resolved for one check when it is loaded.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub enabled: bool,
    pub severity: Severity,
    pub options: RuleConfig,
    exclude: ExcludeFilter,
}

impl CheckSettings {
    /// Resolve settings for `rule_id` against `config` and `repository`.
    ///
    /// # Errors
    /// Returns [`LintError::InvalidSeverity`] if the configured severity is not
    /// one of `error`, `warning` or `info`.
    pub fn resolve(
        rule_id: &str,
        default_severity: Severity,
        config: &LintConfig,
        repository: &Repository,
        exclude: &ExcludeFilter,
    ) -> Result<Self> {
        let options = config.rule_config(rule_id).cloned().unwrap_or_default();
        let severity = match options.severity.as_deref() {
            None => default_severity,
            Some(value) => value.parse().map_err(|_| LintError::InvalidSeverity {
                rule_id: rule_id.to_string(),
                value: value.to_string(),
            })?,
        };

        Ok(Self {
            enabled: config.is_rule_enabled(rule_id, repository),
            severity,
            options,
            exclude: exclude.clone(),
        })
    }

    /// Enabled settings with the given severity and no options.
    #[must_use]
    pub fn with_severity(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            options: RuleConfig::default(),
            exclude: ExcludeFilter::empty(),
        }
    }

    /// Whether `path` matches an `exclude` pattern, relative to `root`.
    #[must_use]
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        path.strip_prefix(root)
            .is_ok_and(|relative| self.exclude.is_excluded(relative))
    }
}

/// A single lint rule.
///
/// Checks only read the repository. Every finding is built with
/// [`Check::violation`] so it carries this check's id and configured severity.
pub trait Check {
    fn rule_id(&self) -> &str;

    fn description(&self) -> &str;

    fn default_severity(&self) -> Severity;

    fn settings(&self) -> &CheckSettings;

    /// Inspect `repository` and report findings.
    ///
    /// # Errors
    /// Returns an error if the check cannot complete. The linter logs it and
    /// drops this check's findings for the run.
    fn check(&self, repository: &Repository) -> std::result::Result<Vec<Violation>, CheckError>;

    fn enabled(&self) -> bool {
        self.settings().enabled
    }

    fn severity(&self) -> Severity {
        self.settings().severity
    }

    fn violation(&self, message: String) -> Violation {
        Violation::new(self.rule_id(), self.severity(), message)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
