//! Loads the active checks for a repository and runs them in order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::checker::builtin::BUILTIN_RULES;
use crate::checker::{Check, CheckSettings, Violation, ViolationCounts, load_external_checks};
use crate::config::LintConfig;
use crate::error::Result;
use crate::output::{ColorMode, OutputFormatter, TextFormatter};
use crate::repository::Repository;

pub struct Linter {
    repository: Repository,
    config: LintConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Linter {
    /// Build the active check list: enabled built-ins in catalog order, then
    /// the enabled checks of every configured external unit.
    ///
    /// # Errors
    /// Returns an error if a configured severity or exclude pattern is invalid,
    /// or if an external unit is missing or cannot be loaded.
    pub fn new(repository: Repository, config: LintConfig) -> Result<Self> {
        let exclude = config.exclude_filter()?;
        let mut checks: Vec<Box<dyn Check>> = Vec::new();

        for rule in BUILTIN_RULES {
            if !config.is_rule_enabled(rule.rule_id, &repository) {
                tracing::debug!(rule = rule.rule_id, "rule disabled");
                continue;
            }
            let settings = CheckSettings::resolve(
                rule.rule_id,
                rule.default_severity,
                &config,
                &repository,
                &exclude,
            )?;
            checks.push((rule.build)(settings));
        }

        for unit in &config.custom_rules {
            checks.extend(load_external_checks(
                Path::new(unit),
                &config,
                &repository,
                &exclude,
            )?);
        }

        tracing::debug!(checks = checks.len(), "checks loaded");
        Ok(Self {
            repository,
            config,
            checks,
        })
    }

    /// Append a check after the loaded ones. A check whose settings disable
    /// it is dropped, same as during loading.
    #[must_use]
    pub fn with_check(mut self, check: Box<dyn Check>) -> Self {
        if check.enabled() {
            self.checks.push(check);
        } else {
            tracing::debug!(rule = check.rule_id(), "rule disabled");
        }
        self
    }

    #[must_use]
    pub const fn repository(&self) -> &Repository {
        &self.repository
    }

    #[must_use]
    pub const fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Identifiers of the active checks, in run order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|check| check.rule_id())
    }

    /// Run every active check. A check that fails or panics is logged and
    /// contributes nothing; the rest still run.
    #[must_use]
    pub fn run(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for check in &self.checks {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.check(&self.repository)));
            match outcome {
                Ok(Ok(found)) => {
                    tracing::debug!(rule = check.rule_id(), findings = found.len(), "check finished");
                    violations.extend(found);
                }
                Ok(Err(e)) => {
                    tracing::error!(rule = check.rule_id(), "check failed: {e}");
                }
                Err(payload) => {
                    tracing::error!(
                        rule = check.rule_id(),
                        "check panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        violations
    }

    #[must_use]
    pub fn get_counts(violations: &[Violation]) -> ViolationCounts {
        ViolationCounts::tally(violations)
    }

    /// Whether these violations fail the run under the configured strictness.
    #[must_use]
    pub fn is_failure(&self, violations: &[Violation]) -> bool {
        Self::get_counts(violations).is_failure(self.config.strict)
    }

    /// Plain-text report of `violations`, with info findings when `verbose`.
    ///
    /// # Errors
    /// Returns an error if formatting fails.
    pub fn format_results(violations: &[Violation], verbose: bool) -> Result<String> {
        TextFormatter::with_verbose(ColorMode::Never, verbose).format(violations)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
#[path = "linter_tests.rs"]
mod tests;
