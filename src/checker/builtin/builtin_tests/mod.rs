use std::path::Path;

use crate::checker::builtin::BuiltinRule;
use crate::checker::{CheckSettings, Violation};
use crate::config::LintConfig;
use crate::repository::Repository;

mod catalog_tests;
mod command_tests;
mod content_tests;

/// Run one rule with its default severity and no options.
fn run(rule: &BuiltinRule, root: &Path) -> Vec<Violation> {
    let repo = Repository::open(root, None).unwrap();
    let check = (rule.build)(CheckSettings::with_severity(rule.default_severity));
    check.check(&repo).unwrap()
}

/// Run one rule with settings resolved from a YAML configuration document.
fn run_configured(rule: &BuiltinRule, root: &Path, yaml: &str) -> Vec<Violation> {
    let config = LintConfig::layered(serde_yaml::from_str(yaml).unwrap());
    let repo = Repository::open(root, Some(&config)).unwrap();
    let settings = CheckSettings::resolve(
        rule.rule_id,
        rule.default_severity,
        &config,
        &repo,
        &config.exclude_filter().unwrap(),
    )
    .unwrap();
    (rule.build)(settings).check(&repo).unwrap()
}

fn messages(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.message.as_str()).collect()
}
