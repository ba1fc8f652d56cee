//! Tests for layering a loaded document over the built-in rule table.

use std::path::Path;

use crate::config::{ConfigLoader, EnabledState, FileConfigLoader};

use super::mock_fs::MockFileSystem;

fn load(content: &str) -> crate::config::LintConfig {
    let fs = MockFileSystem::new().with_file("/repo/.claudelint.yaml", content);
    FileConfigLoader::with_fs(fs)
        .load(Path::new("/repo"))
        .unwrap()
        .config
}

#[test]
fn severity_only_override_keeps_default_enabled_state() {
    let config = load("rules:\n  commands-exist:\n    severity: warning\n");

    let rule = &config.rules["commands-exist"];
    assert_eq!(rule.enabled, Some(EnabledState::Off));
    assert_eq!(rule.severity.as_deref(), Some("warning"));
}

#[test]
fn enabled_only_override_keeps_default_severity() {
    let config = load("rules:\n  commands-dir-required:\n    enabled: true\n");

    let rule = &config.rules["commands-dir-required"];
    assert_eq!(rule.enabled, Some(EnabledState::On));
    assert_eq!(rule.severity.as_deref(), Some("warning"));
}

#[test]
fn unmentioned_rules_keep_defaults() {
    let config = load("strict: true\n");

    assert_eq!(
        config.rules["marketplace-registration"].enabled,
        Some(EnabledState::Auto)
    );
    assert_eq!(
        config.rules["plugin-json-required"].severity.as_deref(),
        Some("error")
    );
}

#[test]
fn rule_options_are_layered_in() {
    let config = load("rules:\n  command-sections:\n    sections: [Name, Usage]\n");

    assert_eq!(
        config.rules["command-sections"].string_list("sections"),
        Some(vec!["Name".to_string(), "Usage".to_string()])
    );
    assert_eq!(
        config.rules["command-sections"].enabled,
        Some(EnabledState::On)
    );
}
