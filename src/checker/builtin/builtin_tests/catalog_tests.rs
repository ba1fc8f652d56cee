use std::collections::HashSet;

use crate::checker::Severity;
use crate::checker::builtin::{
    BUILTIN_RULES, CommandsDirRequired, Frontmatter, MarketplaceRegistration, PluginJsonRequired,
    KEBAB_CASE, find_rule,
};
use crate::config::EnabledState;

#[test]
fn catalog_has_seventeen_unique_rules() {
    let ids: HashSet<_> = BUILTIN_RULES.iter().map(|rule| rule.rule_id).collect();
    assert_eq!(BUILTIN_RULES.len(), 17);
    assert_eq!(ids.len(), 17);
}

#[test]
fn catalog_order_starts_with_plugin_structure() {
    assert_eq!(BUILTIN_RULES[0].rule_id, PluginJsonRequired::RULE.rule_id);
    assert_eq!(BUILTIN_RULES[16].rule_id, "mcp-prohibited");
}

#[test]
fn default_enabled_states() {
    assert_eq!(CommandsDirRequired::RULE.default_enabled, EnabledState::Off);
    assert_eq!(find_rule("commands-exist").unwrap().default_enabled, EnabledState::Off);
    assert_eq!(MarketplaceRegistration::RULE.default_enabled, EnabledState::Auto);
    assert_eq!(find_rule("plugin-readme").unwrap().default_enabled, EnabledState::On);
}

#[test]
fn default_severities() {
    assert_eq!(find_rule("plugin-json-valid").unwrap().default_severity, Severity::Error);
    assert_eq!(find_rule("plugin-naming").unwrap().default_severity, Severity::Warning);
    assert_eq!(find_rule("commands-exist").unwrap().default_severity, Severity::Info);
}

#[test]
fn find_rule_unknown_id() {
    assert!(find_rule("no-such-rule").is_none());
}

#[test]
fn built_check_reports_its_identity() {
    let rule = find_rule("command-naming").unwrap();
    let check = (rule.build)(crate::checker::CheckSettings::with_severity(Severity::Info));

    assert_eq!(check.rule_id(), "command-naming");
    assert_eq!(check.default_severity(), Severity::Warning);
    assert_eq!(check.severity(), Severity::Info);
    assert!(check.enabled());
}

#[test]
fn kebab_case() {
    for name in ["demo", "my-plugin-2", "a1-2b"] {
        assert!(KEBAB_CASE.is_match(name), "{name}");
    }
    for name in [
        "MyPlugin",
        "my_plugin",
        "-leading",
        "trailing-",
        "double--dash",
        "2fast",
        "",
        "demo\n",
        "my-plugin ",
    ] {
        assert!(!KEBAB_CASE.is_match(name), "{name:?}");
    }
}

#[test]
fn frontmatter_parsing() {
    assert_eq!(Frontmatter::parse("# Title"), Frontmatter::Missing);
    assert_eq!(Frontmatter::parse("---\nname: x\n"), Frontmatter::Malformed);
    assert_eq!(Frontmatter::parse("---name: x\n---\n"), Frontmatter::Malformed);
    assert_eq!(
        Frontmatter::parse("---\nname: x\ndescription: y\n---\nbody"),
        Frontmatter::Present("name: x\ndescription: y")
    );
}
