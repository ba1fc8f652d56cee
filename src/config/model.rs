use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::checker::builtin::BUILTIN_RULES;
use crate::error::Result;
use crate::repository::{Repository, RepositoryKind};

use super::ExcludeFilter;

/// Plugin container directories scanned in marketplace repositories.
pub const DEFAULT_PLUGIN_DIRECTORIES: &[&str] = &["plugins", ".claude/plugins", ".claude-plugin/plugins"];

/// Whether a rule runs. `Auto` runs only in marketplace repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnabledState {
    On,
    Off,
    Auto,
}

impl EnabledState {
    #[must_use]
    pub fn resolve(self, kind: RepositoryKind) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Auto => kind == RepositoryKind::Marketplace,
        }
    }
}

impl fmt::Display for EnabledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("true"),
            Self::Off => f.write_str("false"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl Serialize for EnabledState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::On => serializer.serialize_bool(true),
            Self::Off => serializer.serialize_bool(false),
            Self::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for EnabledState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(Self::On),
            Raw::Flag(false) => Ok(Self::Off),
            Raw::Text(text) => match text.as_str() {
                "auto" => Ok(Self::Auto),
                "true" => Ok(Self::On),
                "false" => Ok(Self::Off),
                other => Err(de::Error::custom(format!(
                    "invalid enabled value '{other}' (expected true, false or auto)"
                ))),
            },
        }
    }
}

/// Per-rule settings from the `rules` table.
///
/// Any keys besides `enabled` and `severity` are rule-specific options
/// (e.g. `allowlist` for `mcp-prohibited`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<EnabledState>,

    /// Kept as text so an invalid value can be reported against its rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(flatten)]
    pub options: IndexMap<String, serde_yaml::Value>,
}

impl RuleConfig {
    #[must_use]
    pub fn new(enabled: EnabledState, severity: &str) -> Self {
        Self {
            enabled: Some(enabled),
            severity: Some(severity.to_string()),
            options: IndexMap::new(),
        }
    }

    /// Layer `other` on top of `self`, field by field.
    fn overlay(&mut self, other: Self) {
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.severity.is_some() {
            self.severity = other.severity;
        }
        self.options.extend(other.options);
    }

    /// A list-of-strings option, e.g. `sections` or `allowlist`.
    #[must_use]
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let seq = self.options.get(key)?.as_sequence()?;
        Some(
            seq.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
        )
    }
}

/// Linter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LintConfig {
    #[serde(default)]
    pub rules: IndexMap<String, RuleConfig>,

    /// Paths to external check units, relative to the repository root unless absolute.
    #[serde(default)]
    pub custom_rules: Vec<String>,

    /// Glob patterns for files the checks should skip.
    #[serde(default, rename = "exclude")]
    pub exclude_patterns: Vec<String>,

    /// Treat warnings as failures.
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_plugin_directories")]
    pub plugin_directories: Vec<String>,
}

fn default_plugin_directories() -> Vec<String> {
    DEFAULT_PLUGIN_DIRECTORIES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for LintConfig {
    /// Every built-in rule with its baseline enabled state and severity.
    fn default() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|rule| {
                (
                    rule.rule_id.to_string(),
                    RuleConfig::new(rule.default_enabled, rule.default_severity.as_str()),
                )
            })
            .collect();

        Self {
            rules,
            custom_rules: Vec::new(),
            exclude_patterns: Vec::new(),
            strict: false,
            plugin_directories: default_plugin_directories(),
        }
    }
}

impl LintConfig {
    /// Layer a parsed configuration document over the built-in rule table.
    ///
    /// Rules are merged per field; every other key comes from `parsed`.
    #[must_use]
    pub fn layered(parsed: Self) -> Self {
        let mut rules = Self::default().rules;
        for (rule_id, rule) in parsed.rules {
            rules.entry(rule_id).or_default().overlay(rule);
        }
        Self { rules, ..parsed }
    }

    /// A config with no rule table at all: every rule falls back to enabled
    /// with its coded severity.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rule_config(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_id)
    }

    /// Whether `rule_id` should run against `repository`.
    ///
    /// Unconfigured rules are enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str, repository: &Repository) -> bool {
        self.rule_config(rule_id)
            .and_then(|rule| rule.enabled)
            .is_none_or(|enabled| enabled.resolve(repository.kind()))
    }

    /// Compile the `exclude` patterns.
    ///
    /// # Errors
    /// Returns an error if a pattern is not a valid glob.
    pub fn exclude_filter(&self) -> Result<ExcludeFilter> {
        ExcludeFilter::new(&self.exclude_patterns)
    }

    /// Render as a YAML document.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| crate::error::LintError::Config(format!("Failed to render config: {e}")))
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
