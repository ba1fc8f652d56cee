//! The built-in rule catalog.
//!
//! Each rule is a small struct generated by [`builtin_check!`] plus an
//! `inspect` method holding the actual logic.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::config::EnabledState;

use super::{Check, CheckSettings, Severity};

/// Static description of a built-in rule and how to construct it.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinRule {
    pub rule_id: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
    pub default_enabled: EnabledState,
    pub build: fn(CheckSettings) -> Box<dyn Check>,
}

macro_rules! builtin_check {
    ($name:ident, $id:literal, $description:literal, $severity:ident, $enabled:ident) => {
        pub struct $name {
            settings: $crate::checker::CheckSettings,
        }

        impl $name {
            pub const RULE: $crate::checker::builtin::BuiltinRule =
                $crate::checker::builtin::BuiltinRule {
                    rule_id: $id,
                    description: $description,
                    default_severity: $crate::checker::Severity::$severity,
                    default_enabled: $crate::config::EnabledState::$enabled,
                    build: Self::build,
                };

            fn build(
                settings: $crate::checker::CheckSettings,
            ) -> Box<dyn $crate::checker::Check> {
                Box::new(Self { settings })
            }

            fn excluded(
                &self,
                repository: &$crate::repository::Repository,
                path: &std::path::Path,
            ) -> bool {
                self.settings.is_excluded(repository.root(), path)
            }
        }

        impl $crate::checker::Check for $name {
            fn rule_id(&self) -> &str {
                $id
            }

            fn description(&self) -> &str {
                $description
            }

            fn default_severity(&self) -> $crate::checker::Severity {
                $crate::checker::Severity::$severity
            }

            fn settings(&self) -> &$crate::checker::CheckSettings {
                &self.settings
            }

            fn check(
                &self,
                repository: &$crate::repository::Repository,
            ) -> std::result::Result<Vec<$crate::checker::Violation>, $crate::checker::CheckError>
            {
                self.inspect(repository)
            }
        }
    };
}

mod agents;
mod command_format;
mod hooks;
mod marketplace;
mod mcp;
mod plugin_structure;
mod skills;

pub use agents::AgentFrontmatter;
pub use command_format::{CommandFrontmatter, CommandNameFormat, CommandNaming, CommandSections};
pub use hooks::{HooksJsonValid, VALID_HOOK_EVENTS};
pub use marketplace::{MarketplaceJsonValid, MarketplaceRegistration};
pub use mcp::{McpProhibited, McpValidJson};
pub use plugin_structure::{
    CommandsDirRequired, CommandsExist, PluginJsonRequired, PluginJsonValid, PluginNaming,
    PluginReadme,
};
pub use skills::SkillFrontmatter;

/// Every built-in rule, in execution order.
pub const BUILTIN_RULES: &[BuiltinRule] = &[
    PluginJsonRequired::RULE,
    PluginJsonValid::RULE,
    PluginNaming::RULE,
    CommandsDirRequired::RULE,
    CommandsExist::RULE,
    PluginReadme::RULE,
    CommandNaming::RULE,
    CommandFrontmatter::RULE,
    CommandSections::RULE,
    CommandNameFormat::RULE,
    MarketplaceJsonValid::RULE,
    MarketplaceRegistration::RULE,
    SkillFrontmatter::RULE,
    AgentFrontmatter::RULE,
    HooksJsonValid::RULE,
    McpValidJson::RULE,
    McpProhibited::RULE,
];

#[must_use]
pub fn find_rule(rule_id: &str) -> Option<&'static BuiltinRule> {
    BUILTIN_RULES.iter().find(|rule| rule.rule_id == rule_id)
}

/// `.md` files directly inside `dir`, sorted by name.
fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect()
}

/// Directories directly inside `dir`, sorted by name.
fn child_dirs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Leading YAML block delimited by `---` lines.
#[derive(Debug, PartialEq, Eq)]
enum Frontmatter<'a> {
    Missing,
    Malformed,
    Present(&'a str),
}

impl<'a> Frontmatter<'a> {
    fn parse(content: &'a str) -> Self {
        if !content.starts_with("---") {
            return Self::Missing;
        }
        content
            .strip_prefix("---\n")
            .and_then(|rest| rest.find("\n---").map(|end| &rest[..end]))
            .map_or(Self::Malformed, Self::Present)
    }
}

static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid kebab-case regex"));

#[cfg(test)]
#[path = "builtin_tests/mod.rs"]
mod tests;
