use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::checker::{Check, CheckError, Violation};
use crate::repository::{COMMANDS_DIR, Repository, manifest_path};

use super::{KEBAB_CASE, markdown_files};

const REQUIRED_MANIFEST_FIELDS: &[&str] = &["name", "description", "version", "author"];

builtin_check!(
    PluginJsonRequired,
    "plugin-json-required",
    "Plugin must have .claude-plugin/plugin.json",
    Error,
    On
);

impl PluginJsonRequired {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for plugin in repository.plugins() {
            let manifest = manifest_path(plugin);
            if manifest.exists() || self.excluded(repository, &manifest) {
                continue;
            }
            // Relaxed registry entries may omit the manifest.
            if repository.is_relaxed(plugin) {
                continue;
            }
            violations.push(self.violation("Missing plugin.json".to_string()).at(manifest));
        }
        Ok(violations)
    }
}

builtin_check!(
    PluginJsonValid,
    "plugin-json-valid",
    "Plugin.json must be valid JSON with required fields",
    Error,
    On
);

impl PluginJsonValid {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for plugin in repository.plugins() {
            let path = manifest_path(plugin);
            if !path.exists() || self.excluded(repository, &path) {
                continue;
            }

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    violations.push(self.violation(format!("Failed to read file: {e}")).at(&path));
                    continue;
                }
            };
            let data = match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(data)) => data,
                Ok(_) => {
                    violations.push(
                        self.violation("plugin.json must contain a JSON object".to_string())
                            .at(&path),
                    );
                    continue;
                }
                Err(e) => {
                    violations.push(self.violation(format!("Invalid JSON: {e}")).at(&path));
                    continue;
                }
            };

            for field in REQUIRED_MANIFEST_FIELDS {
                if !data.contains_key(*field) {
                    violations.push(
                        self.violation(format!("Missing required field '{field}'"))
                            .at(&path),
                    );
                }
            }

            if let Some(version) = data.get("version") {
                let version = version
                    .as_str()
                    .map_or_else(|| version.to_string(), String::from);
                if !SEMVER_PREFIX.is_match(&version) {
                    violations.push(
                        self.violation(format!("Version '{version}' should follow semver (X.Y.Z)"))
                            .at(&path),
                    );
                }
            }

            if let Some(author) = data.get("author")
                && !author.as_object().is_some_and(|a| a.contains_key("name"))
            {
                violations.push(
                    self.violation("Author must be an object with 'name' field".to_string())
                        .at(&path),
                );
            }
        }
        Ok(violations)
    }
}

/// Only the `X.Y.Z` prefix is required; pre-release and build suffixes pass.
static SEMVER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+").expect("valid semver regex"));

builtin_check!(
    PluginNaming,
    "plugin-naming",
    "Plugin names should use kebab-case",
    Warning,
    On
);

impl PluginNaming {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        Ok(repository
            .plugins()
            .filter(|plugin| !self.excluded(repository, &manifest_path(plugin)))
            .filter_map(|plugin| {
                let name = repository.get_plugin_name(plugin);
                (!KEBAB_CASE.is_match(&name)).then(|| {
                    self.violation(format!("Plugin name '{name}' should use kebab-case"))
                        .at(plugin)
                })
            })
            .collect())
    }
}

builtin_check!(
    CommandsDirRequired,
    "commands-dir-required",
    "Plugin must have a commands directory",
    Warning,
    Off
);

impl CommandsDirRequired {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        Ok(repository
            .plugins()
            .filter(|plugin| !self.excluded(repository, &plugin.join(COMMANDS_DIR)))
            .filter(|plugin| repository.get_commands_dirs(plugin).is_empty())
            .map(|plugin| {
                self.violation("Missing commands directory".to_string())
                    .at(plugin)
            })
            .collect())
    }
}

builtin_check!(
    CommandsExist,
    "commands-exist",
    "Plugin should have at least one command file",
    Info,
    Off
);

impl CommandsExist {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for plugin in repository.plugins() {
            let dirs = repository.get_commands_dirs(plugin);
            let Some(first) = dirs.first() else {
                continue;
            };
            if self.excluded(repository, first) {
                continue;
            }
            if dirs.iter().all(|dir| markdown_files(dir).is_empty()) {
                violations.push(
                    self.violation("No command files found in commands directory".to_string())
                        .at(first),
                );
            }
        }
        Ok(violations)
    }
}

builtin_check!(
    PluginReadme,
    "plugin-readme",
    "Plugin should have a README.md file",
    Warning,
    On
);

impl PluginReadme {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        Ok(repository
            .plugins()
            .filter(|plugin| {
                let readme = plugin.join("README.md");
                !readme.exists() && !self.excluded(repository, &readme)
            })
            .map(|plugin| {
                self.violation("Missing README.md (recommended)".to_string())
                    .at(plugin)
            })
            .collect())
    }
}
