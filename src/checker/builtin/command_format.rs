use std::path::{Path, PathBuf};

use regex::Regex;

use crate::checker::{Check, CheckError, Violation};
use crate::repository::Repository;

use super::{Frontmatter, KEBAB_CASE, file_stem, markdown_files};

const DEFAULT_SECTIONS: &[&str] = &["Name", "Synopsis", "Description", "Implementation"];

/// Command files of every plugin, with the plugin they belong to.
fn command_files(repository: &Repository) -> Vec<(&Path, PathBuf)> {
    repository
        .plugins()
        .flat_map(|plugin| {
            repository
                .get_commands_dirs(plugin)
                .iter()
                .flat_map(|dir| markdown_files(dir))
                .map(move |file| (plugin, file))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn compile(pattern: &str) -> Result<Regex, CheckError> {
    Regex::new(pattern).map_err(|e| CheckError::Message(format!("invalid pattern {pattern}: {e}")))
}

builtin_check!(
    CommandNaming,
    "command-naming",
    "Command files should use kebab-case naming",
    Warning,
    On
);

impl CommandNaming {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        Ok(command_files(repository)
            .into_iter()
            .filter(|(_, file)| !self.excluded(repository, file))
            .filter_map(|(_, file)| {
                let name = file_stem(&file);
                (!KEBAB_CASE.is_match(&name)).then(|| {
                    self.violation(format!("Command name '{name}' should use kebab-case"))
                        .at(&file)
                })
            })
            .collect())
    }
}

builtin_check!(
    CommandFrontmatter,
    "command-frontmatter",
    "Command files must have valid frontmatter with description",
    Error,
    On
);

impl CommandFrontmatter {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for (_, file) in command_files(repository) {
            if self.excluded(repository, &file) {
                continue;
            }
            let content = match std::fs::read_to_string(&file) {
                Ok(content) => content,
                Err(e) => {
                    violations.push(self.violation(format!("Failed to read file: {e}")).at(&file));
                    continue;
                }
            };

            let message = match Frontmatter::parse(&content) {
                Frontmatter::Missing => "Missing frontmatter",
                Frontmatter::Malformed => "Invalid frontmatter format",
                Frontmatter::Present(block) if !block.contains("description:") => {
                    "Missing 'description' in frontmatter"
                }
                Frontmatter::Present(_) => continue,
            };
            violations.push(self.violation(message.to_string()).at(&file));
        }
        Ok(violations)
    }
}

builtin_check!(
    CommandSections,
    "command-sections",
    "Command files should have Name, Synopsis, Description, and Implementation sections",
    Warning,
    On
);

impl CommandSections {
    /// Configured `sections` option, else the standard four.
    fn sections(&self) -> Vec<String> {
        self.settings
            .options
            .string_list("sections")
            .unwrap_or_else(|| DEFAULT_SECTIONS.iter().map(|s| (*s).to_string()).collect())
    }

    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let patterns = self
            .sections()
            .into_iter()
            .map(|section| {
                let pattern = format!(r"(?m)^##\s+{}\s*$", regex::escape(&section));
                compile(&pattern).map(|regex| (section, regex))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut violations = Vec::new();
        for (_, file) in command_files(repository) {
            if self.excluded(repository, &file) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            for (section, regex) in &patterns {
                if !regex.is_match(&content) {
                    violations.push(
                        self.violation(format!("Missing recommended section '## {section}'"))
                            .at(&file),
                    );
                }
            }
        }
        Ok(violations)
    }
}

builtin_check!(
    CommandNameFormat,
    "command-name-format",
    "Command Name section should be 'plugin-name:command-name'",
    Warning,
    On
);

impl CommandNameFormat {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let name_section = compile(r"(?m)^##\s+Name\s*\n+([^\n#]+)")?;

        let mut violations = Vec::new();
        for (plugin, file) in command_files(repository) {
            if self.excluded(repository, &file) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let Some(found) = name_section.captures(&content).and_then(|c| c.get(1)) else {
                continue;
            };

            let expected = format!("{}:{}", repository.get_plugin_name(plugin), file_stem(&file));
            let found = found.as_str().trim();
            if !found.contains(&expected) {
                violations.push(
                    self.violation(format!(
                        "Name section should contain '{expected}', found: '{found}'"
                    ))
                    .at(&file),
                );
            }
        }
        Ok(violations)
    }
}
