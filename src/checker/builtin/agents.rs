use crate::checker::{Check, CheckError, Violation};
use crate::repository::Repository;

use super::{Frontmatter, markdown_files};

builtin_check!(
    AgentFrontmatter,
    "agent-frontmatter",
    "Agent files must have valid frontmatter with name and description",
    Warning,
    On
);

impl AgentFrontmatter {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let agent_files = repository
            .plugins()
            .flat_map(|plugin| repository.get_agents_dirs(plugin))
            .flat_map(|dir| markdown_files(&dir));

        let mut violations = Vec::new();
        for file in agent_files {
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

            match Frontmatter::parse(&content) {
                Frontmatter::Missing => {
                    violations.push(self.violation("Missing frontmatter".to_string()).at(&file));
                }
                Frontmatter::Malformed => violations.push(
                    self.violation("Invalid frontmatter format".to_string())
                        .at(&file),
                ),
                Frontmatter::Present(block) => {
                    for field in ["name", "description"] {
                        if !block.contains(&format!("{field}:")) {
                            violations.push(
                                self.violation(format!("Missing '{field}' in frontmatter"))
                                    .at(&file),
                            );
                        }
                    }
                }
            }
        }
        Ok(violations)
    }
}
