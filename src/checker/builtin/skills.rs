use crate::checker::{Check, CheckError, Violation};
use crate::repository::Repository;

use super::{Frontmatter, child_dirs};

builtin_check!(
    SkillFrontmatter,
    "skill-frontmatter",
    "SKILL.md files should have frontmatter with name and description",
    Warning,
    On
);

impl SkillFrontmatter {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let skill_dirs = repository
            .plugins()
            .flat_map(|plugin| repository.get_skills_dirs(plugin))
            .flat_map(|dir| child_dirs(&dir));

        let mut violations = Vec::new();
        for skill_dir in skill_dirs {
            let skill_md = skill_dir.join("SKILL.md");
            if self.excluded(repository, &skill_md) {
                continue;
            }
            if !skill_md.exists() {
                violations.push(self.violation("Missing SKILL.md".to_string()).at(&skill_dir));
                continue;
            }

            let content = match std::fs::read_to_string(&skill_md) {
                Ok(content) => content,
                Err(e) => {
                    violations
                        .push(self.violation(format!("Failed to read file: {e}")).at(&skill_md));
                    continue;
                }
            };

            match Frontmatter::parse(&content) {
                Frontmatter::Missing => violations.push(
                    self.violation("Missing frontmatter (recommended for SKILL.md)".to_string())
                        .at(&skill_md),
                ),
                Frontmatter::Malformed => {}
                Frontmatter::Present(block) => {
                    for field in ["name", "description"] {
                        if !block.contains(&format!("{field}:")) {
                            violations.push(
                                self.violation(format!(
                                    "Missing '{field}' in SKILL.md frontmatter"
                                ))
                                .at(&skill_md),
                            );
                        }
                    }
                }
            }
        }
        Ok(violations)
    }
}
