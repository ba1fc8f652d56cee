use serde_json::Value;

use crate::checker::{Check, CheckError, Violation};
use crate::repository::{Repository, RepositoryKind, manifest_path};

builtin_check!(
    MarketplaceJsonValid,
    "marketplace-json-valid",
    "Marketplace.json must be valid JSON with required fields",
    Error,
    Auto
);

impl MarketplaceJsonValid {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        if repository.kind() != RepositoryKind::Marketplace {
            return Ok(Vec::new());
        }

        let path = repository.registry_path();
        if self.excluded(repository, &path) {
            return Ok(Vec::new());
        }
        let failure = |message: String| Ok(vec![self.violation(message).at(&path)]);

        if !path.exists() {
            return failure("Marketplace file not found".to_string());
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return failure(format!("Failed to read file: {e}")),
        };
        let document = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => document,
            Ok(_) => return failure("Marketplace file must contain a JSON object".to_string()),
            Err(e) => return failure(format!("Invalid JSON: {e}")),
        };

        let mut violations = Vec::new();
        for field in ["name", "owner"] {
            if !document.contains_key(field) {
                violations.push(self.violation(format!("Missing '{field}' field")).at(&path));
            }
        }
        match document.get("plugins") {
            None => violations.push(self.violation("Missing 'plugins' array".to_string()).at(&path)),
            Some(Value::Array(_)) => {}
            Some(_) => violations.push(
                self.violation("'plugins' must be an array".to_string())
                    .at(&path),
            ),
        }
        Ok(violations)
    }
}

builtin_check!(
    MarketplaceRegistration,
    "marketplace-registration",
    "Plugins must be registered in marketplace.json",
    Error,
    Auto
);

impl MarketplaceRegistration {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        if !repository.has_marketplace() {
            return Ok(Vec::new());
        }

        let registry = repository.registry_path();
        Ok(repository
            .plugins()
            .filter(|plugin| !self.excluded(repository, &manifest_path(plugin)))
            .map(|plugin| repository.get_plugin_name(plugin))
            .filter(|name| !repository.is_registered_in_marketplace(name))
            .map(|name| {
                self.violation(format!("Plugin '{name}' not registered in marketplace.json"))
                    .at(&registry)
            })
            .collect())
    }
}
