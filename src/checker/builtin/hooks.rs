use std::path::Path;

use serde_json::{Map, Value};

use crate::checker::{Check, CheckError, Violation};
use crate::repository::Repository;

pub const VALID_HOOK_EVENTS: &[&str] = &[
    "Notification",
    "PostToolUse",
    "PreCompact",
    "PreToolUse",
    "SessionEnd",
    "SessionStart",
    "Stop",
    "SubagentStop",
    "UserPromptSubmit",
];

builtin_check!(
    HooksJsonValid,
    "hooks-json-valid",
    "hooks.json must be valid JSON with proper hook configuration structure",
    Error,
    On
);

impl HooksJsonValid {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for plugin in repository.plugins() {
            let Some(path) = repository.get_hooks_path(plugin) else {
                continue;
            };
            if self.excluded(repository, &path) {
                continue;
            }
            violations.extend(
                Self::validate_file(&path)
                    .into_iter()
                    .map(|message| self.violation(message).at(&path)),
            );
        }
        Ok(violations)
    }

    /// Problems found in one hooks file, as messages.
    fn validate_file(path: &Path) -> Vec<String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => return vec![format!("Failed to read file: {e}")],
        };
        let data = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(data)) => data,
            Ok(_) => return vec!["hooks.json must be a JSON object".to_string()],
            Err(e) => return vec![format!("Invalid JSON: {e}")],
        };
        match data.get("hooks") {
            None => vec!["hooks.json must contain a 'hooks' key".to_string()],
            Some(Value::Object(events)) => Self::validate_events(events),
            Some(_) => vec!["'hooks' must be a JSON object".to_string()],
        }
    }

    fn validate_events(events: &Map<String, Value>) -> Vec<String> {
        let mut problems = Vec::new();
        for (event, matchers) in events {
            if !VALID_HOOK_EVENTS.contains(&event.as_str()) {
                problems.push(format!(
                    "Unknown event type '{event}'. Valid types: {}",
                    VALID_HOOK_EVENTS.join(", ")
                ));
            }

            let Value::Array(matchers) = matchers else {
                problems.push(format!(
                    "Event '{event}' must have an array of hook configurations"
                ));
                continue;
            };
            for (index, matcher) in matchers.iter().enumerate() {
                problems.extend(Self::validate_matcher(&format!("{event}[{index}]"), matcher));
            }
        }
        problems
    }

    fn validate_matcher(location: &str, matcher: &Value) -> Vec<String> {
        let Value::Object(matcher) = matcher else {
            return vec![format!("Event '{location}' configuration must be an object")];
        };
        let hooks = match matcher.get("hooks") {
            None => return vec![format!("Event '{location}' must have a 'hooks' array")],
            Some(Value::Array(hooks)) => hooks,
            Some(_) => return vec![format!("Event '{location}.hooks' must be an array")],
        };

        hooks
            .iter()
            .enumerate()
            .filter_map(|(index, hook)| match hook {
                Value::Object(hook) if hook.contains_key("type") => None,
                Value::Object(_) => Some(format!(
                    "Event '{location}.hooks[{index}]' must have a 'type' field"
                )),
                _ => Some(format!("Event '{location}.hooks[{index}]' must be an object")),
            })
            .collect()
    }
}
