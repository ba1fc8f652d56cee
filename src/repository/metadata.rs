use serde::Serialize;
use serde_json::{Map, Value};

use super::MarketplaceEntry;

/// Merged metadata for one plugin.
///
/// Built from the plugin's own manifest and, for relaxed registry entries
/// without a manifest, the registry entry. Manifest keys always win.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PluginMetadata {
    fields: Map<String, Value>,
}

impl PluginMetadata {
    #[must_use]
    pub fn merge(manifest: Option<&Map<String, Value>>, fallback: Option<&MarketplaceEntry>) -> Self {
        let mut fields = fallback.map(MarketplaceEntry::metadata_fields).unwrap_or_default();
        if let Some(manifest) = manifest {
            for (key, value) in manifest {
                fields.insert(key.clone(), value.clone());
            }
        }
        Self { fields }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Custom locations declared under `key`, as a string or a list of strings,
    /// with any leading `./` removed.
    #[must_use]
    pub fn declared_paths(&self, key: &str) -> Vec<String> {
        let normalize = |path: &str| path.trim_start_matches("./").to_string();
        match self.fields.get(key) {
            Some(Value::String(path)) => vec![normalize(path)],
            Some(Value::Array(paths)) => paths
                .iter()
                .filter_map(Value::as_str)
                .map(normalize)
                .collect(),
            _ => Vec::new(),
        }
    }
}
