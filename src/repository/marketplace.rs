use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

/// Registry keys that control discovery and never reach plugin metadata.
pub const REGISTRY_ONLY_FIELDS: &[&str] = &["source", "strict"];

/// Where a registry entry says its plugin lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PluginSource {
    /// Path relative to the repository root.
    Local { path: String },
    /// Hosted repository reference, e.g. `{"source": "github", "repo": "owner/name"}`.
    Hosted { repo: String },
    /// Generic remote URL, e.g. `{"source": "url", "url": "https://..."}`.
    Url { url: String },
    Unrecognized,
}

impl PluginSource {
    #[must_use]
    pub fn parse(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(path)) => Self::Local { path: path.clone() },
            Some(Value::Object(object)) => Self::parse_structured(object),
            _ => Self::Unrecognized,
        }
    }

    fn parse_structured(object: &Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);

        match object.get("source").and_then(Value::as_str) {
            Some("github") => text("repo").map_or(Self::Unrecognized, |repo| Self::Hosted { repo }),
            Some("url" | "git") => text("url").map_or(Self::Unrecognized, |url| Self::Url { url }),
            _ => {
                if let Some(repo) = text("repo") {
                    Self::Hosted { repo }
                } else if let Some(url) = text("url") {
                    Self::Url { url }
                } else {
                    Self::Unrecognized
                }
            }
        }
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Hosted { .. } | Self::Url { .. })
    }
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { path } => f.write_str(path),
            Self::Hosted { repo } => write!(f, "repo:{repo}"),
            Self::Url { url } => f.write_str(url),
            Self::Unrecognized => f.write_str("<unrecognized>"),
        }
    }
}

/// One element of the registry's `plugins` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceEntry {
    pub name: Option<String>,
    pub source: PluginSource,
    /// `false` only when the entry says `"strict": false`.
    pub strict: bool,
    /// The entry exactly as written.
    pub fields: Map<String, Value>,
}

impl MarketplaceEntry {
    #[must_use]
    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self {
            name: fields.get("name").and_then(Value::as_str).map(String::from),
            source: PluginSource::parse(fields.get("source")),
            strict: !matches!(fields.get("strict"), Some(Value::Bool(false))),
            fields,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Entry fields usable as plugin metadata.
    #[must_use]
    pub fn metadata_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(key, _)| !REGISTRY_ONLY_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// The parsed marketplace registry document.
#[derive(Debug, Clone, PartialEq)]
pub struct Marketplace {
    document: Map<String, Value>,
    entries: Vec<MarketplaceEntry>,
    /// Indexes of `plugins` elements that were not objects.
    malformed: Vec<usize>,
}

impl Marketplace {
    /// Read and parse the registry at `path`.
    ///
    /// Returns `None` when the file is unreadable, is not JSON, or is not an object.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "registry unreadable");
                return None;
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => Some(Self::from_document(document)),
            Ok(_) => {
                tracing::debug!(path = %path.display(), "registry is not a JSON object");
                None
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "registry is not valid JSON");
                None
            }
        }
    }

    #[must_use]
    pub fn from_document(document: Map<String, Value>) -> Self {
        let mut entries = Vec::new();
        let mut malformed = Vec::new();

        if let Some(Value::Array(plugins)) = document.get("plugins") {
            for (index, plugin) in plugins.iter().enumerate() {
                match plugin {
                    Value::Object(fields) => {
                        entries.push(MarketplaceEntry::from_object(fields.clone()));
                    }
                    _ => malformed.push(index),
                }
            }
        }

        Self {
            document,
            entries,
            malformed,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub const fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    #[must_use]
    pub fn entries(&self) -> &[MarketplaceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn malformed_indexes(&self) -> &[usize] {
        &self.malformed
    }

    #[must_use]
    pub fn is_registered(&self, plugin_name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name.as_deref() == Some(plugin_name))
    }
}

#[cfg(test)]
#[path = "marketplace_tests.rs"]
mod tests;
