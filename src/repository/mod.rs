mod discovery;
mod marketplace;
mod metadata;

pub use discovery::{SkipReason, SkippedSource};
pub use marketplace::{Marketplace, MarketplaceEntry, PluginSource, REGISTRY_ONLY_FIELDS};
pub use metadata::PluginMetadata;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{DEFAULT_PLUGIN_DIRECTORIES, LintConfig};
use crate::error::{LintError, Result};

/// Directory holding a plugin's manifest, and the registry at a marketplace root.
pub const MANIFEST_DIR: &str = ".claude-plugin";
pub const MANIFEST_FILE: &str = "plugin.json";
pub const REGISTRY_FILE: &str = "marketplace.json";
pub const COMMANDS_DIR: &str = "commands";
pub const AGENTS_DIR: &str = "agents";
pub const SKILLS_DIR: &str = "skills";
pub const HOOKS_DIR: &str = "hooks";
pub const HOOKS_FILE: &str = "hooks.json";

/// Content directories that mark a registry source as a plugin.
pub const CONTENT_DIRS: &[&str] = &[COMMANDS_DIR, AGENTS_DIR, SKILLS_DIR, HOOKS_DIR];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
    SinglePlugin,
    Marketplace,
    Unknown,
}

impl RepositoryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SinglePlugin => "single-plugin",
            Self::Marketplace => "marketplace",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered plugin directory. The manifest is read on first use.
#[derive(Debug)]
pub struct PluginRef {
    path: PathBuf,
    manifest: OnceLock<Option<Map<String, Value>>>,
}

impl PluginRef {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            manifest: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed manifest, `None` when missing or malformed.
    #[must_use]
    pub fn manifest(&self) -> Option<&Map<String, Value>> {
        self.manifest
            .get_or_init(|| read_manifest(&self.path))
            .as_ref()
    }
}

/// Manifest path of the plugin at `plugin`.
#[must_use]
pub fn manifest_path(plugin: &Path) -> PathBuf {
    plugin.join(MANIFEST_DIR).join(MANIFEST_FILE)
}

fn read_manifest(plugin: &Path) -> Option<Map<String, Value>> {
    let path = manifest_path(plugin);
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(manifest)) => Some(manifest),
        Ok(_) | Err(_) => {
            tracing::debug!(path = %path.display(), "ignoring malformed manifest");
            None
        }
    }
}

/// A classified repository and the plugins found in it. Read-only once opened.
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    kind: RepositoryKind,
    marketplace: Option<Marketplace>,
    plugins: Vec<PluginRef>,
    fallback: HashMap<PathBuf, MarketplaceEntry>,
    skipped: Vec<SkippedSource>,
}

impl Repository {
    /// Classify `root` and discover its plugins.
    ///
    /// `config` supplies the plugin container directories; the defaults are
    /// used when it is `None`.
    ///
    /// # Errors
    /// Returns [`LintError::RepositoryNotFound`] if `root` is not an existing directory.
    pub fn open(root: &Path, config: Option<&LintConfig>) -> Result<Self> {
        let root = dunce::canonicalize(root)
            .ok()
            .filter(|path| path.is_dir())
            .ok_or_else(|| LintError::RepositoryNotFound(root.to_path_buf()))?;

        let containers: Vec<String> = config.map_or_else(
            || {
                DEFAULT_PLUGIN_DIRECTORIES
                    .iter()
                    .map(|s| (*s).to_string())
                    .collect()
            },
            |config| config.plugin_directories.clone(),
        );

        let kind = classify(&root, &containers);
        let marketplace = if registry_path(&root).exists() {
            Marketplace::load(&registry_path(&root))
        } else {
            None
        };

        let found = discovery::discover(&root, kind, marketplace.as_ref(), &containers);
        tracing::debug!(
            root = %root.display(),
            kind = %kind,
            plugins = found.plugins.len(),
            "repository discovered"
        );

        Ok(Self {
            root,
            kind,
            marketplace,
            plugins: found.plugins.into_iter().map(PluginRef::new).collect(),
            fallback: found.fallback,
            skipped: found.skipped,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn kind(&self) -> RepositoryKind {
        self.kind
    }

    /// Discovered plugin directories in discovery order.
    pub fn plugins(&self) -> impl Iterator<Item = &Path> {
        self.plugins.iter().map(PluginRef::path)
    }

    #[must_use]
    pub fn plugin_refs(&self) -> &[PluginRef] {
        &self.plugins
    }

    /// The parsed registry; `None` when absent, unreadable, or malformed.
    #[must_use]
    pub const fn marketplace(&self) -> Option<&Marketplace> {
        self.marketplace.as_ref()
    }

    /// Whether a registry file exists, parseable or not.
    #[must_use]
    pub fn has_marketplace(&self) -> bool {
        registry_path(&self.root).exists()
    }

    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        registry_path(&self.root)
    }

    #[must_use]
    pub fn skipped_sources(&self) -> &[SkippedSource] {
        &self.skipped
    }

    /// Registry entry retained for a relaxed plugin without a manifest.
    #[must_use]
    pub fn registry_fallback(&self, plugin: &Path) -> Option<&MarketplaceEntry> {
        self.fallback.get(plugin)
    }

    /// Whether `plugin` was registered with `"strict": false` and has no manifest.
    #[must_use]
    pub fn is_relaxed(&self, plugin: &Path) -> bool {
        self.registry_fallback(plugin)
            .is_some_and(|entry| !entry.strict)
    }

    #[must_use]
    pub fn is_registered_in_marketplace(&self, plugin_name: &str) -> bool {
        self.marketplace
            .as_ref()
            .is_some_and(|marketplace| marketplace.is_registered(plugin_name))
    }

    fn manifest(&self, plugin: &Path) -> Option<Map<String, Value>> {
        self.plugins
            .iter()
            .find(|p| p.path == plugin)
            .map_or_else(|| read_manifest(plugin), |p| p.manifest().cloned())
    }

    #[must_use]
    pub fn get_plugin_metadata(&self, plugin: &Path) -> PluginMetadata {
        PluginMetadata::merge(self.manifest(plugin).as_ref(), self.registry_fallback(plugin))
    }

    /// Manifest or registry name, else the directory name.
    #[must_use]
    pub fn get_plugin_name(&self, plugin: &Path) -> String {
        self.get_plugin_metadata(plugin)
            .name()
            .map(String::from)
            .or_else(|| {
                plugin
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get_commands_dirs(&self, plugin: &Path) -> Vec<PathBuf> {
        self.content_dirs(plugin, COMMANDS_DIR)
    }

    #[must_use]
    pub fn get_agents_dirs(&self, plugin: &Path) -> Vec<PathBuf> {
        self.content_dirs(plugin, AGENTS_DIR)
    }

    #[must_use]
    pub fn get_skills_dirs(&self, plugin: &Path) -> Vec<PathBuf> {
        self.content_dirs(plugin, SKILLS_DIR)
    }

    /// Declared directories that exist, then the conventional one if not already listed.
    fn content_dirs(&self, plugin: &Path, kind: &str) -> Vec<PathBuf> {
        let declared = self
            .get_plugin_metadata(plugin)
            .declared_paths(kind)
            .into_iter()
            .map(|declared| plugin.join(declared));

        let mut dirs: Vec<PathBuf> = Vec::new();
        for path in declared.chain(std::iter::once(plugin.join(kind))) {
            if path.is_dir() && !dirs.contains(&path) {
                dirs.push(path);
            }
        }
        dirs
    }

    /// A declared hooks file wins; `hooks/hooks.json` is used otherwise.
    #[must_use]
    pub fn get_hooks_path(&self, plugin: &Path) -> Option<PathBuf> {
        self.get_plugin_metadata(plugin)
            .declared_paths(HOOKS_DIR)
            .into_iter()
            .map(|declared| plugin.join(declared))
            .find(|path| path.is_file())
            .or_else(|| {
                let default = plugin.join(HOOKS_DIR).join(HOOKS_FILE);
                default.is_file().then_some(default)
            })
    }

    /// JSON view of the repository handed to external checks.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let plugins: Vec<Value> = self
            .plugins()
            .map(|plugin| {
                serde_json::json!({
                    "path": plugin,
                    "name": self.get_plugin_name(plugin),
                    "metadata": self.get_plugin_metadata(plugin),
                    "commands_dirs": self.get_commands_dirs(plugin),
                    "agents_dirs": self.get_agents_dirs(plugin),
                    "skills_dirs": self.get_skills_dirs(plugin),
                    "hooks_path": self.get_hooks_path(plugin),
                })
            })
            .collect();

        serde_json::json!({
            "root": self.root,
            "kind": self.kind,
            "marketplace": self.marketplace.as_ref().map(Marketplace::document),
            "plugins": plugins,
        })
    }
}

fn registry_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_DIR).join(REGISTRY_FILE)
}

/// Registry first, then a root manifest directory, then any plugin container.
fn classify(root: &Path, containers: &[String]) -> RepositoryKind {
    if registry_path(root).exists() {
        RepositoryKind::Marketplace
    } else if root.join(MANIFEST_DIR).exists() {
        RepositoryKind::SinglePlugin
    } else if containers.iter().any(|dir| root.join(dir).is_dir()) {
        RepositoryKind::Marketplace
    } else {
        RepositoryKind::Unknown
    }
}

#[cfg(test)]
#[path = "repository_tests/mod.rs"]
mod tests;
