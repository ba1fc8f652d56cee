use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use super::{
    COMMANDS_DIR, CONTENT_DIRS, MANIFEST_DIR, Marketplace, MarketplaceEntry, PluginSource,
    RepositoryKind, manifest_path,
};

/// Why a registry source (or container entry) did not become a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    EscapesRoot,
    NotFound,
    NotADirectory,
    Remote,
    Unrecognized,
    NoPluginContent,
    Malformed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EscapesRoot => "resolves outside the repository root",
            Self::NotFound => "does not exist",
            Self::NotADirectory => "is not a directory",
            Self::Remote => "is a remote source",
            Self::Unrecognized => "has an unrecognized source",
            Self::NoPluginContent => "contains no plugin content",
            Self::Malformed => "is not a JSON object",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSource {
    /// Registry entry name, or the directory name for container entries.
    pub entry: String,
    pub source: String,
    pub reason: SkipReason,
}

/// Output of a discovery pass.
#[derive(Debug, Default)]
pub(super) struct Discovered {
    pub plugins: Vec<PathBuf>,
    pub fallback: HashMap<PathBuf, MarketplaceEntry>,
    pub skipped: Vec<SkippedSource>,
}

impl Discovered {
    /// Add a plugin unless its path is already known. First discovery wins.
    fn push(&mut self, path: PathBuf) {
        if !self.plugins.contains(&path) {
            self.plugins.push(path);
        }
    }

    fn skip(&mut self, entry: &str, source: impl fmt::Display, reason: SkipReason) {
        let source = source.to_string();
        match reason {
            SkipReason::Remote => {
                tracing::info!(plugin = entry, %source, "skipping remote plugin source");
            }
            _ => tracing::warn!(plugin = entry, %source, "skipping plugin source: {reason}"),
        }
        self.skipped.push(SkippedSource {
            entry: entry.to_string(),
            source,
            reason,
        });
    }
}

pub(super) fn discover(
    root: &Path,
    kind: RepositoryKind,
    marketplace: Option<&Marketplace>,
    containers: &[String],
) -> Discovered {
    let mut found = Discovered::default();
    match kind {
        RepositoryKind::SinglePlugin => found.push(root.to_path_buf()),
        RepositoryKind::Marketplace => {
            scan_containers(root, containers, &mut found);
            if let Some(marketplace) = marketplace {
                scan_registry(root, marketplace, &mut found);
            }
        }
        RepositoryKind::Unknown => {}
    }
    found
}

/// Every non-hidden child of each container that has a manifest directory or commands.
fn scan_containers(root: &Path, containers: &[String], found: &mut Discovered) {
    for container in containers {
        let dir = root.join(container);
        let Ok(read_dir) = std::fs::read_dir(&dir) else {
            continue;
        };

        let mut children: Vec<PathBuf> = read_dir
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| !name.to_string_lossy().starts_with('.'))
            })
            .filter(|path| path.is_dir())
            .filter(|path| path.join(MANIFEST_DIR).exists() || path.join(COMMANDS_DIR).exists())
            .collect();
        children.sort();

        for child in children {
            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match dunce::canonicalize(&child) {
                Ok(resolved) if resolved.starts_with(root) => found.push(resolved),
                Ok(_) => found.skip(&name, child.display(), SkipReason::EscapesRoot),
                Err(_) => found.skip(&name, child.display(), SkipReason::NotFound),
            }
        }
    }
}

fn scan_registry(root: &Path, marketplace: &Marketplace, found: &mut Discovered) {
    for index in marketplace.malformed_indexes() {
        found.skip(&format!("plugins[{index}]"), "-", SkipReason::Malformed);
    }

    for entry in marketplace.entries() {
        let name = entry.display_name();
        let relative = match &entry.source {
            PluginSource::Local { path } => path,
            source @ (PluginSource::Hosted { .. } | PluginSource::Url { .. }) => {
                found.skip(name, source, SkipReason::Remote);
                continue;
            }
            PluginSource::Unrecognized => {
                found.skip(name, &entry.source, SkipReason::Unrecognized);
                continue;
            }
        };

        match resolve_local(root, relative) {
            Ok(resolved) => accept(resolved, entry, found),
            Err(reason) => found.skip(name, relative, reason),
        }
    }
}

/// Resolve a registry path against `root`, refusing anything outside it.
fn resolve_local(root: &Path, relative: &str) -> Result<PathBuf, SkipReason> {
    let joined = root.join(relative);
    let Ok(resolved) = dunce::canonicalize(&joined) else {
        // Nothing to follow, so only the spelling of the path can tell.
        return Err(if normalize_lexically(&joined).starts_with(root) {
            SkipReason::NotFound
        } else {
            SkipReason::EscapesRoot
        });
    };
    if !resolved.starts_with(root) {
        return Err(SkipReason::EscapesRoot);
    }
    if !resolved.is_dir() {
        return Err(SkipReason::NotADirectory);
    }
    Ok(resolved)
}

fn accept(resolved: PathBuf, entry: &MarketplaceEntry, found: &mut Discovered) {
    let has_manifest_dir = resolved.join(MANIFEST_DIR).exists();
    let has_content = CONTENT_DIRS.iter().any(|dir| resolved.join(dir).is_dir());

    if !(has_manifest_dir || has_content || !entry.strict) {
        found.skip(
            entry.display_name(),
            resolved.display(),
            SkipReason::NoPluginContent,
        );
        return;
    }

    if !entry.strict && !manifest_path(&resolved).exists() {
        found
            .fallback
            .entry(resolved.clone())
            .or_insert_with(|| entry.clone());
    }
    tracing::debug!(plugin = entry.display_name(), path = %resolved.display(), "registry plugin");
    found.push(resolved);
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
