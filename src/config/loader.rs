use std::path::{Path, PathBuf};

use crate::error::{LintError, Result};

use super::LintConfig;

/// Result of loading a configuration, containing both the config and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// The effective configuration.
    pub config: LintConfig,
    /// The file the configuration was read from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

impl LoadResult {
    fn defaults() -> Self {
        Self {
            config: LintConfig::default(),
            source: None,
        }
    }
}

/// Trait for loading configuration from various sources.
pub trait ConfigLoader {
    /// Discover and load the configuration that applies to `start`.
    ///
    /// # Errors
    /// Returns an error if a discovered config file cannot be read or parsed.
    fn load(&self, start: &Path) -> Result<LoadResult>;

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file does not exist, cannot be read, or cannot be parsed.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;
}

/// File names searched in every directory while walking upward.
pub const LOCAL_CONFIG_NAMES: &[&str] = &[".claudelint.yaml", ".claudelint.yml"];
pub const USER_CONFIG_NAME: &str = "config.yaml";

/// Trait for filesystem operations (for testability).
pub trait FileSystem {
    /// Read file contents as a string.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Get the platform-specific configuration directory for claudelint.
    ///
    /// - Windows: `%APPDATA%\claudelint`
    /// - macOS: `~/Library/Application Support/claudelint`
    /// - Linux: `~/.config/claudelint` (XDG)
    fn config_dir(&self) -> Option<PathBuf>;

    /// Canonicalize a path to its absolute, normalized form.
    ///
    /// # Errors
    /// Returns an error if the path cannot be canonicalized (e.g., it doesn't exist).
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf>;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "claudelint")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        dunce::canonicalize(path)
    }
}

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.claudelint.yaml` / `.claudelint.yml` in the target directory, then each ancestor
/// 2. `config.yaml` in the platform-specific user config directory
/// 3. Built-in defaults
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Walk from `start` to the filesystem root and return the first config file found.
    #[must_use]
    pub fn find_config(&self, start: &Path) -> Option<PathBuf> {
        let start = self
            .fs
            .canonicalize(start)
            .unwrap_or_else(|_| start.to_path_buf());

        start.ancestors().find_map(|dir| {
            LOCAL_CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| self.fs.exists(candidate))
        })
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn parse_config(content: &str, path: &Path) -> Result<LintConfig> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|source| LintError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        // An empty or comment-only document means "no overrides".
        if value.is_null() {
            return Ok(LintConfig::default());
        }

        let parsed: LintConfig =
            serde_yaml::from_value(value).map_err(|source| LintError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(LintConfig::layered(parsed))
    }

    fn read_config(&self, path: &Path) -> Result<LoadResult> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| LintError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::parse_config(&content, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(LoadResult {
            config,
            source: Some(path.to_path_buf()),
        })
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self, start: &Path) -> Result<LoadResult> {
        if let Some(local_path) = self.find_config(start) {
            return self.read_config(&local_path);
        }

        if let Some(user_path) = self.user_config_path()
            && self.fs.exists(&user_path)
        {
            return self.read_config(&user_path);
        }

        Ok(LoadResult::defaults())
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        if !self.fs.exists(path) {
            return Err(LintError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        self.read_config(path)
    }
}

#[cfg(test)]
#[path = "loader_tests/mod.rs"]
mod tests;
