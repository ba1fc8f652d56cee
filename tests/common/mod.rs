#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the claudelint binary.
#[macro_export]
macro_rules! claudelint {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("claudelint"))
    };
}

/// A temporary repository for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    /// Creates a new test fixture with an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Creates a directory in the temp directory.
    pub fn create_dir(&self, relative_path: &str) {
        fs::create_dir_all(self.dir.path().join(relative_path)).expect("Failed to create directory");
    }

    /// Returns the path to the temp directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }

    /// Writes `.claudelint.yaml` at the repository root.
    pub fn create_config(&self, content: &str) {
        self.create_file(".claudelint.yaml", content);
    }

    /// A plugin manifest with every required field.
    pub fn create_manifest(&self, plugin_dir: &str, name: &str) {
        self.create_file(
            &under(plugin_dir, ".claude-plugin/plugin.json"),
            &format!(
                r#"{{"name": "{name}", "description": "The {name} plugin", "version": "1.0.0", "author": {{"name": "Tester"}}}}"#
            ),
        );
    }

    /// A command file that satisfies every command rule.
    pub fn create_command(&self, plugin_dir: &str, plugin: &str, command: &str) {
        self.create_file(
            &under(plugin_dir, &format!("commands/{command}.md")),
            &format!(
                "---\ndescription: Run {command}\n---\n\n## Name\n\n{plugin}:{command}\n\n## Synopsis\n\n```\n/{plugin}:{command}\n```\n\n## Description\n\nRuns {command}.\n\n## Implementation\n\nDoes the work.\n"
            ),
        );
    }

    /// A single plugin at the root that passes every default rule.
    pub fn create_clean_plugin(&self, name: &str) {
        self.create_manifest("", name);
        self.create_command("", name, "run");
        self.create_file("README.md", &format!("# {name}\n"));
    }

    pub fn create_registry(&self, json: &str) {
        self.create_file(".claude-plugin/marketplace.json", json);
    }

    /// A command running in this repository with the user config directory isolated.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = claudelint!();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.join(".xdg"))
            .env("HOME", self.path())
            .env_remove("CLAUDELINT_LOG")
            .env_remove("NO_COLOR");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn under(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else {
        format!("{base}/{rest}")
    }
}

/// Path to a WebAssembly unit under `tests/fixtures`.
pub fn fixture_unit(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
