//! Shared fixtures for unit tests: on-disk plugin trees and log capture.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

/// A temporary repository tree.
pub struct TreeFixture {
    pub dir: TempDir,
}

impl TreeFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the tree, canonicalized so it compares equal to discovered paths.
    pub fn root(&self) -> PathBuf {
        dunce::canonicalize(self.dir.path()).unwrap()
    }

    pub fn file(&self, relative: &str, content: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn dir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.dir.path().join(relative)).unwrap();
        self
    }

    /// A manifest with every required field.
    pub fn manifest(&self, plugin_dir: &str, name: &str) -> &Self {
        let content = format!(
            r#"{{"name": "{name}", "description": "The {name} plugin", "version": "1.0.0", "author": {{"name": "Tester"}}}}"#
        );
        self.file(&join(plugin_dir, ".claude-plugin/plugin.json"), &content)
    }

    /// A command file that satisfies every command rule for `plugin:command`.
    pub fn command(&self, plugin_dir: &str, plugin: &str, command: &str) -> &Self {
        let content = format!(
            "---\ndescription: Run {command}\n---\n\n## Name\n\n{plugin}:{command}\n\n## Synopsis\n\n```\n/{plugin}:{command}\n```\n\n## Description\n\nRuns {command}.\n\n## Implementation\n\nDoes the work.\n"
        );
        self.file(&join(plugin_dir, &format!("commands/{command}.md")), &content)
    }

    pub fn registry(&self, json: &str) -> &Self {
        self.file(".claude-plugin/marketplace.json", json)
    }
}

fn join(base: &str, rest: &str) -> String {
    if base.is_empty() || base == "." {
        rest.to_string()
    } else {
        format!("{base}/{rest}")
    }
}

pub fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records every event at debug level and above.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
