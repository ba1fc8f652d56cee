use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::checker::{Check, CheckError, Violation};
use crate::repository::{Repository, manifest_path};

const MCP_FILE: &str = ".mcp.json";

/// Where a plugin can declare MCP servers.
enum McpSource {
    /// A standalone `.mcp.json` at the plugin root.
    File(PathBuf),
    /// The `mcpServers` key of the manifest.
    Manifest(PathBuf),
}

impl McpSource {
    fn of(plugin: &Path) -> Vec<Self> {
        let mut sources = Vec::new();
        let file = plugin.join(MCP_FILE);
        if file.exists() {
            sources.push(Self::File(file));
        }
        let manifest = manifest_path(plugin);
        if manifest.exists() {
            sources.push(Self::Manifest(manifest));
        }
        sources
    }

    fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Manifest(path) => path,
        }
    }

    fn read(&self) -> Result<Value, String> {
        let content = std::fs::read_to_string(self.path())
            .map_err(|e| format!("Failed to read file: {e}"))?;
        serde_json::from_str(&content).map_err(|e| format!("Invalid JSON: {e}"))
    }
}

builtin_check!(
    McpValidJson,
    "mcp-valid-json",
    "MCP configuration must be valid JSON with proper mcpServers structure",
    Error,
    On
);

impl McpValidJson {
    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let mut violations = Vec::new();
        for plugin in repository.plugins() {
            for source in McpSource::of(plugin) {
                if self.excluded(repository, source.path()) {
                    continue;
                }
                let problems = match (&source, source.read()) {
                    (McpSource::File(_), Ok(data)) => validate_structure(&data),
                    (McpSource::File(_), Err(message)) => vec![message],
                    // Manifest problems belong to plugin-json-valid.
                    (McpSource::Manifest(_), Ok(data)) => match data.get("mcpServers") {
                        Some(servers) => validate_servers(servers),
                        None => Vec::new(),
                    },
                    (McpSource::Manifest(_), Err(_)) => Vec::new(),
                };
                violations.extend(
                    problems
                        .into_iter()
                        .map(|message| self.violation(message).at(source.path())),
                );
            }
        }
        Ok(violations)
    }
}

fn validate_structure(data: &Value) -> Vec<String> {
    let Value::Object(data) = data else {
        return vec!["MCP configuration must be a JSON object".to_string()];
    };
    data.get("mcpServers").map_or_else(
        || vec!["MCP configuration must contain 'mcpServers' key".to_string()],
        validate_servers,
    )
}

fn validate_servers(servers: &Value) -> Vec<String> {
    let Value::Object(servers) = servers else {
        return vec!["'mcpServers' must be a JSON object".to_string()];
    };

    let mut problems = Vec::new();
    for (name, server) in servers {
        let Value::Object(server) = server else {
            problems.push(format!("MCP server '{name}' configuration must be an object"));
            continue;
        };
        if !server.contains_key("command") {
            problems.push(format!("MCP server '{name}' must have a 'command' field"));
        }
        if server.get("args").is_some_and(|v| !v.is_array()) {
            problems.push(format!("MCP server '{name}' 'args' must be an array"));
        }
        if server.get("env").is_some_and(|v| !v.is_object()) {
            problems.push(format!("MCP server '{name}' 'env' must be an object"));
        }
        if server.get("cwd").is_some_and(|v| !v.is_string()) {
            problems.push(format!("MCP server '{name}' 'cwd' must be a string"));
        }
    }
    problems
}

builtin_check!(
    McpProhibited,
    "mcp-prohibited",
    "Plugins should not enable non-allowlisted MCP servers",
    Error,
    On
);

impl McpProhibited {
    fn allowlist(&self) -> Vec<String> {
        self.settings
            .options
            .string_list("allowlist")
            .unwrap_or_default()
    }

    fn inspect(&self, repository: &Repository) -> Result<Vec<Violation>, CheckError> {
        let allowlist = self.allowlist();
        let mut violations = Vec::new();

        for plugin in repository.plugins() {
            for source in McpSource::of(plugin) {
                if self.excluded(repository, source.path()) {
                    continue;
                }
                let Ok(Value::Object(data)) = source.read() else {
                    continue;
                };
                let Some(Value::Object(servers)) = data.get("mcpServers") else {
                    continue;
                };
                let prohibited = prohibited_servers(servers, &allowlist);
                if prohibited.is_empty() {
                    continue;
                }

                let message = if allowlist.is_empty() {
                    let file = match source {
                        McpSource::File(_) => MCP_FILE,
                        McpSource::Manifest(_) => "plugin.json",
                    };
                    format!("Plugin defines MCP servers in {file}")
                } else {
                    format!(
                        "Plugin defines non-allowlisted MCP servers: {}",
                        prohibited.join(", ")
                    )
                };
                violations.push(self.violation(message).at(source.path()));
            }
        }
        Ok(violations)
    }
}

/// Server names not on the allowlist, sorted. Everything is prohibited when the list is empty.
fn prohibited_servers(servers: &Map<String, Value>, allowlist: &[String]) -> Vec<String> {
    let mut names: Vec<String> = servers
        .keys()
        .filter(|name| !allowlist.contains(name))
        .cloned()
        .collect();
    names.sort();
    names
}
