use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid severity '{value}' for rule '{rule_id}' (expected error, warning or info)")]
    InvalidSeverity { rule_id: String, value: String },

    #[error("Invalid exclude pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Repository path not found: {0}")]
    RepositoryNotFound(PathBuf),

    #[error("Custom rule file not found: {0}")]
    CustomRuleNotFound(PathBuf),

    #[error("Failed to load custom rule {path}: {message}")]
    CustomRuleLoad { path: PathBuf, message: String },

    #[error("Custom rule {0} requires the `wasm` feature")]
    CustomRulesUnsupported(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl LintError {
    /// Stable variant name, used by JSON diagnostics and tests.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::FileAccess { .. } => "FileAccess",
            Self::YamlParse { .. } => "YamlParse",
            Self::InvalidSeverity { .. } => "InvalidSeverity",
            Self::InvalidPattern { .. } => "InvalidPattern",
            Self::RepositoryNotFound(_) => "RepositoryNotFound",
            Self::CustomRuleNotFound(_) => "CustomRuleNotFound",
            Self::CustomRuleLoad { .. } => "CustomRuleLoad",
            Self::CustomRulesUnsupported(_) => "CustomRulesUnsupported",
            Self::Io(_) => "Io",
            Self::JsonSerialize(_) => "JsonSerialize",
        }
    }
}

pub type Result<T> = std::result::Result<T, LintError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
