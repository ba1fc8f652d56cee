use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::{ColorMode, OutputFormat};

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "claudelint")]
#[command(author, version, about = "Lint plugin repositories and marketplaces for structure and format compliance")]
#[command(long_about = "Validates plugin manifests, marketplace registries, commands, skills, \
    agents, hooks and MCP server declarations.\n\n\
    Exit codes:\n  \
    0 - All checks passed\n  \
    1 - Errors found (or warnings with --strict)\n  \
    2 - Configuration or load error")]
pub struct Cli {
    /// Increase output verbosity (-v shows info findings, -vv adds debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint a plugin or marketplace repository
    Check(CheckArgs),

    /// Write a default configuration file
    Init(InitArgs),

    /// List the built-in rules
    Rules,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Repository to lint
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to configuration file (default: auto-discover)
    #[arg(short, long, conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Skip loading configuration files and use the defaults
    #[arg(long)]
    pub no_config: bool,

    /// Treat warnings as failures (exit code 1)
    #[arg(long)]
    pub strict: bool,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Directory to write `.claudelint.yaml` into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
