use std::io::Write;
use std::path::Path;

use crate::cli::{CheckArgs, Cli};
use crate::config::{ConfigLoader, FileConfigLoader, LintConfig, LoadResult};
use crate::linter::Linter;
use crate::output::{JsonFormatter, OutputFormat, OutputFormatter, TextFormatter};
use crate::repository::{Repository, RepositoryKind};
use crate::{EXIT_CONFIG_ERROR, EXIT_LINT_FAILED, EXIT_SUCCESS, Result};

#[must_use]
pub fn run_check(args: &CheckArgs, cli: &Cli) -> i32 {
    match run_check_impl(args, cli, &mut std::io::stdout().lock()) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Lint `args.path` and write the report to `out`.
///
/// Returns the process exit code for the findings.
///
/// # Errors
/// Returns an error if configuration cannot be loaded, the repository cannot be
/// opened, a check cannot be loaded, or the report cannot be written.
pub fn run_check_impl(args: &CheckArgs, cli: &Cli, out: &mut impl Write) -> Result<i32> {
    // 1. Load configuration
    let LoadResult { mut config, source } =
        load_config(&args.path, args.config.as_deref(), args.no_config)?;
    match &source {
        Some(path) => tracing::info!(config = %path.display(), "using configuration file"),
        None => tracing::info!("using built-in configuration"),
    }

    // 2. Apply CLI argument overrides
    if args.strict {
        config.strict = true;
    }

    // 3. Open the repository and load checks
    let repository = Repository::open(&args.path, Some(&config))?;
    if repository.kind() == RepositoryKind::Unknown && !cli.quiet {
        eprintln!("Warning: Directory doesn't appear to be a plugin repository");
        eprintln!("Expected: .claude-plugin/plugin.json or a plugins/ directory");
    }
    let linter = Linter::new(repository, config)?;

    // 4. Run
    let root = linter.repository().root().to_path_buf();
    let violations: Vec<_> = linter
        .run()
        .into_iter()
        .map(|violation| violation.relative_to(&root))
        .collect();

    // 5. Report
    let report = match args.format {
        OutputFormat::Text => {
            if !cli.quiet {
                writeln!(out, "Linting plugins in: {}", root.display())?;
            }
            TextFormatter::with_verbose(cli.color.into(), cli.verbose > 0).format(&violations)?
        }
        OutputFormat::Json => JsonFormatter.format(&violations)?,
    };
    write!(out, "{report}")?;
    if !report.ends_with('\n') {
        writeln!(out)?;
    }

    Ok(if linter.is_failure(&violations) {
        EXIT_LINT_FAILED
    } else {
        EXIT_SUCCESS
    })
}

/// Resolve the configuration for `target`.
///
/// `--no-config` yields the defaults, an explicit path must exist, and otherwise
/// the configuration is discovered from `target` upward.
///
/// # Errors
/// Returns an error if the chosen configuration file cannot be read or parsed.
pub fn load_config(target: &Path, config_path: Option<&Path>, no_config: bool) -> Result<LoadResult> {
    if no_config {
        return Ok(LoadResult {
            config: LintConfig::default(),
            source: None,
        });
    }

    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(target), |path| loader.load_from_path(path))
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
