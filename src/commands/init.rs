use std::fs;
use std::path::PathBuf;

use crate::cli::InitArgs;
use crate::config::{LOCAL_CONFIG_NAMES, LintConfig};
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, LintError, Result};

#[must_use]
pub fn run_init(args: &InitArgs) -> i32 {
    match run_init_impl(args) {
        Ok(path) => {
            println!("Created configuration file: {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Write the default configuration into `args.path`.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<PathBuf> {
    if !args.path.is_dir() {
        return Err(LintError::RepositoryNotFound(args.path.clone()));
    }

    let output_path = args.path.join(LOCAL_CONFIG_NAMES[0]);
    if output_path.exists() && !args.force {
        return Err(LintError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            output_path.display()
        )));
    }

    fs::write(&output_path, generate_config_template()?)?;
    Ok(output_path)
}

/// The default configuration as a commented YAML document.
///
/// # Errors
/// Returns an error if the defaults cannot be serialized.
pub fn generate_config_template() -> Result<String> {
    let body = LintConfig::default().to_yaml()?;
    Ok(format!(
        "# claudelint configuration\n\
         #\n\
         # enabled: true, false, or auto (auto runs only in marketplace repositories)\n\
         # severity: error, warning, or info\n\
         # custom-rules: paths to WebAssembly check units, relative to the repository root\n\
         # exclude: glob patterns, relative to the repository root\n\
         \n{body}"
    ))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
