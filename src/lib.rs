pub mod checker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod linter;
pub mod logging;
pub mod output;
pub mod repository;

#[cfg(test)]
mod test_fixtures;

pub use error::{LintError, Result};
pub use linter::Linter;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_LINT_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
