use std::io::Write;

use crate::checker::builtin::BUILTIN_RULES;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result};

#[must_use]
pub fn run_rules() -> i32 {
    match write_rules(&mut std::io::stdout().lock()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// List every built-in rule with its description and defaults.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_rules(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Available builtin rules:\n")?;
    for rule in BUILTIN_RULES {
        writeln!(out, "  {}", rule.rule_id)?;
        writeln!(out, "    {}", rule.description)?;
        writeln!(out, "    Default severity: {}", rule.default_severity)?;
        writeln!(out, "    Enabled by default: {}", rule.default_enabled)?;
        writeln!(out)?;
    }
    Ok(())
}
