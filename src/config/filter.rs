use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{LintError, Result};

/// Compiled `exclude` patterns. Matched against paths relative to the repository root.
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    patterns: GlobSet,
}

impl ExcludeFilter {
    /// Compile the given glob patterns.
    ///
    /// # Errors
    /// Returns an error if any pattern is invalid.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| LintError::InvalidPattern {
                pattern: pattern.clone(),
                source: e,
            })?;
            builder.add(glob);
        }
        let patterns = builder.build().map_err(|e| LintError::InvalidPattern {
            pattern: "combined patterns".to_string(),
            source: e,
        })?;

        Ok(Self { patterns })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: GlobSet::empty(),
        }
    }

    #[must_use]
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.patterns.is_match(relative_path)
    }
}

impl Default for ExcludeFilter {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
