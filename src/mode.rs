use serde::Deserialize;

use crate::error::Result;
use crate::vocabulary::Vocabulary;

/// Mode holds all runtime configuration for sqlpretty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mode {
    /// Report files that would change without writing them.
    #[serde(default)]
    pub check: bool,

    /// Print a diff instead of writing changes.
    #[serde(default)]
    pub diff: bool,

    /// Skip the post-format equivalence check.
    #[serde(default)]
    pub fast: bool,

    /// Emit highlight markup instead of reformatting.
    #[serde(default)]
    pub highlight: bool,

    /// Glob patterns to exclude while collecting files.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extra vocabulary keywords (dialect extensions).
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Extra major keywords: added to the vocabulary and given
    /// line-breaking behavior.
    #[serde(default)]
    pub major_keywords: Vec<String>,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[serde(default)]
    pub threads: usize,

    #[serde(default)]
    pub single_process: bool,
}

impl Mode {
    /// Build the immutable keyword vocabulary for this configuration.
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        if self.keywords.is_empty() && self.major_keywords.is_empty() {
            Ok(Vocabulary::new())
        } else {
            Vocabulary::with_extensions(&self.keywords, &self.major_keywords)
        }
    }

    /// Whether the formatted output should be re-checked against the source.
    pub fn should_equivalence_check(&self) -> bool {
        !self.fast && !self.check && !self.diff
    }

    /// File extensions treated as SQL.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let mode = Mode::default();
        assert!(!mode.check);
        assert!(!mode.diff);
        assert!(!mode.highlight);
        assert!(mode.should_equivalence_check());
    }

    #[test]
    fn test_equivalence_check_skipped() {
        let mode = Mode {
            fast: true,
            ..Mode::default()
        };
        assert!(!mode.should_equivalence_check());

        let mode = Mode {
            check: true,
            ..Mode::default()
        };
        assert!(!mode.should_equivalence_check());
    }

    #[test]
    fn test_vocabulary_with_extensions() {
        let mode = Mode {
            keywords: vec!["QUALIFY".to_string()],
            ..Mode::default()
        };
        assert!(mode.vocabulary().is_ok());

        let mode = Mode {
            keywords: vec!["not a keyword!".to_string()],
            ..Mode::default()
        };
        assert!(mode.vocabulary().is_err());
    }
}
