//! Verification outcome and its human-readable report

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Outcome of comparing the extracted model against raw text counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    /// True when no errors were recorded; warnings never fail verification.
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Model counts in a fixed key order
    pub statistics: IndexMap<String, usize>,
}

impl VerificationResult {
    pub fn new(errors: Vec<String>, warnings: Vec<String>, statistics: IndexMap<String, usize>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
            warnings,
            statistics,
        }
    }

    /// Serialize the result as pretty-printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "SCHEMA VERIFICATION REPORT")?;
        writeln!(f, "{}", rule)?;

        writeln!(f, "\nStatistics:")?;
        for (key, value) in &self.statistics {
            writeln!(f, "   {:20}: {}", key, value)?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "\nErrors ({}):", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "   - {}", error)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings ({}):", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "   - {}", warning)?;
            }
        }

        if self.passed {
            writeln!(f, "\nVERIFICATION PASSED - schema conversion is complete")?;
        } else {
            writeln!(f, "\nVERIFICATION FAILED - schema conversion has errors")?;
        }

        write!(f, "{}", rule)
    }
}
