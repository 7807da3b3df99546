//! Argument verification report types.
//!
//! Before a structured call reaches a handler, its arguments are checked
//! against the declaration's JSON Schema. Only a passing report lets the
//! delegation proceed.

use serde::{Deserialize, Serialize};

/// The result of checking one structured call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if no failure was collected.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn pass() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
        }
    }

    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    /// One-line summary: `[rule] message; [rule] message`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single failure within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Which check failed (e.g. "json-schema", "non-empty-query").
    pub rule_id: String,
    /// Human-readable explanation.
    pub message: String,
}
