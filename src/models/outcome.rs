//! Outcome and result message models
//!
//! A `ResultMessage` is the single line reported for one work unit.

#![allow(dead_code)]

use std::fmt;

use super::WorkUnit;

/// Result of invoking one work unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success { output: String },
    Failure { reason: String },
}

impl Outcome {
    pub fn success(output: impl Into<String>) -> Self {
        Outcome::Success {
            output: output.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Outcome::Failure {
            reason: reason.into(),
        }
    }

    /// Convert a runner result, keeping only the error's display text
    pub fn from_result<E: fmt::Display>(result: Result<String, E>) -> Self {
        match result {
            Ok(output) => Outcome::Success { output },
            Err(e) => Outcome::Failure {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Formatted report line for exactly one work unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultMessage {
    unit: WorkUnit,
    outcome: Outcome,
}

impl ResultMessage {
    pub fn new(unit: WorkUnit, outcome: Outcome) -> Self {
        Self { unit, outcome }
    }

    pub fn work_unit(&self) -> &WorkUnit {
        &self.unit
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The newline-terminated line written to the output sink
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success { output } => writeln!(f, "Output of '{}': {}", self.unit, output),
            Outcome::Failure { reason } => writeln!(f, "Error running '{}': {}", self.unit, reason),
        }
    }
}
