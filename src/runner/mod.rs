//! Command invocation capability
//!
//! The dispatcher only sees the `CommandRunner` trait, so the real process
//! runner and the scripted double used in tests are interchangeable.

#![allow(dead_code)]

mod process;
#[cfg(test)]
mod scripted;

use async_trait::async_trait;
use std::io;
use thiserror::Error;

use crate::models::{ExecutionContext, WorkUnit};

pub use process::ProcessRunner;
#[cfg(test)]
pub use scripted::ScriptedRunner;

/// Failure of a single invocation
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect output of '{program}': {source}")]
    Collect {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Captured output is kept for logging; the reason shows only the status
    #[error("{}", exit_status_text(.code, .signal))]
    NonZeroExit {
        code: Option<i32>,
        signal: Option<i32>,
        output: String,
    },

    /// Failure reported verbatim, used by runners that do not spawn processes
    #[error("{0}")]
    Failed(String),
}

fn exit_status_text(code: &Option<i32>, signal: &Option<i32>) -> String {
    match (*code, *signal) {
        (Some(code), _) => format!("exit status {code}"),
        (None, Some(signal)) => format!("signal: {signal}"),
        (None, None) => "terminated abnormally".to_string(),
    }
}

/// Invokes one work unit inside an execution context.
///
/// Implementations run exactly one invocation per call, with no retry.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Return the combined output on success
    async fn invoke(&self, ctx: &ExecutionContext, unit: &WorkUnit)
        -> Result<String, InvocationError>;
}
