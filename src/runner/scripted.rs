//! Deterministic runner double
//!
//! Answers from a fixed table keyed by work unit and never spawns anything.

use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CommandRunner, InvocationError};
use crate::models::{ExecutionContext, WorkUnit};

/// Scripted runner for dispatcher tests.
///
/// Unknown units succeed with `executed <unit> in <root>`, except `fail`,
/// which fails with `command failed`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<OsString, Result<String, String>>,
    delays: HashMap<OsString, Duration>,
    calls: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(mut self, unit: &str, output: impl Into<String>) -> Self {
        self.responses.insert(unit.into(), Ok(output.into()));
        self
    }

    pub fn fail(mut self, unit: &str, reason: impl Into<String>) -> Self {
        self.responses.insert(unit.into(), Err(reason.into()));
        self
    }

    /// Hold the invocation of `unit` for `delay` before answering
    pub fn delay(mut self, unit: &str, delay: Duration) -> Self {
        self.delays.insert(unit.into(), delay);
        self
    }

    /// Number of invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn invoke(
        &self,
        ctx: &ExecutionContext,
        unit: &WorkUnit,
    ) -> Result<String, InvocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(unit.as_os_str()) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(unit.as_os_str()) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(InvocationError::Failed(reason.clone())),
            None if unit.as_os_str() == "fail" => {
                Err(InvocationError::Failed("command failed".to_string()))
            }
            None => Ok(format!("executed {} in {}", unit, ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_responses() {
        let runner = ScriptedRunner::new();
        let ctx = ExecutionContext::new("/fake-path");

        let ok = runner.invoke(&ctx, &WorkUnit::from("migrate")).await.unwrap();
        assert_eq!(ok, "executed migrate in /fake-path");

        let err = runner.invoke(&ctx, &WorkUnit::from("fail")).await.unwrap_err();
        assert_eq!(err.to_string(), "command failed");
        assert_eq!(runner.calls(), 2);
    }

    #[tokio::test]
    async fn test_scripted_responses() {
        let runner = ScriptedRunner::new()
            .succeed("fail", "not a failure here")
            .fail("migrate", "database locked");
        let ctx = ExecutionContext::new("/fake-path");

        assert_eq!(
            runner.invoke(&ctx, &WorkUnit::from("fail")).await.unwrap(),
            "not a failure here"
        );
        assert_eq!(
            runner
                .invoke(&ctx, &WorkUnit::from("migrate"))
                .await
                .unwrap_err()
                .to_string(),
            "database locked"
        );
    }
}
