//! A single fan-out run
//!
//! Owns the work units and context for one invocation of the tool.

#![allow(dead_code)]

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use super::{Aggregator, Dispatcher};
use crate::models::{ExecutionContext, WorkUnit};
use crate::runner::CommandRunner;
use crate::utils::Timer;

/// Summary of a finished run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

/// Work units plus the context they run in
#[derive(Clone, Debug)]
pub struct RunSession {
    ctx: ExecutionContext,
    units: Vec<WorkUnit>,
}

impl RunSession {
    pub fn new(ctx: ExecutionContext, units: Vec<WorkUnit>) -> Self {
        Self { ctx, units }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    pub fn units(&self) -> &[WorkUnit] {
        &self.units
    }

    /// Dispatch every unit, then write all results to `sink`
    pub async fn run<W: Write>(
        self,
        runner: Arc<dyn CommandRunner>,
        sink: &mut W,
    ) -> Result<RunReport> {
        let timer = Timer::start("run");
        let total = self.units.len();

        info!("Running {} commands in {}", total, self.ctx);

        let results_rx = Dispatcher::new(runner).dispatch(&self.ctx, self.units).await;
        let drained = Aggregator::drain(results_rx, sink).await?;

        let report = RunReport {
            total,
            succeeded: drained.succeeded,
            failed: drained.failed,
            elapsed_ms: timer.stop().as_millis() as u64,
        };

        info!(
            "Run completed in {}ms - Succeeded: {}/{}, Failed: {}",
            report.elapsed_ms, report.succeeded, report.total, report.failed
        );

        Ok(report)
    }
}
