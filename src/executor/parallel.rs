//! Parallel dispatch of work units
//!
//! Every work unit gets its own task. Results land in a channel sized to hold
//! all of them, which is handed back only after every task has reported.

#![allow(dead_code)]

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::tracker::{CompletionTracker, TaskGuard};
use crate::models::{ExecutionContext, Outcome, ResultMessage, WorkUnit};
use crate::runner::CommandRunner;

/// Launches one concurrent invocation per work unit
#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn CommandRunner>,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run every unit concurrently and return the filled, closed result
    /// channel. It yields exactly one message per unit, in completion order.
    pub async fn dispatch(
        &self,
        ctx: &ExecutionContext,
        units: Vec<WorkUnit>,
    ) -> mpsc::Receiver<ResultMessage> {
        let (results_tx, results_rx) = mpsc::channel(units.len().max(1));
        let (tracker, guards) = CompletionTracker::with_tasks(units.len());

        debug!("Dispatching {} work units in {}", units.len(), ctx);

        let mut handles = Vec::with_capacity(units.len());

        for (unit, guard) in units.into_iter().zip(guards) {
            let runner = Arc::clone(&self.runner);
            let ctx = ctx.clone();
            let results_tx = results_tx.clone();

            handles.push(tokio::spawn(run_unit(runner, ctx, unit, results_tx, guard)));
        }

        tracker.wait().await;
        drop(results_tx);

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("Work unit task did not finish cleanly: {}", e);
            }
        }

        results_rx
    }

    /// Run every unit concurrently and collect the messages
    pub async fn dispatch_collect(
        &self,
        ctx: &ExecutionContext,
        units: Vec<WorkUnit>,
    ) -> Vec<ResultMessage> {
        let mut results_rx = self.dispatch(ctx, units).await;
        let mut messages = Vec::new();

        while let Some(message) = results_rx.recv().await {
            messages.push(message);
        }

        messages
    }
}

/// Body of one dispatched task
async fn run_unit(
    runner: Arc<dyn CommandRunner>,
    ctx: ExecutionContext,
    unit: WorkUnit,
    results_tx: mpsc::Sender<ResultMessage>,
    _done: TaskGuard,
) {
    let start = Instant::now();
    let outcome = Outcome::from_result(runner.invoke(&ctx, &unit).await);

    debug!(
        "'{}' finished in {}ms (success: {})",
        unit,
        start.elapsed().as_millis(),
        outcome.is_success()
    );

    // `_done` is released when this returns, whether or not the send worked.
    if let Err(e) = results_tx.send(ResultMessage::new(unit, outcome)).await {
        warn!("Dropped result for '{}': channel closed", e.0.work_unit());
    }
}
