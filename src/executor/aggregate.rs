//! Result aggregation
//!
//! Drains a closed result channel into an output sink.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::io::Write;
use tokio::sync::mpsc;

use crate::models::ResultMessage;

/// Counts of what was forwarded to the sink
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub messages: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Forwards result messages, unmodified and in arrival order
pub struct Aggregator;

impl Aggregator {
    /// Write every message until the channel is closed and empty
    pub async fn drain<W: Write>(
        mut results_rx: mpsc::Receiver<ResultMessage>,
        sink: &mut W,
    ) -> Result<DrainSummary> {
        let mut summary = DrainSummary::default();

        while let Some(message) = results_rx.recv().await {
            sink.write_all(message.text().as_bytes())
                .with_context(|| format!("Failed to write result for '{}'", message.work_unit()))?;

            summary.messages += 1;
            if message.outcome().is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        sink.flush().context("Failed to flush results")?;
        Ok(summary)
    }
}
