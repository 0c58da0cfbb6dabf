//! Completion tracking for dispatched tasks
//!
//! A countdown latch: created with a fixed number of task guards, released
//! once every guard has been dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
struct Latch {
    remaining: AtomicUsize,
    notify: Notify,
}

/// Waits until every issued `TaskGuard` has been dropped
#[derive(Clone, Debug)]
pub struct CompletionTracker {
    latch: Arc<Latch>,
}

/// Marks one task as finished when dropped
#[derive(Debug)]
pub struct TaskGuard {
    latch: Arc<Latch>,
}

impl CompletionTracker {
    /// Create a tracker expecting `count` tasks, with one guard per task
    pub fn with_tasks(count: usize) -> (Self, Vec<TaskGuard>) {
        let latch = Arc::new(Latch {
            remaining: AtomicUsize::new(count),
            notify: Notify::new(),
        });

        let guards = (0..count)
            .map(|_| TaskGuard {
                latch: Arc::clone(&latch),
            })
            .collect();

        (Self { latch }, guards)
    }

    /// Number of tasks that have not finished yet
    pub fn outstanding(&self) -> usize {
        self.latch.remaining.load(Ordering::Acquire)
    }

    /// Resolve once the outstanding count reaches zero
    pub async fn wait(&self) {
        loop {
            let notified = self.latch.notify.notified();
            tokio::pin!(notified);
            // Register before checking so the final decrement cannot slip
            // between the check and the await.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.latch.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.latch.notify.notify_waiters();
        }
    }
}
