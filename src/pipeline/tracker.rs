use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Outstanding-work counter used as a drain barrier
///
/// The dispatcher registers every task before enqueueing it, the sink
/// completes it after writing. [`WorkTracker::wait_idle`] resolves once the
/// count is back to zero.
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more outstanding task
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
    }

    /// Marks one task complete, waking waiters when none remain
    pub fn complete(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "complete() called without register()");
        if previous == 1 {
            self.idle.notify_waiters();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Waits until every registered task has completed
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a completion in between is not missed
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            notified.await;
        }
    }
}
