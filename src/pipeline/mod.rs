//! Concurrent checking pipeline
//!
//! URL source → dispatch loop → task queue → worker pool → result queue → sink.
//!
//! Both queues hold at most one item, so a slow sink blocks the workers,
//! which in turn block the dispatcher. A [`CancellationToken`] stops the run
//! early: dispatch halts, the sink flushes what it has, and in-flight work
//! is abandoned.

mod dispatcher;
mod shutdown;
mod sink;
mod tracker;
mod worker;

pub use dispatcher::{dispatch, DispatchStats};
pub use shutdown::spawn_signal_watcher;
pub use sink::{run_sink, SinkReport};
pub use tracker::WorkTracker;
pub use worker::{run_worker, SharedTaskReceiver};

use crate::output::CsvSink;
use crate::requester::Requester;
use crate::state::Resource;
use crate::url::IgnoreRules;
use crate::CheckerError;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Capacity of both queues; the smallest tokio allows
const QUEUE_CAPACITY: usize = 1;

/// Input unit: one URL to check, immutable once enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTask {
    pub url: String,
}

/// Totals of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines consumed from the source
    pub read: u64,
    pub dispatched: u64,
    pub ignored: u64,
    /// Rows written by the sink
    pub written: u64,
    pub write_failures: u64,
    /// The run was cut short by a shutdown request
    pub interrupted: bool,
    pub elapsed: Duration,
}

/// Result of [`Pipeline::run`]: totals plus the flushed sink
pub struct PipelineOutcome<W: Write> {
    pub summary: RunSummary,
    pub sink: CsvSink<W>,
}

/// Fixed-size worker pool wired to a single sink
pub struct Pipeline {
    requester: Arc<Requester>,
    workers: usize,
    ignore: Option<IgnoreRules>,
}

impl Pipeline {
    /// Creates a pipeline with `workers` concurrent workers (at least one)
    pub fn new(requester: Requester, workers: usize) -> Self {
        Self {
            requester: Arc::new(requester),
            workers: workers.max(1),
            ignore: None,
        }
    }

    /// Skips URLs matching any of the given rules
    pub fn with_ignore_rules(mut self, rules: IgnoreRules) -> Self {
        self.ignore = Some(rules);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Checks every URL of `source` and writes one row per dispatched URL
    ///
    /// Returns once every dispatched task has been written, or as soon as
    /// `shutdown` trips. In the latter case the sink is flushed and returned
    /// with whatever it had written; tasks still in flight are dropped.
    ///
    /// # Arguments
    ///
    /// * `source` - Line-oriented URL source
    /// * `sink` - The CSV sink; its header is already written
    /// * `shutdown` - Cancellation token, typically tripped by a signal watcher
    ///
    /// # Returns
    ///
    /// * `Ok(PipelineOutcome)` - Totals and the flushed sink
    /// * `Err(CheckerError)` - Reading the source, flushing, or a task failed
    pub async fn run<R, W>(
        &self,
        source: R,
        sink: CsvSink<W>,
        shutdown: CancellationToken,
    ) -> Result<PipelineOutcome<W>, CheckerError>
    where
        R: AsyncBufRead + Unpin,
        W: Write + Send + 'static,
    {
        let started = Instant::now();
        // A failed dispatch stops the sink without cancelling the caller's token
        let stop = shutdown.child_token();
        let tracker = Arc::new(WorkTracker::new());

        let (task_tx, task_rx) = mpsc::channel::<UrlTask>(QUEUE_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel::<Resource>(QUEUE_CAPACITY);
        let task_rx: SharedTaskReceiver = Arc::new(Mutex::new(task_rx));

        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            workers.spawn(run_worker(
                id,
                Arc::clone(&self.requester),
                Arc::clone(&task_rx),
                result_tx.clone(),
            ));
        }
        // The sink sees end-of-queue once the last worker drops its sender
        drop(result_tx);

        let sink_handle = tokio::spawn(run_sink(
            sink,
            result_rx,
            Arc::clone(&tracker),
            stop.clone(),
        ));

        tracing::info!("Started {} worker(s)", self.workers);

        let stats = match dispatch(source, self.ignore.as_ref(), task_tx, &tracker, &stop).await {
            Ok(stats) => stats,
            Err(e) => {
                stop.cancel();
                workers.abort_all();
                // Keep whatever was written before the failure
                let _ = sink_handle.await;
                return Err(e);
            }
        };

        let mut interrupted = stats.interrupted;
        if !interrupted {
            tokio::select! {
                _ = tracker.wait_idle() => {}
                _ = stop.cancelled() => interrupted = true,
            }
        }

        if interrupted {
            tracing::warn!(
                "Run interrupted with {} task(s) in flight; their results are lost",
                tracker.outstanding()
            );
            stop.cancel();
            workers.abort_all();
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(e.into()),
            }
        }

        let report = sink_handle.await??;

        let summary = RunSummary {
            read: stats.read,
            dispatched: stats.dispatched,
            ignored: stats.ignored,
            written: report.sink.written(),
            write_failures: report.write_failures,
            interrupted,
            elapsed: started.elapsed(),
        };

        Ok(PipelineOutcome {
            summary,
            sink: report.sink,
        })
    }
}
