use crate::pipeline::{UrlTask, WorkTracker};
use crate::url::IgnoreRules;
use crate::CheckerError;
use std::borrow::Cow;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lines between two progress log entries
const PROGRESS_EVERY: u64 = 100;

/// Counters kept by the dispatch loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Lines consumed from the source (progress accounting)
    pub read: u64,
    /// Tasks handed to the worker pool
    pub dispatched: u64,
    /// URLs skipped by an ignore pattern
    pub ignored: u64,
    /// Dispatch stopped because of a shutdown request
    pub interrupted: bool,
}

/// Feeds URLs from `source` into the task queue
///
/// Blank lines are skipped. Lines that are not valid UTF-8 are decoded lossily
/// and dispatched like any other. URLs matching `ignore` are counted but never
/// dispatched. Each dispatched task is registered with `tracker` before it is
/// sent. Returns when the source is exhausted or `shutdown` trips; the task
/// queue closes when this function returns.
pub async fn dispatch<R>(
    mut source: R,
    ignore: Option<&IgnoreRules>,
    tasks: mpsc::Sender<UrlTask>,
    tracker: &WorkTracker,
    shutdown: &CancellationToken,
) -> Result<DispatchStats, CheckerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = DispatchStats::default();
    let mut buffer = Vec::new();
    let started = Instant::now();

    loop {
        buffer.clear();
        let bytes = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                stats.interrupted = true;
                break;
            }
            bytes = source.read_until(b'\n', &mut buffer) => bytes?,
        };

        if bytes == 0 {
            break;
        }

        stats.read += 1;
        if stats.read % PROGRESS_EVERY == 0 {
            report_progress(&stats, tracker, started);
        }

        let line = String::from_utf8_lossy(&buffer);
        if let Cow::Owned(_) = line {
            tracing::warn!(
                "Line {} is not valid UTF-8, checking it as {}",
                stats.read,
                line.trim()
            );
        }

        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        if ignore.map_or(false, |rules| rules.is_match(url)) {
            tracing::debug!("Ignoring {}", url);
            stats.ignored += 1;
            continue;
        }

        tracker.register();
        let task = UrlTask {
            url: url.to_string(),
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                stats.interrupted = true;
                break;
            }
            sent = tasks.send(task) => {
                if sent.is_err() {
                    tracker.complete();
                    return Err(CheckerError::WorkersStopped);
                }
            }
        }

        stats.dispatched += 1;
    }

    tracing::info!(
        "Dispatch finished: {} line(s) read, {} dispatched, {} ignored",
        stats.read,
        stats.dispatched,
        stats.ignored
    );

    Ok(stats)
}

fn report_progress(stats: &DispatchStats, tracker: &WorkTracker, started: Instant) {
    let rate = stats.read as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
    tracing::info!(
        "Progress: {} URLs read, {} dispatched, {} ignored, {} in flight, {:.2} URLs/sec",
        stats.read,
        stats.dispatched,
        stats.ignored,
        tracker.outstanding(),
        rate
    );
}
