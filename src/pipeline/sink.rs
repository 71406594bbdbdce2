use crate::output::CsvSink;
use crate::pipeline::WorkTracker;
use crate::state::Resource;
use crate::CheckerError;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What the sink task hands back when it stops
pub struct SinkReport<W: Write> {
    pub sink: CsvSink<W>,
    pub write_failures: u64,
}

/// Single consumer of the result queue
///
/// Writes every result, then marks its task complete even if the write
/// failed, so the drain barrier always releases. Stops when the queue closes
/// or immediately on shutdown, flushing in both cases.
pub async fn run_sink<W: Write>(
    mut sink: CsvSink<W>,
    mut results: mpsc::Receiver<Resource>,
    tracker: Arc<WorkTracker>,
    shutdown: CancellationToken,
) -> Result<SinkReport<W>, CheckerError> {
    let mut write_failures = 0;

    loop {
        let resource = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::debug!("Sink stopping on shutdown with {} task(s) in flight", tracker.outstanding());
                break;
            }
            received = results.recv() => match received {
                Some(resource) => resource,
                None => break,
            },
        };

        if let Err(e) = sink.write(&resource) {
            tracing::error!("Failed to write result for {}: {}", resource.url, e);
            write_failures += 1;
        } else if resource.is_failure() {
            tracing::debug!(
                "{}: {}",
                resource.url,
                resource.error.as_ref().map(ToString::to_string).unwrap_or_default()
            );
        }

        tracker.complete();
    }

    sink.flush()?;

    Ok(SinkReport {
        sink,
        write_failures,
    })
}
