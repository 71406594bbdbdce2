use crate::pipeline::UrlTask;
use crate::requester::Requester;
use crate::state::Resource;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Input queue end shared by every worker
pub type SharedTaskReceiver = Arc<Mutex<mpsc::Receiver<UrlTask>>>;

/// Worker loop: take a task, check it, hand the result to the sink
///
/// Exits when the input queue is closed and drained, or when the sink is gone.
/// Every task received produces exactly one result sent.
pub async fn run_worker(
    id: usize,
    requester: Arc<Requester>,
    tasks: SharedTaskReceiver,
    results: mpsc::Sender<Resource>,
) {
    tracing::debug!("Worker {} started", id);

    loop {
        // Lock only for the receive; the check runs unlocked
        let task = {
            let mut receiver = tasks.lock().await;
            receiver.recv().await
        };

        let Some(task) = task else {
            break;
        };

        tracing::debug!("Worker {} checking {}", id, task.url);
        let resource = requester.check(&task.url).await;

        if results.send(resource).await.is_err() {
            tracing::debug!("Worker {}: result queue closed", id);
            break;
        }
    }

    tracing::debug!("Worker {} stopped", id);
}
