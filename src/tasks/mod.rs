//! Long-running loops. Each one owns its own error boundary: a failed
//! iteration is logged, followed by a bounded sleep, and the loop goes on.

pub mod ingest;
pub mod monitor;
pub mod notifier;
pub mod worker;

use crate::model::AppState;
use tokio::task::JoinHandle;

/// Starts the worker, monitor and notifier next to the ingestion loop.
pub fn spawn_background(state: &AppState) -> Vec<JoinHandle<()>> {
    let worker = state.clone();
    let monitor = state.clone();
    let notifier = state.clone();
    vec![
        tokio::spawn(async move { worker::run(worker).await }),
        tokio::spawn(async move { monitor::run(monitor).await }),
        tokio::spawn(async move { notifier::run(notifier).await }),
    ]
}
