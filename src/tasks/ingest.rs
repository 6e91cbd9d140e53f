use crate::constants::{LOOP_BACKOFF_SECS, POLL_TIMEOUT_SECS};
use crate::handler;
use crate::model::AppState;
use std::time::Duration;

/// Long-polls the chat transport forever, handling updates in arrival order.
pub async fn run(state: AppState) {
    let mut offset = 0_i64;
    tracing::info!(target = "ingest", "polling for updates");
    loop {
        match poll_once(&state, offset).await {
            Ok(next) => offset = next,
            Err(e) => {
                tracing::error!(target = "ingest", error = %e, "getUpdates failed");
                tokio::time::sleep(Duration::from_secs(LOOP_BACKOFF_SECS)).await;
            }
        }
    }
}

/// One poll round. Returns the offset for the next call; a handler error
/// is logged and does not stop the rest of the batch.
pub async fn poll_once(state: &AppState, offset: i64) -> anyhow::Result<i64> {
    let updates = state
        .chat
        .get_updates(offset, Duration::from_secs(POLL_TIMEOUT_SECS))
        .await?;
    let mut next = offset;
    for update in updates {
        next = next.max(update.update_id + 1);
        let Some(inbound) = update.inbound else {
            continue;
        };
        if let Err(e) = handler::handle(state, inbound).await {
            tracing::error!(target = "ingest", update_id = update.update_id, error = ?e, "update handling failed");
        }
    }
    Ok(next)
}
