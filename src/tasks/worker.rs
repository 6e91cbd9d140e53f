//! The provisioning worker: drains the job queue one job at a time.

use crate::constants::{LOOP_BACKOFF_SECS, MAX_DIAG_TAIL_CHARS, WORKER_IDLE_SLEEP_SECS};
use crate::database::models::ProvisionJob;
use crate::database::{jobs, subscribers};
use crate::interactions::util::{send, send_admin_alert};
use crate::model::AppState;
use crate::ui::{keyboards, texts};
use std::time::Duration;

pub async fn run(state: AppState) {
    match jobs::requeue_interrupted(&state.db).await {
        Ok(0) => {}
        Ok(n) => tracing::warn!(target = "worker", requeued = n, "returned interrupted jobs to the queue"),
        Err(e) => tracing::error!(target = "worker", error = ?e, "requeue of interrupted jobs failed"),
    }
    tracing::info!(target = "worker", "provisioning worker started");
    loop {
        match run_once(&state).await {
            Ok(true) => {}
            Ok(false) => tokio::time::sleep(Duration::from_secs(WORKER_IDLE_SLEEP_SECS)).await,
            Err(e) => {
                tracing::error!(target = "worker", error = ?e, "worker iteration failed");
                tokio::time::sleep(Duration::from_secs(LOOP_BACKOFF_SECS)).await;
            }
        }
    }
}

/// Claims and processes at most one job. Returns whether a job was found.
pub async fn run_once(state: &AppState) -> anyhow::Result<bool> {
    let Some(job) = jobs::claim_next(&state.db).await? else {
        return Ok(false);
    };
    tracing::info!(target = "worker", job_id = job.id, account = %job.account_name, "job claimed");
    let free_days = state.config.free_days;
    let (ok, outcome) = state
        .commands
        .provision(&job.account_name, free_days, &state.registry)
        .await;
    if ok {
        complete(state, &job, &outcome.output).await?;
    } else {
        fail(state, &job, &outcome.describe(MAX_DIAG_TAIL_CHARS)).await?;
    }
    Ok(true)
}

async fn complete(state: &AppState, job: &ProvisionJob, output: &str) -> anyhow::Result<()> {
    let existed = subscribers::get(&state.db, job.actor_id).await?.is_some();
    subscribers::upsert(&state.db, job.actor_id, job.handle.as_deref(), &job.account_name).await?;
    if let Err(e) = state.lifecycle.set_trial(&job.account_name, true).await {
        tracing::warn!(target = "worker", job_id = job.id, account = %job.account_name, error = %e, "trial flag not set");
    }
    jobs::finish(&state.db, job.id, true, output).await?;
    tracing::info!(target = "worker", job_id = job.id, actor_id = job.actor_id, account = %job.account_name, "provisioned");

    let free_days = state.config.free_days;
    let kb = keyboards::main(state.config.is_admin(job.actor_id, job.handle.as_deref()));
    send(state, job.chat_id, "worker.done", &texts::provisioned(free_days), Some(&kb)).await;
    if !existed {
        send_admin_alert(state, &texts::new_user_alert(&job.who(), &job.account_name, free_days)).await;
    }
    Ok(())
}

async fn fail(state: &AppState, job: &ProvisionJob, diag: &str) -> anyhow::Result<()> {
    jobs::finish(&state.db, job.id, false, diag).await?;
    tracing::error!(target = "worker", job_id = job.id, account = %job.account_name, diag = %diag, "provisioning failed");
    let text = texts::provision_failed(&state.config.support_text);
    send(state, job.chat_id, "worker.failed", &text, Some(&keyboards::main(false))).await;
    send_admin_alert(state, &texts::provision_failed_alert(&job.who(), &job.account_name, diag)).await;
    Ok(())
}
