//! Durable FIFO of provisioning requests.
//!
//! `claim_next` is the only serialization point of the queue: selection of the
//! oldest pending row and its move to `running` happen inside one
//! `BEGIN IMMEDIATE` transaction, so two claimers (tasks or processes sharing
//! the database file) can never walk away with the same job.

use super::DbPool;
use super::models::{JobStatus, ProvisionJob};
use crate::constants::MAX_JOB_RESULT_CHARS;
use crate::util::{now_ts, truncate_chars};
use sqlx::SqliteConnection;

const JOB_COLUMNS: &str = "id, actor_id, chat_id, handle, account_name, status, \
     created_at, started_at, finished_at, result_text";

/// Inserts a pending job and returns its id.
///
/// Callers check `active_job_for` first; the check is not atomic with the
/// insert, a lost race costs one duplicate job that the worker resolves
/// idempotently.
pub async fn enqueue(
    pool: &DbPool,
    actor_id: i64,
    chat_id: i64,
    handle: Option<&str>,
    account_name: &str,
) -> Result<i64, sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO provision_jobs (actor_id, chat_id, handle, account_name, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(actor_id)
    .bind(chat_id)
    .bind(handle)
    .bind(account_name)
    .bind(JobStatus::Pending)
    .bind(now_ts())
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

/// Newest job of this actor that is still pending or running.
pub async fn active_job_for(pool: &DbPool, actor_id: i64) -> Result<Option<ProvisionJob>, sqlx::Error> {
    sqlx::query_as::<_, ProvisionJob>(&format!(
        "SELECT {JOB_COLUMNS} FROM provision_jobs
         WHERE actor_id = ? AND status IN (?, ?) ORDER BY id DESC LIMIT 1"
    ))
    .bind(actor_id)
    .bind(JobStatus::Pending)
    .bind(JobStatus::Running)
    .fetch_optional(pool)
    .await
}

pub async fn get(pool: &DbPool, job_id: i64) -> Result<Option<ProvisionJob>, sqlx::Error> {
    sqlx::query_as::<_, ProvisionJob>(&format!("SELECT {JOB_COLUMNS} FROM provision_jobs WHERE id = ?"))
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Claims the oldest pending job, moving it to `running`.
pub async fn claim_next(pool: &DbPool) -> Result<Option<ProvisionJob>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

    let outcome = match claim_in_open_tx(&mut conn).await {
        Ok(job) => sqlx::query("COMMIT").execute(&mut *conn).await.map(|_| job),
        Err(e) => Err(e),
    };

    if outcome.is_err()
        && let Err(rollback_err) = sqlx::query("ROLLBACK").execute(&mut *conn).await
    {
        // The connection may still hold the write lock; never hand it back to the pool.
        tracing::warn!(target = "queue.claim", error = ?rollback_err, "rollback after failed claim failed");
        conn.close_on_drop();
    }
    outcome
}

async fn claim_in_open_tx(conn: &mut SqliteConnection) -> Result<Option<ProvisionJob>, sqlx::Error> {
    let next = sqlx::query_as::<_, ProvisionJob>(&format!(
        "SELECT {JOB_COLUMNS} FROM provision_jobs WHERE status = ? ORDER BY id ASC LIMIT 1"
    ))
    .bind(JobStatus::Pending)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut job) = next else {
        return Ok(None);
    };
    let started_at = now_ts();
    sqlx::query("UPDATE provision_jobs SET status = ?, started_at = ? WHERE id = ?")
        .bind(JobStatus::Running)
        .bind(started_at)
        .bind(job.id)
        .execute(&mut *conn)
        .await?;
    job.status = JobStatus::Running;
    job.started_at = started_at;
    Ok(Some(job))
}

/// Records the terminal outcome. A job already in a terminal state is left
/// untouched; returns whether this call performed the transition.
pub async fn finish(pool: &DbPool, job_id: i64, ok: bool, result_text: &str) -> Result<bool, sqlx::Error> {
    let status = if ok { JobStatus::Done } else { JobStatus::Failed };
    let res = sqlx::query(
        "UPDATE provision_jobs SET status = ?, finished_at = ?, result_text = ?
         WHERE id = ? AND status IN (?, ?)",
    )
    .bind(status)
    .bind(now_ts())
    .bind(truncate_chars(result_text, MAX_JOB_RESULT_CHARS))
    .bind(job_id)
    .bind(JobStatus::Pending)
    .bind(JobStatus::Running)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() == 1)
}

/// Returns jobs left `running` by a previous process to the queue.
///
/// Only valid at worker startup on a single node: any `running` row at that
/// point belongs to a consumer that no longer exists. The retried command is
/// made safe by the "already exists" success path.
pub async fn requeue_interrupted(pool: &DbPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("UPDATE provision_jobs SET status = ?, started_at = 0 WHERE status = ?")
        .bind(JobStatus::Pending)
        .bind(JobStatus::Running)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
