//! Append-only ledger of trial notices already delivered.
//!
//! The expiry timestamp is part of the key, so moving an account's expiry
//! re-arms every notice kind for the new value without any reset step.

use super::DbPool;
use super::models::NoticeKind;
use crate::util::now_ts;

pub async fn already_sent(
    pool: &DbPool,
    actor_id: i64,
    kind: NoticeKind,
    expire_ts: i64,
) -> Result<bool, sqlx::Error> {
    let hit: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM trial_notices WHERE actor_id = ? AND notice_kind = ? AND expire_ts = ? LIMIT 1",
    )
    .bind(actor_id)
    .bind(kind)
    .bind(expire_ts)
    .fetch_optional(pool)
    .await?;
    Ok(hit.is_some())
}

/// Records a delivered notice. Returns false if the triple was already present.
pub async fn mark_sent(
    pool: &DbPool,
    actor_id: i64,
    kind: NoticeKind,
    expire_ts: i64,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "INSERT OR IGNORE INTO trial_notices (actor_id, notice_kind, expire_ts, sent_at) VALUES (?, ?, ?, ?)",
    )
    .bind(actor_id)
    .bind(kind)
    .bind(expire_ts)
    .bind(now_ts())
    .execute(pool)
    .await?;
    Ok(res.rows_affected() == 1)
}
