//! Subscriber directory: which chat actor owns which provisioned account.

use super::models::Subscriber;
use super::DbPool;
use crate::util::now_ts;
use std::collections::HashMap;

pub async fn get(pool: &DbPool, actor_id: i64) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(
        "SELECT actor_id, handle, account_name, created_at, last_start_at
         FROM subscribers WHERE actor_id = ?",
    )
    .bind(actor_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &DbPool) -> Result<Vec<Subscriber>, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(
        "SELECT actor_id, handle, account_name, created_at, last_start_at
         FROM subscribers ORDER BY actor_id",
    )
    .fetch_all(pool)
    .await
}

/// Insert on first provisioning; later calls refresh handle, account and activity time
/// while keeping the original `created_at`.
pub async fn upsert(
    pool: &DbPool,
    actor_id: i64,
    handle: Option<&str>,
    account_name: &str,
) -> Result<(), sqlx::Error> {
    let now = now_ts();
    sqlx::query(
        r#"INSERT INTO subscribers (actor_id, handle, account_name, created_at, last_start_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(actor_id) DO UPDATE SET
            handle = excluded.handle,
            account_name = excluded.account_name,
            last_start_at = excluded.last_start_at"#,
    )
    .bind(actor_id)
    .bind(handle)
    .bind(account_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn touch_start(pool: &DbPool, actor_id: i64, handle: Option<&str>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE subscribers SET last_start_at = ?, handle = COALESCE(?, handle) WHERE actor_id = ?")
        .bind(now_ts())
        .bind(handle)
        .bind(actor_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn actors_for_account(pool: &DbPool, account_name: &str) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT actor_id FROM subscribers WHERE account_name = ? AND actor_id > 0")
        .bind(account_name)
        .fetch_all(pool)
        .await
}

/// Drops every directory row bound to the account; returns how many were removed.
pub async fn delete_by_account(pool: &DbPool, account_name: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM subscribers WHERE account_name = ?")
        .bind(account_name)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

/// account name -> chat handle, for rendering `tg_*` accounts by their owner's handle.
pub async fn handle_map(pool: &DbPool) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows: Vec<(String, Option<String>)> =
        sqlx::query_as("SELECT account_name, handle FROM subscribers")
            .fetch_all(pool)
            .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(name, handle)| {
            let handle = handle?.trim().trim_start_matches('@').to_string();
            (!name.is_empty() && !handle.is_empty()).then_some((name, handle))
        })
        .collect())
}
