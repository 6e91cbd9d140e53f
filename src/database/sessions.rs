//! Persisted admin dialogue state: one row per actor, step and payload always
//! written and read together.

use super::DbPool;
use crate::interactions::session::AdminSession;
use crate::util::now_ts;

pub async fn load(pool: &DbPool, actor_id: i64) -> Result<Option<AdminSession>, sqlx::Error> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT step, payload FROM admin_sessions WHERE actor_id = ?")
            .bind(actor_id)
            .fetch_optional(pool)
            .await?;
    let Some((step, payload)) = row else {
        return Ok(None);
    };
    match AdminSession::from_parts(&step, &payload) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            // An undecodable row means "top-level menu"; drop it so it cannot resurface.
            tracing::warn!(target = "session", actor_id, step = %step, error = %e, "discarding undecodable admin session");
            clear(pool, actor_id).await?;
            Ok(None)
        }
    }
}

pub async fn save(pool: &DbPool, actor_id: i64, session: &AdminSession) -> Result<(), sqlx::Error> {
    let (step, payload) = session.to_parts();
    sqlx::query(
        r#"INSERT INTO admin_sessions (actor_id, step, payload, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(actor_id) DO UPDATE SET
            step = excluded.step,
            payload = excluded.payload,
            updated_at = excluded.updated_at"#,
    )
    .bind(actor_id)
    .bind(step)
    .bind(payload)
    .bind(now_ts())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn clear(pool: &DbPool, actor_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admin_sessions WHERE actor_id = ?")
        .bind(actor_id)
        .execute(pool)
        .await?;
    Ok(())
}
