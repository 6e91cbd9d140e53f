//! Connection pool construction and schema bootstrap for the embedded store.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

/// A type alias for the database connection pool (`Pool<Sqlite>`).
/// Every task shares one pool; the store is the only channel between them.
pub type DbPool = Pool<Sqlite>;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS subscribers (
        actor_id INTEGER PRIMARY KEY,
        handle TEXT,
        account_name TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        last_start_at INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS admin_sessions (
        actor_id INTEGER PRIMARY KEY,
        step TEXT NOT NULL,
        payload TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS provision_jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        actor_id INTEGER NOT NULL,
        chat_id INTEGER NOT NULL,
        handle TEXT,
        account_name TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        started_at INTEGER NOT NULL DEFAULT 0,
        finished_at INTEGER NOT NULL DEFAULT 0,
        result_text TEXT NOT NULL DEFAULT ''
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_provision_jobs_status ON provision_jobs (status, id)",
    "CREATE INDEX IF NOT EXISTS idx_provision_jobs_actor ON provision_jobs (actor_id, status)",
    r#"CREATE TABLE IF NOT EXISTS trial_notices (
        actor_id INTEGER NOT NULL,
        notice_kind TEXT NOT NULL,
        expire_ts INTEGER NOT NULL,
        sent_at INTEGER NOT NULL,
        PRIMARY KEY (actor_id, notice_kind, expire_ts)
    )"#,
];

/// Opens (creating if needed) the database file and applies the schema.
pub async fn connect(path: &Path) -> Result<DbPool, sqlx::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
