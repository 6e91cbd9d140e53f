//! Contains all the data structures that map to store tables or query results.

use sqlx::Type;
use std::fmt;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Subscriber {
    pub actor_id: i64,
    pub handle: Option<String>,
    pub account_name: String,
    pub created_at: i64,
    pub last_start_at: i64,
}

// --- Provisioning queue ---
#[derive(Debug, Clone, Copy, Type, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ProvisionJob {
    pub id: i64,
    pub actor_id: i64,
    pub chat_id: i64,
    pub handle: Option<String>,
    pub account_name: String,
    pub status: JobStatus,
    pub created_at: i64,
    pub started_at: i64,
    pub finished_at: i64,
    pub result_text: String,
}

impl ProvisionJob {
    /// `@handle` when known, otherwise the numeric actor id.
    pub fn who(&self) -> String {
        match self.handle.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => format!("@{}", h.trim_start_matches('@')),
            _ => format!("actor_id={}", self.actor_id),
        }
    }
}

// --- Trial notices ---
#[derive(Debug, Clone, Copy, Type, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Fewer than six hours of trial remain.
    #[sqlx(rename = "trial_6h")]
    Approaching,
    #[sqlx(rename = "trial_expired")]
    Expired,
}
