//! Process configuration, read once from the environment at startup.
//!
//! `Config` is immutable after construction and handed to every component
//! through `AppState`; nothing else in the crate touches `std::env`.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Public base of the subscription pages, without a trailing slash.
    pub base_url: String,
    pub support_text: String,
    pub support_chat_url: String,
    /// Trial length granted by the `/start` provisioning path.
    pub free_days: i64,
    pub start_rate_limit: Duration,
    pub db_path: PathBuf,
    pub clients_json: PathBuf,
    pub add_user_cmd: String,
    pub del_user_cmd: String,
    pub sync_expire_cmd: String,
    pub sync_grace_days: i64,
    pub monitor_enabled: bool,
    pub monitor_interval: Duration,
    pub monitor_cooldown: Duration,
    pub monitor_cmd: String,
    pub monitor_check_user: Option<String>,
    pub metrics_cmd: String,
    pub trial_notice_interval: Duration,
    pub admin_ids: BTreeSet<i64>,
    pub admin_usernames: BTreeSet<String>,
    /// 0 disables the dedicated primary admin.
    pub primary_admin_id: i64,
}

impl Config {
    /// Loads `.env` (if present) and builds the config from process variables.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let int = |key: &str, default: i64| -> Result<i64> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v
                    .parse::<i64>()
                    .with_context(|| format!("{key} must be an integer, got {v:?}")),
                _ => Ok(default),
            }
        };
        let secs = |key: &str, default: i64| -> Result<Duration> {
            Ok(Duration::from_secs(int(key, default)?.max(0) as u64))
        };

        let bot_token = get("BOT_TOKEN", "");
        if bot_token.is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }

        let monitor_check_user = Some(get("MONITOR_CHECK_USER", "")).filter(|u| !u.is_empty());

        Ok(Self {
            bot_token,
            base_url: get("BASE_URL", "https://example.com:8443")
                .trim_end_matches('/')
                .to_string(),
            support_text: get("SUPPORT_TEXT", "Support: @admin"),
            support_chat_url: get("SUPPORT_CHAT_URL", "https://t.me/admin"),
            free_days: int("FREE_DAYS", 1)?,
            start_rate_limit: secs("START_RATE_LIMIT_SEC", 30)?,
            db_path: PathBuf::from(get("DB_PATH", "/var/lib/subscription-console/bot.db")),
            clients_json: PathBuf::from(get("CLIENTS_JSON", "/var/lib/vless-sub/clients.json")),
            add_user_cmd: get("ADD_USER_CMD", "/usr/local/sbin/vless-add-user"),
            del_user_cmd: get("DEL_USER_CMD", "/usr/local/sbin/vless-del-user"),
            sync_expire_cmd: get("SYNC_EXPIRE_CMD", "/usr/local/sbin/vless-sync-expire"),
            sync_grace_days: int("SYNC_GRACE_DAYS", 1)?,
            monitor_enabled: get("MONITOR_ENABLED", "1") == "1",
            monitor_interval: secs("MONITOR_INTERVAL_SEC", 300)?,
            monitor_cooldown: secs("MONITOR_COOLDOWN_SEC", 1800)?,
            monitor_cmd: get("MONITOR_CMD", "/usr/local/sbin/healthcheck-master-replicas"),
            monitor_check_user,
            metrics_cmd: get("METRICS_CMD", "/usr/local/sbin/metrics-master-light"),
            trial_notice_interval: secs("TRIAL_NOTICE_INTERVAL_SEC", 300)?,
            admin_ids: parse_id_set(&get("ADMIN_TG_IDS", "")),
            admin_usernames: parse_handle_set(&get("ADMIN_TG_USERNAMES", "")),
            primary_admin_id: int("PRIMARY_ADMIN_TG_ID", 0)?,
        })
    }

    /// Recipients of administrative alerts: configured ids plus the primary admin.
    pub fn alert_recipients(&self) -> Vec<i64> {
        let mut ids = self.admin_ids.clone();
        ids.insert(self.primary_admin_id);
        ids.into_iter().filter(|id| *id > 0).collect()
    }

    pub fn is_admin(&self, actor_id: i64, handle: Option<&str>) -> bool {
        if self.primary_admin_id > 0 && actor_id == self.primary_admin_id {
            return true;
        }
        if self.admin_ids.contains(&actor_id) {
            return true;
        }
        handle
            .map(|h| h.trim().trim_start_matches('@').to_lowercase())
            .is_some_and(|h| !h.is_empty() && self.admin_usernames.contains(&h))
    }

    pub fn menu_url(&self, account_name: &str) -> String {
        format!("{}/i/{}", self.base_url, account_name)
    }
}

/// Comma list of ids; blank and non-numeric items are skipped.
pub fn parse_id_set(raw: &str) -> BTreeSet<i64> {
    raw.split(',')
        .filter_map(|item| item.trim().parse::<i64>().ok())
        .collect()
}

/// Comma list of handles, normalized to lower case without the leading `@`.
pub fn parse_handle_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|item| item.trim().trim_start_matches('@').to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
