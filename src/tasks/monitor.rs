//! Periodic health check with alert deduplication.

use crate::constants::{MAX_MONITOR_ALERT_CHARS, MONITOR_MIN_INTERVAL_SECS, MONITOR_SIGNATURE_CHARS};
use crate::interactions::util::send_admin_alert;
use crate::model::AppState;
use crate::services::commands::CommandOutcome;
use crate::ui::texts;
use crate::util::{now_ts, truncate_chars};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorAlert {
    Problem(String),
    Recovered,
}

/// Memory of the previous checks. Lives only in the monitor task.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    pub was_bad: bool,
    pub last_sig: Option<String>,
    pub last_alert_at: i64,
}

pub fn signature(outcome: &CommandOutcome) -> String {
    format!("{}:{}", outcome.code, truncate_chars(&outcome.output, MONITOR_SIGNATURE_CHARS))
}

impl MonitorState {
    /// Folds one check result into the state and decides whether to alert.
    pub fn observe(&mut self, outcome: &CommandOutcome, now: i64, cooldown: Duration) -> Option<MonitorAlert> {
        if outcome.success() {
            let recovered = self.was_bad;
            self.was_bad = false;
            self.last_sig = None;
            return recovered.then_some(MonitorAlert::Recovered);
        }

        let sig = signature(outcome);
        let cooldown = cooldown.as_secs() as i64;
        let alert = !self.was_bad
            || self.last_sig.as_deref() != Some(sig.as_str())
            || now - self.last_alert_at >= cooldown;
        self.was_bad = true;
        self.last_sig = Some(sig);
        if !alert {
            return None;
        }
        self.last_alert_at = now;
        Some(MonitorAlert::Problem(outcome.describe(MAX_MONITOR_ALERT_CHARS)))
    }
}

pub fn poll_interval(configured: Duration) -> Duration {
    configured.max(Duration::from_secs(MONITOR_MIN_INTERVAL_SECS))
}

pub async fn run(state: AppState) {
    if !state.config.monitor_enabled {
        tracing::info!(target = "monitor", "health monitor disabled");
        return;
    }
    let interval = poll_interval(state.config.monitor_interval);
    tracing::info!(target = "monitor", interval_secs = interval.as_secs(), "health monitor started");
    let mut memory = MonitorState::default();
    loop {
        check_once(&state, &mut memory).await;
        tokio::time::sleep(interval).await;
    }
}

pub async fn check_once(state: &AppState, memory: &mut MonitorState) {
    let outcome = state.commands.health_check().await;
    match memory.observe(&outcome, now_ts(), state.config.monitor_cooldown) {
        Some(MonitorAlert::Problem(body)) => {
            tracing::warn!(target = "monitor", rc = outcome.code, "healthcheck failing; alerting");
            send_admin_alert(state, &texts::monitor_problem(&body)).await;
        }
        Some(MonitorAlert::Recovered) => {
            tracing::info!(target = "monitor", "healthcheck recovered");
            send_admin_alert(state, texts::MONITOR_RECOVERED).await;
        }
        None if !outcome.success() => {
            tracing::debug!(target = "monitor", rc = outcome.code, "healthcheck still failing; alert suppressed");
        }
        None => {}
    }
}
