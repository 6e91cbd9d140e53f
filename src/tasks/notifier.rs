//! Trial-expiry reminders, each sent at most once per (actor, kind, expiry).

use crate::constants::{LOOP_BACKOFF_SECS, MAX_MESSAGE_CHARS, TRIAL_WARNING_WINDOW_SECS};
use crate::database::models::NoticeKind;
use crate::database::{notices, subscribers};
use crate::model::AppState;
use crate::ui::{keyboards, texts};
use crate::util::{now_ts, truncate_chars};
use std::collections::HashMap;
use std::time::Duration;

/// Which notice a trial account with this expiry is due, if any.
pub fn due_notice(expire: i64, now: i64) -> Option<NoticeKind> {
    if expire <= 0 {
        return None;
    }
    let remaining = expire - now;
    if remaining <= 0 {
        Some(NoticeKind::Expired)
    } else if remaining <= TRIAL_WARNING_WINDOW_SECS {
        Some(NoticeKind::Approaching)
    } else {
        None
    }
}

fn notice_text(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Approaching => texts::TRIAL_ENDING_NOTICE,
        NoticeKind::Expired => texts::TRIAL_ENDED_NOTICE,
    }
}

pub async fn run(state: AppState) {
    let interval = state.config.trial_notice_interval;
    tracing::info!(target = "notifier", interval_secs = interval.as_secs(), "trial notifier started");
    loop {
        match run_cycle(&state, now_ts()).await {
            Ok(0) => {}
            Ok(sent) => tracing::info!(target = "notifier", sent, "trial notices delivered"),
            Err(e) => {
                tracing::error!(target = "notifier", error = ?e, "notice cycle failed");
                tokio::time::sleep(Duration::from_secs(LOOP_BACKOFF_SECS)).await;
            }
        }
        tokio::time::sleep(interval).await;
    }
}

/// One pass over all subscribers. A notice is recorded only after the
/// transport accepted it, so a failed send is retried next cycle.
pub async fn run_cycle(state: &AppState, now: i64) -> anyhow::Result<usize> {
    let accounts: HashMap<String, _> = state
        .registry
        .load()
        .await?
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();
    let kb = keyboards::pay();
    let mut sent = 0;

    for sub in subscribers::list_all(&state.db).await? {
        let Some(account) = accounts.get(&sub.account_name) else {
            continue;
        };
        if !account.trial {
            continue;
        }
        let Some(kind) = due_notice(account.expire, now) else {
            continue;
        };
        if notices::already_sent(&state.db, sub.actor_id, kind, account.expire).await? {
            continue;
        }
        let text = truncate_chars(notice_text(kind), MAX_MESSAGE_CHARS);
        match state.chat.send_message(sub.actor_id, text, Some(&kb), false).await {
            Ok(()) => {
                notices::mark_sent(&state.db, sub.actor_id, kind, account.expire).await?;
                sent += 1;
            }
            Err(e) => {
                tracing::warn!(target = "notifier", actor_id = sub.actor_id, account = %sub.account_name, error = %e, "trial notice not delivered");
            }
        }
    }
    Ok(sent)
}
