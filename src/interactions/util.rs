//! Shared outbound helpers: every user-facing send goes through here so
//! truncation and failure logging are uniform.
use crate::constants::MAX_MESSAGE_CHARS;
use crate::database::subscribers;
use crate::model::AppState;
use crate::transport::Keyboard;
use crate::util::truncate_chars;

/// Sends a plain message; a delivery failure is logged with `tag` and swallowed.
pub async fn send(state: &AppState, chat_id: i64, tag: &str, text: &str, keyboard: Option<&Keyboard>) {
    deliver(state, chat_id, tag, text, keyboard, false).await;
}

/// Same as [`send`] with HTML parse mode.
pub async fn send_html(state: &AppState, chat_id: i64, tag: &str, text: &str, keyboard: Option<&Keyboard>) {
    deliver(state, chat_id, tag, text, keyboard, true).await;
}

async fn deliver(state: &AppState, chat_id: i64, tag: &str, text: &str, keyboard: Option<&Keyboard>, html: bool) {
    let text = truncate_chars(text, MAX_MESSAGE_CHARS);
    if let Err(e) = state.chat.send_message(chat_id, text, keyboard, html).await {
        tracing::error!(target = "ui.send", chat_id, tag = %tag, error = %e, "send_message failed");
    }
}

/// Acknowledge a button press, ignoring late/duplicate errors.
pub async fn ack(state: &AppState, query_id: &str) {
    if let Err(e) = state.chat.answer_callback(query_id).await {
        tracing::debug!(target = "ui.ack", query_id = %query_id, error = %e, "answer_callback failed");
    }
}

/// Tells every chat actor bound to `account` about an administrative change.
/// Lookup and per-recipient delivery failures are logged, never propagated.
pub async fn notify_bound_actors(state: &AppState, account: &str, text: &str) {
    let actors = match subscribers::actors_for_account(&state.db, account).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(target = "ui.notify", account = %account, error = ?e, "could not resolve bound actors");
            return;
        }
    };
    for actor_id in actors {
        send(state, actor_id, "notify.change", text, None).await;
    }
}

/// Broadcasts to every configured administrator.
pub async fn send_admin_alert(state: &AppState, text: &str) {
    let kb = crate::ui::keyboards::main(true);
    for chat_id in state.config.alert_recipients() {
        send(state, chat_id, "admin.alert", text, Some(&kb)).await;
    }
}
