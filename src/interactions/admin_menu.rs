//! Admin screens outside the dialogue proper: section menus, node status,
//! and the entry points that open a dialogue.
use crate::constants::{MAX_MESSAGE_CHARS, MAX_METRICS_ERROR_CHARS};
use crate::database::{sessions, subscribers};
use crate::interactions::selector::{build_rows, page};
use crate::interactions::session::{AdminSession, SelectIntent};
use crate::interactions::util::send;
use crate::model::AppState;
use crate::transport::Actor;
use crate::ui::{keyboards, texts};
use crate::util::now_ts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Users,
    Access,
    Service,
}

/// Replies "admins only" and returns false for everyone else.
pub async fn ensure_admin(state: &AppState, actor: &Actor, chat_id: i64) -> bool {
    if state.config.is_admin(actor.id, actor.handle()) {
        return true;
    }
    tracing::info!(target = "admin.deny", actor_id = actor.id, "non-admin pressed an admin control");
    send(state, chat_id, "admin.deny", texts::ADMINS_ONLY, Some(&keyboards::main(false))).await;
    false
}

pub async fn show_home(state: &AppState, actor: &Actor, chat_id: i64) {
    if !ensure_admin(state, actor, chat_id).await {
        return;
    }
    let total = match state.registry.count().await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(target = "admin.home", error = %e, "registry unreadable");
            0
        }
    };
    send(state, chat_id, "admin.home", &texts::admin_home(total), Some(&keyboards::admin())).await;
}

pub async fn show_section(state: &AppState, actor: &Actor, chat_id: i64, section: Section) {
    if !ensure_admin(state, actor, chat_id).await {
        return;
    }
    let (text, kb) = match section {
        Section::Users => (texts::SECTION_USERS, keyboards::admin_users()),
        Section::Access => (texts::SECTION_ACCESS, keyboards::admin_access()),
        Section::Service => (texts::SECTION_SERVICE, keyboards::admin_service()),
    };
    send(state, chat_id, "admin.section", text, Some(&kb)).await;
}

/// Runs the metrics command and shows its output (or the failure tail).
pub async fn show_node_status(state: &AppState, actor: &Actor, chat_id: i64) {
    if !ensure_admin(state, actor, chat_id).await {
        return;
    }
    let outcome = state.commands.metrics().await;
    let text = if outcome.success() {
        outcome.describe(MAX_MESSAGE_CHARS)
    } else {
        texts::metrics_failed(&outcome.describe(MAX_METRICS_ERROR_CHARS))
    };
    send(state, chat_id, "admin.status", &text, Some(&keyboards::admin())).await;
}

pub async fn start_add(state: &AppState, actor: &Actor, chat_id: i64) -> anyhow::Result<()> {
    if !ensure_admin(state, actor, chat_id).await {
        return Ok(());
    }
    sessions::save(&state.db, actor.id, &AdminSession::AddName).await?;
    send(state, chat_id, "admin.add", texts::ASK_NEW_NAME, Some(&keyboards::admin_back())).await;
    Ok(())
}

pub async fn start_search(state: &AppState, actor: &Actor, chat_id: i64, intent: SelectIntent) -> anyhow::Result<()> {
    if !ensure_admin(state, actor, chat_id).await {
        return Ok(());
    }
    sessions::save(&state.db, actor.id, &AdminSession::SearchQuery { intent }).await?;
    send(state, chat_id, "admin.search", texts::ASK_SEARCH, Some(&keyboards::admin_back())).await;
    Ok(())
}

/// Menu entry into the selector: empty query, first page.
pub async fn start_select(state: &AppState, actor: &Actor, chat_id: i64, intent: SelectIntent) -> anyhow::Result<()> {
    if !ensure_admin(state, actor, chat_id).await {
        return Ok(());
    }
    open_selector(state, actor.id, chat_id, intent, "", 0).await
}

/// Renders one selector page and stores the browsing position, with the
/// offset clamped to what actually exists.
pub async fn open_selector(
    state: &AppState,
    actor_id: i64,
    chat_id: i64,
    intent: SelectIntent,
    query: &str,
    offset: usize,
) -> anyhow::Result<()> {
    let accounts = state.registry.load().await?;
    let handles = subscribers::handle_map(&state.db).await?;
    let rows = build_rows(&accounts, &handles, query, intent.filter(), now_ts());
    let page = page(&rows, offset);

    let session = AdminSession::Selecting {
        intent,
        query: query.to_string(),
        offset: page.offset,
    };
    sessions::save(&state.db, actor_id, &session).await?;

    let text = texts::selector(intent, &page, query);
    let kb = keyboards::selector(&page, intent.can_choose());
    send(state, chat_id, "admin.selector", &text, Some(&kb)).await;
    Ok(())
}
