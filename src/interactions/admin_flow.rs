//! Multi-step admin dialogue.
//!
//! [`advance`] is the whole state machine: given the stored session and one
//! inbound event it decides the next session and a single [`Effect`]. It never
//! touches the store or the network; [`handle_event`] persists the decision
//! and performs the effect.

use crate::constants::{MAX_DIAG_TAIL_CHARS, SELECT_PAGE_SIZE};
use crate::database::{sessions, subscribers};
use crate::interactions::admin_menu;
use crate::interactions::ids;
use crate::interactions::session::{AdminSession, ExpiryMode, SelectIntent};
use crate::interactions::util::{notify_bound_actors, send};
use crate::model::AppState;
use crate::services::lifecycle::LifecycleError;
use crate::ui::{keyboards, texts};
use crate::util::{format_datetime, is_valid_account_name, now_ts, parse_positive_days};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Block,
    Unblock,
    TrialOff,
    Delete,
}

impl ConfirmAction {
    pub fn id(self) -> &'static str {
        match self {
            ConfirmAction::Block => ids::CONFIRM_BLOCK,
            ConfirmAction::Unblock => ids::CONFIRM_UNBLOCK,
            ConfirmAction::TrialOff => ids::CONFIRM_TRIAL_OFF,
            ConfirmAction::Delete => ids::CONFIRM_DELETE,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            ids::CONFIRM_BLOCK => Some(ConfirmAction::Block),
            ids::CONFIRM_UNBLOCK => Some(ConfirmAction::Unblock),
            ids::CONFIRM_TRIAL_OFF => Some(ConfirmAction::TrialOff),
            ids::CONFIRM_DELETE => Some(ConfirmAction::Delete),
            _ => None,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ConfirmAction::Block => "blocking",
            ConfirmAction::Unblock => "unblocking",
            ConfirmAction::TrialOff => "trial removal",
            ConfirmAction::Delete => "deletion",
        }
    }

    fn session(self, name: String) -> AdminSession {
        match self {
            ConfirmAction::Block => AdminSession::ConfirmBlock { name },
            ConfirmAction::Unblock => AdminSession::ConfirmUnblock { name },
            ConfirmAction::TrialOff => AdminSession::ConfirmTrialOff { name },
            ConfirmAction::Delete => AdminSession::ConfirmDelete { name },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminEvent {
    Text(String),
    Confirm(ConfirmAction),
    Prev,
    Next,
    Find,
    Pick(String),
    /// A button press that is not a known control.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Keep,
    Save(AdminSession),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reprompt {
    InvalidName,
    NameTaken,
    InvalidDays,
    UseConfirmButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Reprompt(Reprompt),
    AskAddDays { name: String },
    AskEditDays { name: String, mode: ExpiryMode },
    AskConfirm { action: ConfirmAction, name: String },
    AskSearch,
    RenderSelector { intent: SelectIntent, query: String, offset: usize },
    Provision { name: String, days: i64 },
    ApplyExpiry { name: String, days: i64, mode: ExpiryMode },
    Apply { action: ConfirmAction, name: String },
    ViewOnly,
    NotFound,
    /// The event is not part of the dialogue; the caller routes it as a
    /// regular menu action and the session is left untouched.
    Fallthrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Next,
    pub effect: Effect,
}

impl Transition {
    fn keep(effect: Effect) -> Self {
        Self { next: Next::Keep, effect }
    }
    fn save(session: AdminSession, effect: Effect) -> Self {
        Self {
            next: Next::Save(session),
            effect,
        }
    }
    fn clear(effect: Effect) -> Self {
        Self { next: Next::Clear, effect }
    }
}

fn pending_confirm(session: &AdminSession) -> Option<(ConfirmAction, &str)> {
    match session {
        AdminSession::ConfirmBlock { name } => Some((ConfirmAction::Block, name.as_str())),
        AdminSession::ConfirmUnblock { name } => Some((ConfirmAction::Unblock, name.as_str())),
        AdminSession::ConfirmTrialOff { name } => Some((ConfirmAction::TrialOff, name.as_str())),
        AdminSession::ConfirmDelete { name } => Some((ConfirmAction::Delete, name.as_str())),
        _ => None,
    }
}

/// Whether [`advance`] will consult the `exists` predicate for this input.
pub fn needs_registry(session: &AdminSession, event: &AdminEvent) -> bool {
    matches!(
        (session, event),
        (AdminSession::AddName, AdminEvent::Text(_)) | (AdminSession::Selecting { .. }, AdminEvent::Pick(_))
    )
}

/// The dialogue transition function. `exists` answers "is this account in
/// the registry right now".
pub fn advance(session: &AdminSession, event: &AdminEvent, exists: &dyn Fn(&str) -> bool) -> Transition {
    if let Some((expected, name)) = pending_confirm(session) {
        return match event {
            AdminEvent::Confirm(action) if *action == expected => Transition::clear(Effect::Apply {
                action: expected,
                name: name.to_string(),
            }),
            _ => Transition::keep(Effect::Reprompt(Reprompt::UseConfirmButton)),
        };
    }

    match (session, event) {
        (AdminSession::AddName, AdminEvent::Text(text)) => {
            let name = text.trim();
            if !is_valid_account_name(name) {
                Transition::keep(Effect::Reprompt(Reprompt::InvalidName))
            } else if exists(name) {
                Transition::keep(Effect::Reprompt(Reprompt::NameTaken))
            } else {
                Transition::save(
                    AdminSession::AddDays { name: name.to_string() },
                    Effect::AskAddDays { name: name.to_string() },
                )
            }
        }
        (AdminSession::AddDays { name }, AdminEvent::Text(text)) => match parse_positive_days(text) {
            None => Transition::keep(Effect::Reprompt(Reprompt::InvalidDays)),
            Some(days) => Transition::clear(Effect::Provision { name: name.clone(), days }),
        },
        (AdminSession::EditDays { name, mode }, AdminEvent::Text(text)) => match parse_positive_days(text) {
            None => Transition::keep(Effect::Reprompt(Reprompt::InvalidDays)),
            Some(days) => Transition::clear(Effect::ApplyExpiry {
                name: name.clone(),
                days,
                mode: *mode,
            }),
        },
        (AdminSession::SearchQuery { intent }, AdminEvent::Text(text)) => {
            let query = text.trim().to_string();
            Transition::save(
                AdminSession::Selecting {
                    intent: *intent,
                    query: query.clone(),
                    offset: 0,
                },
                Effect::RenderSelector {
                    intent: *intent,
                    query,
                    offset: 0,
                },
            )
        }
        (AdminSession::Selecting { intent, query, offset }, AdminEvent::Prev | AdminEvent::Next) => {
            let offset = if *event == AdminEvent::Prev {
                offset.saturating_sub(SELECT_PAGE_SIZE)
            } else {
                offset + SELECT_PAGE_SIZE
            };
            Transition::save(
                AdminSession::Selecting {
                    intent: *intent,
                    query: query.clone(),
                    offset,
                },
                Effect::RenderSelector {
                    intent: *intent,
                    query: query.clone(),
                    offset,
                },
            )
        }
        (AdminSession::Selecting { intent, .. }, AdminEvent::Find) => {
            Transition::save(AdminSession::SearchQuery { intent: *intent }, Effect::AskSearch)
        }
        (AdminSession::Selecting { intent, .. }, AdminEvent::Pick(name)) => pick(*intent, name.trim(), exists),
        _ => Transition::keep(Effect::Fallthrough),
    }
}

fn pick(intent: SelectIntent, name: &str, exists: &dyn Fn(&str) -> bool) -> Transition {
    if intent == SelectIntent::View {
        return Transition::clear(Effect::ViewOnly);
    }
    if !exists(name) {
        return Transition::clear(Effect::NotFound);
    }
    let name = name.to_string();
    let confirm = |action: ConfirmAction| {
        Transition::save(action.session(name.clone()), Effect::AskConfirm { action, name: name.clone() })
    };
    match intent {
        SelectIntent::Edit | SelectIntent::Extend => {
            let mode = if intent == SelectIntent::Extend {
                ExpiryMode::Extend
            } else {
                ExpiryMode::Set
            };
            Transition::save(
                AdminSession::EditDays { name: name.clone(), mode },
                Effect::AskEditDays { name: name.clone(), mode },
            )
        }
        SelectIntent::Block => confirm(ConfirmAction::Block),
        SelectIntent::Unblock => confirm(ConfirmAction::Unblock),
        SelectIntent::TrialOff => confirm(ConfirmAction::TrialOff),
        SelectIntent::Delete => confirm(ConfirmAction::Delete),
        SelectIntent::View => Transition::clear(Effect::ViewOnly),
    }
}

/// Runs one dialogue step for an administrator with an open session.
/// Returns `false` when the event was not consumed by the dialogue.
pub async fn handle_event(
    state: &AppState,
    actor_id: i64,
    chat_id: i64,
    session: &AdminSession,
    event: &AdminEvent,
) -> anyhow::Result<bool> {
    let known: HashSet<String> = if needs_registry(session, event) {
        state
            .registry
            .load()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect()
    } else {
        HashSet::new()
    };
    let transition = advance(session, event, &|name| known.contains(name));
    if transition.effect == Effect::Fallthrough {
        return Ok(false);
    }
    tracing::debug!(target = "admin.flow", actor_id, step = session.step(), effect = ?transition.effect, "advance");

    match &transition.next {
        Next::Keep => {}
        Next::Save(next) => sessions::save(&state.db, actor_id, next).await?,
        Next::Clear => sessions::clear(&state.db, actor_id).await?,
    }
    run_effect(state, actor_id, chat_id, transition.effect).await?;
    Ok(true)
}

async fn run_effect(state: &AppState, actor_id: i64, chat_id: i64, effect: Effect) -> anyhow::Result<()> {
    let back = keyboards::admin_back();
    let home = keyboards::admin();
    match effect {
        Effect::Reprompt(r) => {
            let text = match r {
                Reprompt::InvalidName => texts::INVALID_NAME,
                Reprompt::NameTaken => texts::NAME_TAKEN,
                Reprompt::InvalidDays => texts::INVALID_DAYS,
                Reprompt::UseConfirmButton => texts::USE_CONFIRM_BUTTON,
            };
            send(state, chat_id, "admin.reprompt", text, Some(&back)).await;
        }
        Effect::AskAddDays { name } => {
            send(state, chat_id, "admin.ask_days", &texts::ask_add_days(&name), Some(&back)).await;
        }
        Effect::AskEditDays { name, mode } => {
            let text = texts::ask_edit_days(&name, mode == ExpiryMode::Extend);
            send(state, chat_id, "admin.ask_days", &text, Some(&back)).await;
        }
        Effect::AskConfirm { action, name } => {
            let text = texts::ask_confirm(action.verb(), &name);
            send(state, chat_id, "admin.confirm", &text, Some(&keyboards::confirm(action.id()))).await;
        }
        Effect::AskSearch => {
            send(state, chat_id, "admin.search", texts::ASK_SEARCH, Some(&back)).await;
        }
        Effect::RenderSelector { intent, query, offset } => {
            admin_menu::open_selector(state, actor_id, chat_id, intent, &query, offset).await?;
        }
        Effect::ViewOnly => send(state, chat_id, "admin.pick", texts::VIEW_ONLY, Some(&home)).await,
        Effect::NotFound => send(state, chat_id, "admin.pick", texts::PICKED_NOT_FOUND, Some(&home)).await,
        Effect::Provision { name, days } => {
            let outcome = state.commands.add_account(&name, days).await;
            let text = if outcome.success() {
                tracing::info!(target = "admin.add", actor_id, account = %name, days, "account added");
                texts::user_added(&name, days)
            } else {
                texts::failure("add user", &name, &outcome.describe(MAX_DIAG_TAIL_CHARS))
            };
            send(state, chat_id, "admin.add", &text, Some(&home)).await;
        }
        Effect::ApplyExpiry { name, days, mode } => {
            let extend = mode == ExpiryMode::Extend;
            let now = now_ts();
            let result = if extend {
                state.lifecycle.extend_expiry_days(&name, days, now).await
            } else {
                state.lifecycle.set_expiry_days(&name, days, now).await
            };
            match result {
                Ok(record) => {
                    tracing::info!(target = "admin.term", actor_id, account = %name, days, extend, expire = record.expire, "term changed");
                    send(state, chat_id, "admin.term", &texts::term_updated(&name, days, extend), Some(&home)).await;
                    let until = format_datetime(record.expire).unwrap_or_else(|| "not set".into());
                    notify_bound_actors(state, &name, &texts::term_changed_notice(days, extend, &until)).await;
                }
                Err(e) => report_failure(state, chat_id, "update the term for", &name, &e).await,
            }
        }
        Effect::Apply { action, name } => apply_confirmed(state, actor_id, chat_id, action, &name).await?,
        Effect::Fallthrough => {}
    }
    Ok(())
}

async fn apply_confirmed(
    state: &AppState,
    actor_id: i64,
    chat_id: i64,
    action: ConfirmAction,
    name: &str,
) -> anyhow::Result<()> {
    let lifecycle = &state.lifecycle;
    let (result, what) = match action {
        ConfirmAction::Block => (lifecycle.set_suspended(name, true).await, "block"),
        ConfirmAction::Unblock => (lifecycle.set_suspended(name, false).await, "unblock"),
        ConfirmAction::TrialOff => (lifecycle.set_trial(name, false).await, "remove the trial of"),
        ConfirmAction::Delete => return delete_account(state, actor_id, chat_id, name).await,
    };
    let (done, notice) = match action {
        ConfirmAction::Block => (texts::blocked(name), texts::BLOCKED_NOTICE),
        ConfirmAction::Unblock => (texts::unblocked(name), texts::UNBLOCKED_NOTICE),
        _ => (texts::trial_removed(name), texts::TRIAL_OFF_NOTICE),
    };
    match result {
        Ok(_) => {
            tracing::info!(target = "admin.apply", actor_id, account = %name, action = ?action, "applied");
            send(state, chat_id, "admin.apply", &done, Some(&keyboards::admin())).await;
            notify_bound_actors(state, name, notice).await;
        }
        Err(e) => report_failure(state, chat_id, what, name, &e).await,
    }
    Ok(())
}

async fn delete_account(state: &AppState, actor_id: i64, chat_id: i64, name: &str) -> anyhow::Result<()> {
    let outcome = state.commands.delete_account(name).await;
    if !outcome.success() {
        let text = texts::failure("delete", name, &outcome.describe(MAX_DIAG_TAIL_CHARS));
        send(state, chat_id, "admin.delete", &text, Some(&keyboards::admin())).await;
        return Ok(());
    }
    notify_bound_actors(state, name, texts::DELETED_NOTICE).await;
    let removed = subscribers::delete_by_account(&state.db, name).await?;
    tracing::info!(target = "admin.delete", actor_id, account = %name, removed, "account deleted");
    send(state, chat_id, "admin.delete", &texts::deleted(name, removed), Some(&keyboards::admin())).await;
    Ok(())
}

async fn report_failure(state: &AppState, chat_id: i64, what: &str, name: &str, err: &LifecycleError) {
    tracing::warn!(target = "admin.apply", account = %name, error = %err, "mutation failed");
    let text = texts::failure(what, name, &err.to_string());
    send(state, chat_id, "admin.apply", &text, Some(&keyboards::admin())).await;
}
