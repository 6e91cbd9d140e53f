use crate::database::sessions;
use crate::interactions::admin_flow::{self, AdminEvent, ConfirmAction};
use crate::interactions::admin_menu::{self, Section};
use crate::interactions::session::{AdminSession, SelectIntent};
use crate::interactions::util::ack;
use crate::interactions::{ids, user_flow};
use crate::model::AppState;
use crate::transport::{Actor, Inbound};
use crate::ui::style::{
    LABEL_ADMIN, LABEL_BACK, LABEL_MY_SUB, LABEL_NODE_STATUS, LABEL_PAY, LABEL_SUPPORT, matches_label,
};
use std::str::FromStr;

/// A routed button press or typed alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Main,
    MySub,
    Pay,
    PayBack,
    PayTariff(u32),
    PayInvoice(u32),
    Support,
    Admin,
    AdminSection(Section),
    AdminCancel,
    AdminAdd,
    AdminFind,
    AdminStatus,
    AdminSelect(SelectIntent),
    Confirm(ConfirmAction),
    SelPrev,
    SelNext,
    SelFind,
    SelPick(String),
    Unknown,
}

impl FromStr for Action {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(months) = ids::parse_pay_tariff(s) {
            return Ok(Action::PayTariff(months));
        }
        if let Some(months) = ids::parse_pay_invoice(s) {
            return Ok(Action::PayInvoice(months));
        }
        if let Some(name) = ids::parse_sel_user(s) {
            return Ok(Action::SelPick(name.to_string()));
        }
        if let Some(action) = ConfirmAction::from_id(s) {
            return Ok(Action::Confirm(action));
        }
        let action = match s {
            ids::MAIN => Action::Main,
            ids::MY_SUB => Action::MySub,
            ids::PAY => Action::Pay,
            ids::PAY_BACK => Action::PayBack,
            ids::SUPPORT => Action::Support,
            ids::ADMIN => Action::Admin,
            ids::ADMIN_USERS => Action::AdminSection(Section::Users),
            ids::ADMIN_ACCESS => Action::AdminSection(Section::Access),
            ids::ADMIN_SERVICE => Action::AdminSection(Section::Service),
            ids::ADMIN_CANCEL => Action::AdminCancel,
            ids::ADMIN_ADD => Action::AdminAdd,
            ids::ADMIN_FIND => Action::AdminFind,
            ids::ADMIN_STATUS | ids::CMD_HEALTH => Action::AdminStatus,
            ids::ADMIN_LIST => Action::AdminSelect(SelectIntent::View),
            ids::ADMIN_EDIT => Action::AdminSelect(SelectIntent::Edit),
            ids::ADMIN_EXTEND => Action::AdminSelect(SelectIntent::Extend),
            ids::ADMIN_BLOCK => Action::AdminSelect(SelectIntent::Block),
            ids::ADMIN_UNBLOCK => Action::AdminSelect(SelectIntent::Unblock),
            ids::ADMIN_TRIAL_OFF => Action::AdminSelect(SelectIntent::TrialOff),
            ids::ADMIN_DEL => Action::AdminSelect(SelectIntent::Delete),
            ids::SEL_PREV => Action::SelPrev,
            ids::SEL_NEXT => Action::SelNext,
            ids::SEL_FIND => Action::SelFind,
            other => alias(other),
        };
        Ok(action)
    }
}

/// Menu captions typed as plain text.
fn alias(text: &str) -> Action {
    let table = [
        (LABEL_BACK, Action::Main),
        (LABEL_MY_SUB, Action::MySub),
        (LABEL_PAY, Action::Pay),
        (LABEL_SUPPORT, Action::Support),
        (LABEL_ADMIN, Action::Admin),
        (LABEL_NODE_STATUS, Action::AdminStatus),
    ];
    table
        .into_iter()
        .find(|(label, _)| matches_label(text, label))
        .map_or(Action::Unknown, |(_, action)| action)
}

impl Action {
    /// The dialogue event this action stands for, if any.
    fn as_admin_event(&self) -> Option<AdminEvent> {
        match self {
            Action::Confirm(a) => Some(AdminEvent::Confirm(*a)),
            Action::SelPrev => Some(AdminEvent::Prev),
            Action::SelNext => Some(AdminEvent::Next),
            Action::SelFind => Some(AdminEvent::Find),
            Action::SelPick(name) => Some(AdminEvent::Pick(name.clone())),
            Action::Unknown => Some(AdminEvent::Other),
            _ => None,
        }
    }
}

/// Routes one inbound event. Errors are returned to the ingestion loop,
/// which logs them and moves on to the next update.
pub async fn handle(state: &AppState, inbound: Inbound) -> anyhow::Result<()> {
    match inbound {
        Inbound::PreCheckout { query_id } => {
            user_flow::handle_pre_checkout(state, &query_id).await;
            Ok(())
        }
        Inbound::Callback {
            query_id,
            actor,
            chat_id,
            data,
        } => {
            let result = match chat_id {
                Some(chat_id) => on_callback(state, &actor, chat_id, &data).await,
                None => Ok(()),
            };
            ack(state, &query_id).await;
            result
        }
        Inbound::Payment { actor, chat_id, payload } => user_flow::handle_payment(state, &actor, chat_id, &payload).await,
        Inbound::Text { actor, chat_id, text } => on_text(state, &actor, chat_id, &text).await,
    }
}

/// The open dialogue of an administrator; non-admins never have one that counts.
async fn admin_session(state: &AppState, actor: &Actor) -> anyhow::Result<Option<AdminSession>> {
    if !state.config.is_admin(actor.id, actor.handle()) {
        return Ok(None);
    }
    Ok(sessions::load(&state.db, actor.id).await?)
}

async fn on_callback(state: &AppState, actor: &Actor, chat_id: i64, data: &str) -> anyhow::Result<()> {
    let action = Action::from_str(data).unwrap_or(Action::Unknown);
    if let Some(event) = action.as_admin_event()
        && let Some(session) = admin_session(state, actor).await?
        && admin_flow::handle_event(state, actor.id, chat_id, &session, &event).await?
    {
        return Ok(());
    }
    dispatch(state, actor, chat_id, action).await
}

async fn on_text(state: &AppState, actor: &Actor, chat_id: i64, text: &str) -> anyhow::Result<()> {
    if ids::is_start_command(text) {
        return user_flow::handle_start(state, actor, chat_id).await;
    }
    if let Some(session) = admin_session(state, actor).await?
        && admin_flow::handle_event(state, actor.id, chat_id, &session, &AdminEvent::Text(text.to_string())).await?
    {
        return Ok(());
    }
    let action = Action::from_str(text).unwrap_or(Action::Unknown);
    dispatch(state, actor, chat_id, action).await
}

async fn dispatch(state: &AppState, actor: &Actor, chat_id: i64, action: Action) -> anyhow::Result<()> {
    let db = &state.db;
    match action {
        Action::Main => {
            sessions::clear(db, actor.id).await?;
            user_flow::show_main(state, actor, chat_id).await;
        }
        Action::MySub => {
            sessions::clear(db, actor.id).await?;
            user_flow::show_my_subscription(state, actor, chat_id).await?;
        }
        Action::Pay => {
            sessions::clear(db, actor.id).await?;
            user_flow::show_pay(state, chat_id).await;
        }
        Action::PayBack => user_flow::show_pay(state, chat_id).await,
        Action::PayTariff(months) => user_flow::show_pay_plan(state, chat_id, months).await,
        Action::PayInvoice(months) => user_flow::start_payment(state, chat_id, months).await,
        Action::Support => {
            sessions::clear(db, actor.id).await?;
            user_flow::show_support(state, chat_id).await;
        }
        Action::Admin | Action::AdminCancel => {
            sessions::clear(db, actor.id).await?;
            admin_menu::show_home(state, actor, chat_id).await;
        }
        Action::AdminSection(section) => admin_menu::show_section(state, actor, chat_id, section).await,
        Action::AdminStatus => admin_menu::show_node_status(state, actor, chat_id).await,
        Action::AdminAdd => admin_menu::start_add(state, actor, chat_id).await?,
        Action::AdminFind => admin_menu::start_search(state, actor, chat_id, SelectIntent::View).await?,
        Action::AdminSelect(intent) => admin_menu::start_select(state, actor, chat_id, intent).await?,
        // Dialogue controls whose dialogue is gone: fall back to the menu.
        Action::Confirm(_)
        | Action::SelPrev
        | Action::SelNext
        | Action::SelFind
        | Action::SelPick(_)
        | Action::Unknown => user_flow::show_main(state, actor, chat_id).await,
    }
    Ok(())
}
