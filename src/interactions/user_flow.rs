//! End-user screens: main menu, subscription status, support, payments,
//! and the `/start` provisioning request.
use crate::database::{jobs, sessions, subscribers};
use crate::interactions::util::{send, send_admin_alert, send_html};
use crate::model::AppState;
use crate::services::payments::{months_from_payload, plan_for};
use crate::transport::Actor;
use crate::ui::{keyboards, texts};
use crate::util::{format_datetime, now_ts};

fn main_kb(state: &AppState, actor: &Actor) -> crate::transport::Keyboard {
    keyboards::main(state.config.is_admin(actor.id, actor.handle()))
}

pub async fn show_main(state: &AppState, actor: &Actor, chat_id: i64) {
    let text = texts::greeting(&actor.display_name());
    send(state, chat_id, "user.main", &text, Some(&main_kb(state, actor))).await;
}

pub async fn show_my_subscription(state: &AppState, actor: &Actor, chat_id: i64) -> anyhow::Result<()> {
    let Some(sub) = subscribers::get(&state.db, actor.id).await? else {
        send(state, chat_id, "user.my_sub", texts::NO_SUBSCRIPTION, Some(&main_kb(state, actor))).await;
        return Ok(());
    };
    let Some(record) = state.registry.find(&sub.account_name).await? else {
        tracing::warn!(target = "user.my_sub", actor_id = actor.id, account = %sub.account_name, "bound account missing from registry");
        let text = texts::registry_missing(&state.config.support_text);
        send(state, chat_id, "user.my_sub", &text, Some(&main_kb(state, actor))).await;
        return Ok(());
    };
    let url = state.config.menu_url(&sub.account_name);
    let text = texts::my_subscription(record.expire, record.trial, &url, now_ts());
    send_html(state, chat_id, "user.my_sub", &text, Some(&keyboards::my_sub(&url))).await;
    Ok(())
}

pub async fn show_pay(state: &AppState, chat_id: i64) {
    send(state, chat_id, "user.pay", texts::CHOOSE_PLAN, Some(&keyboards::pay())).await;
}

pub async fn show_pay_plan(state: &AppState, chat_id: i64, months: u32) {
    let (text, kb) = match plan_for(months) {
        Some(plan) => (texts::pay_plan(plan.months, plan.stars), keyboards::pay_plan(plan.months, plan.stars)),
        None => (texts::UNKNOWN_PLAN.to_string(), keyboards::pay()),
    };
    send(state, chat_id, "user.pay_plan", &text, Some(&kb)).await;
}

pub async fn start_payment(state: &AppState, chat_id: i64, months: u32) {
    let Some(plan) = plan_for(months) else {
        send(state, chat_id, "user.invoice", texts::UNKNOWN_PLAN, Some(&keyboards::pay())).await;
        return;
    };
    if let Err(e) = state.chat.send_invoice(chat_id, &plan.invoice()).await {
        tracing::error!(target = "user.invoice", chat_id, months, error = %e, "sendInvoice failed");
        send(state, chat_id, "user.invoice", texts::INVOICE_FAILED, Some(&keyboards::pay())).await;
    }
}

pub async fn show_support(state: &AppState, chat_id: i64) {
    let kb = keyboards::support(&state.config.support_chat_url);
    send(state, chat_id, "user.support", &state.config.support_text, Some(&kb)).await;
}

/// `/start`: known subscribers get the menu (refreshing their activity time
/// at most once per rate-limit window); everyone else gets exactly one
/// provisioning job for the account `tg_<actor id>`.
pub async fn handle_start(state: &AppState, actor: &Actor, chat_id: i64) -> anyhow::Result<()> {
    sessions::clear(&state.db, actor.id).await?;

    if let Some(sub) = subscribers::get(&state.db, actor.id).await? {
        let window = state.config.start_rate_limit.as_secs() as i64;
        if now_ts() - sub.last_start_at >= window {
            subscribers::touch_start(&state.db, actor.id, actor.handle()).await?;
        }
        show_main(state, actor, chat_id).await;
        return Ok(());
    }

    if let Some(job) = jobs::active_job_for(&state.db, actor.id).await? {
        tracing::debug!(target = "user.start", actor_id = actor.id, job_id = job.id, status = %job.status, "provisioning already queued");
        send(state, chat_id, "user.start", texts::PROVISION_PENDING, Some(&main_kb(state, actor))).await;
        return Ok(());
    }

    let account = format!("tg_{}", actor.id);
    let job_id = jobs::enqueue(&state.db, actor.id, chat_id, actor.handle(), &account).await?;
    tracing::info!(target = "user.start", actor_id = actor.id, job_id, account = %account, "provisioning enqueued");
    send(state, chat_id, "user.start", texts::PROVISION_STARTED, Some(&main_kb(state, actor))).await;
    Ok(())
}

/// Stars checkout confirmation; always approved.
pub async fn handle_pre_checkout(state: &AppState, query_id: &str) {
    if let Err(e) = state.chat.answer_pre_checkout(query_id, true, None).await {
        tracing::error!(target = "user.pre_checkout", query_id = %query_id, error = %e, "answerPreCheckoutQuery failed");
    }
}

/// A completed Stars payment extends the payer's account and ends its trial.
pub async fn handle_payment(state: &AppState, actor: &Actor, chat_id: i64, payload: &str) -> anyhow::Result<()> {
    let payload = payload.trim().to_lowercase();
    let sub = subscribers::get(&state.db, actor.id).await?;
    let plan = months_from_payload(&payload).and_then(plan_for);
    let kb = main_kb(state, actor);

    let (Some(sub), Some(plan)) = (sub, plan) else {
        tracing::warn!(target = "user.payment", actor_id = actor.id, payload = %payload, "payment without subscriber or plan");
        send(state, chat_id, "user.payment", &texts::payment_manual(&state.config.support_text), Some(&kb)).await;
        send_admin_alert(state, &texts::payment_unmatched_alert(actor.id, &payload)).await;
        return Ok(());
    };

    match state.lifecycle.extend_expiry_days(&sub.account_name, plan.days, now_ts()).await {
        Ok(_) => {
            let record = match state.lifecycle.set_trial(&sub.account_name, false).await {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(target = "user.payment", account = %sub.account_name, error = %e, "trial flag not cleared after payment");
                    state.registry.find(&sub.account_name).await.ok().flatten()
                }
            };
            let until = record
                .and_then(|r| format_datetime(r.expire))
                .unwrap_or_else(|| "updated".into());
            tracing::info!(target = "user.payment", actor_id = actor.id, account = %sub.account_name, months = plan.months, "payment applied");
            send(state, chat_id, "user.payment", &texts::payment_applied(plan.months, &until), Some(&kb)).await;
        }
        Err(e) => {
            tracing::error!(target = "user.payment", actor_id = actor.id, account = %sub.account_name, error = %e, "payment extension failed");
            send(state, chat_id, "user.payment", &texts::payment_not_applied(&state.config.support_text), Some(&kb)).await;
            let alert = texts::payment_failed_alert(&sub.account_name, actor.id, &payload, &e.to_string());
            send_admin_alert(state, &alert).await;
        }
    }
    Ok(())
}
