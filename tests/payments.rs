//! Stars plans, invoices and the post-payment extension.
mod common;

use common::*;
use subscription_console::database::subscribers;
use subscription_console::handler;
use subscription_console::interactions::ids;
use subscription_console::services::payments::{PLANS, months_from_payload, plan_for};
use subscription_console::transport::Inbound;
use subscription_console::ui::texts;
use subscription_console::util::now_ts;

#[test]
fn payload_parsing() {
    assert_eq!(months_from_payload("sub_3m"), Some(3));
    assert_eq!(months_from_payload("  SUB_12M "), Some(12));
    assert_eq!(months_from_payload("sub_m"), None);
    assert_eq!(months_from_payload("sub_3"), None);
    assert_eq!(months_from_payload("donation"), None);
    for plan in PLANS {
        assert_eq!(months_from_payload(&plan.payload()), Some(plan.months));
    }
}

#[test]
fn plan_table() {
    let one = plan_for(1).unwrap();
    assert_eq!((one.stars, one.days), (250, 30));
    assert_eq!(plan_for(12).unwrap().days, 365);
    assert!(plan_for(2).is_none());
    let invoice = plan_for(6).unwrap().invoice();
    assert_eq!(invoice.currency, "XTR");
    assert_eq!(invoice.amount, 950);
    assert_eq!(invoice.payload, "sub_6m");
}

fn paid(from: &subscription_console::transport::Actor, payload: &str) -> Inbound {
    Inbound::Payment {
        actor: from.clone(),
        chat_id: from.id,
        payload: payload.to_string(),
    }
}

#[tokio::test]
async fn payment_extends_and_ends_trial() {
    let env = TestEnv::new().await;
    let user = actor(12, None);
    let expire = now_ts() + 5 * 86_400;
    env.seed(&[account("tg_12", expire, true, false)]);
    subscribers::upsert(&env.state.db, 12, None, "tg_12").await.unwrap();

    handler::handle(&env.state, paid(&user, "sub_1m")).await.unwrap();
    let record = env.find("tg_12");
    assert_eq!(record.expire, expire + 30 * 86_400);
    assert!(!record.trial);
    assert!(env.chat.last_to(12).text.contains("extended by 1 mo."));
    assert!(env.chat.sent_to(ADMIN_ID).is_empty());
}

#[tokio::test]
async fn payment_without_subscriber_alerts_admins() {
    let env = TestEnv::new().await;
    let stranger = actor(13, None);
    handler::handle(&env.state, paid(&stranger, "sub_3m")).await.unwrap();

    assert_eq!(env.chat.last_to(13).text, texts::payment_manual("Support: @helpdesk"));
    assert_eq!(env.chat.last_to(ADMIN_ID).text, texts::payment_unmatched_alert(13, "sub_3m"));
}

#[tokio::test]
async fn failed_extension_is_reported() {
    let env = TestEnv::new().await;
    let user = actor(14, None);
    subscribers::upsert(&env.state.db, 14, None, "tg_14").await.unwrap();
    env.seed(&[]);

    handler::handle(&env.state, paid(&user, "sub_1m")).await.unwrap();
    assert_eq!(env.chat.last_to(14).text, texts::payment_not_applied("Support: @helpdesk"));
    assert!(env.chat.last_to(ADMIN_ID).text.contains("tg_14"));
}

#[tokio::test]
async fn tariff_screens_and_invoice() {
    let env = TestEnv::new().await;
    let user = actor(15, None);

    handler::handle(&env.state, press(&user, ids::PAY)).await.unwrap();
    assert_eq!(env.chat.last_to(15).callbacks[0], ids::pay_tariff(1));

    handler::handle(&env.state, press(&user, &ids::pay_tariff(3))).await.unwrap();
    assert_eq!(env.chat.last_to(15).text, texts::pay_plan(3, 550));

    handler::handle(&env.state, press(&user, &ids::pay_invoice(3))).await.unwrap();
    let invoices = env.chat.invoices.lock().unwrap().clone();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].0, 15);
    assert_eq!(invoices[0].1.payload, "sub_3m");

    handler::handle(&env.state, press(&user, &ids::pay_tariff(2))).await.unwrap();
    assert_eq!(env.chat.last_to(15).text, texts::UNKNOWN_PLAN);
}

#[tokio::test]
async fn pre_checkout_is_always_approved() {
    let env = TestEnv::new().await;
    let query = Inbound::PreCheckout { query_id: "pc-1".into() };
    handler::handle(&env.state, query).await.unwrap();
    assert_eq!(env.chat.pre_checkouts.lock().unwrap().clone(), vec![("pc-1".to_string(), true)]);
}
