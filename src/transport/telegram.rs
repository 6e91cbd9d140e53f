//! Telegram Bot API client: JSON POSTs to `https://api.telegram.org/bot<token>/<method>`.

use super::{Actor, BotCommand, Button, ChatApi, ChatError, Inbound, Invoice, Keyboard, Update};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

const API_ROOT: &str = "https://api.telegram.org";
const CLIENT_TIMEOUT_SECS: u64 = 35;
const PRE_CHECKOUT_ERROR_MAX_CHARS: usize = 180;

pub struct TelegramApi {
    client: reqwest::Client,
    base: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base: format!("{API_ROOT}/bot{token}"),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: Value) -> Result<T, ChatError> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base))
            .json(&payload)
            .send()
            .await?;
        let body = resp.text().await?;
        decode_response(method, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ChatError> {
    let parsed: ApiResponse<T> = serde_json::from_str(body).map_err(|e| ChatError::Decode {
        method: method.to_string(),
        detail: format!("{e} | body={}", body.chars().take(400).collect::<String>()),
    })?;
    if !parsed.ok {
        return Err(ChatError::Api {
            method: method.to_string(),
            description: parsed.description.unwrap_or_else(|| "unknown error".into()),
        });
    }
    parsed.result.ok_or_else(|| ChatError::Decode {
        method: method.to_string(),
        detail: "missing result".into(),
    })
}

/// Decodes a raw `getUpdates` response body.
pub fn parse_updates(body: &str) -> Result<Vec<Update>, ChatError> {
    let raw: Vec<TgUpdate> = decode_response("getUpdates", body)?;
    Ok(raw.into_iter().map(Update::from).collect())
}

pub fn reply_markup(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| match b {
                    Button::Callback { label, data } => json!({ "text": label, "callback_data": data }),
                    Button::Url { label, url } => json!({ "text": label, "url": url }),
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    message: Option<TgMessage>,
    callback_query: Option<TgCallbackQuery>,
    pre_checkout_query: Option<TgPreCheckoutQuery>,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    from: Option<TgUser>,
    text: Option<String>,
    successful_payment: Option<TgSuccessfulPayment>,
}

#[derive(Debug, Deserialize)]
struct TgSuccessfulPayment {
    #[serde(default)]
    invoice_payload: String,
}

#[derive(Debug, Deserialize)]
struct TgCallbackQuery {
    id: String,
    from: TgUser,
    message: Option<TgMessage>,
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgPreCheckoutQuery {
    id: String,
}

impl From<TgUser> for Actor {
    fn from(u: TgUser) -> Self {
        Actor {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

impl From<TgUpdate> for Update {
    fn from(u: TgUpdate) -> Self {
        Update {
            update_id: u.update_id,
            inbound: inbound_of(u.message, u.callback_query, u.pre_checkout_query),
        }
    }
}

fn inbound_of(
    message: Option<TgMessage>,
    callback: Option<TgCallbackQuery>,
    pre_checkout: Option<TgPreCheckoutQuery>,
) -> Option<Inbound> {
    if let Some(q) = pre_checkout {
        return Some(Inbound::PreCheckout { query_id: q.id });
    }
    if let Some(cq) = callback {
        return Some(Inbound::Callback {
            query_id: cq.id,
            actor: cq.from.into(),
            chat_id: cq.message.map(|m| m.chat.id),
            data: cq.data.unwrap_or_default().trim().to_string(),
        });
    }
    let msg = message?;
    if let Some(payment) = msg.successful_payment {
        return Some(Inbound::Payment {
            actor: msg.from.map(Actor::from).unwrap_or_default(),
            chat_id: msg.chat.id,
            payload: payment.invoice_payload,
        });
    }
    let text = msg.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    Some(Inbound::Text {
        actor: msg.from?.into(),
        chat_id: msg.chat.id,
        text: text.to_string(),
    })
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>, ChatError> {
        let raw: Vec<TgUpdate> = self
            .call("getUpdates", json!({ "timeout": timeout.as_secs(), "offset": offset }))
            .await?;
        Ok(raw.into_iter().map(Update::from).collect())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
        html: bool,
    ) -> Result<(), ChatError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if let Some(kb) = keyboard {
            payload["reply_markup"] = reply_markup(kb);
        }
        if html {
            payload["parse_mode"] = json!("HTML");
        }
        self.call::<Value>("sendMessage", payload).await.map(|_| ())
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), ChatError> {
        self.call::<Value>("answerCallbackQuery", json!({ "callback_query_id": query_id }))
            .await
            .map(|_| ())
    }

    async fn answer_pre_checkout(&self, query_id: &str, ok: bool, error: Option<&str>) -> Result<(), ChatError> {
        let mut payload = json!({ "pre_checkout_query_id": query_id, "ok": ok });
        if !ok && let Some(err) = error.filter(|e| !e.is_empty()) {
            payload["error_message"] = json!(err.chars().take(PRE_CHECKOUT_ERROR_MAX_CHARS).collect::<String>());
        }
        self.call::<Value>("answerPreCheckoutQuery", payload).await.map(|_| ())
    }

    async fn send_invoice(&self, chat_id: i64, invoice: &Invoice) -> Result<(), ChatError> {
        let payload = json!({
            "chat_id": chat_id,
            "title": invoice.title,
            "description": invoice.description,
            "payload": invoice.payload,
            "currency": invoice.currency,
            "prices": [{ "label": invoice.title, "amount": invoice.amount }],
        });
        self.call::<Value>("sendInvoice", payload).await.map(|_| ())
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChatError> {
        let list: Vec<Value> = commands
            .iter()
            .map(|c| json!({ "command": c.command, "description": c.description }))
            .collect();
        self.call::<Value>("setMyCommands", json!({ "commands": list }))
            .await
            .map(|_| ())
    }
}
