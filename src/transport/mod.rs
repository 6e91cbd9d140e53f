//! Chat transport seam.
//!
//! Everything the bot needs from the messaging platform goes through the
//! `ChatApi` trait; the rest of the crate only sees `Inbound` events and
//! `Keyboard` values, never platform JSON.

pub mod telegram;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{method} rejected: {description}")]
    Api { method: String, description: String },
    #[error("could not decode {method} response: {detail}")]
    Decode { method: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    Callback { label: String, data: String },
    Url { label: String, url: String },
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Button::Callback {
            label: label.into(),
            data: data.into(),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Url {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Button::Callback { label, .. } | Button::Url { label, .. } => label,
        }
    }
}

/// Inline keyboard: rows of buttons, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn single(self, button: Button) -> Self {
        self.row(vec![button])
    }

    /// Callback payloads in display order.
    pub fn callbacks(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .filter_map(|b| match b {
                Button::Callback { data, .. } => Some(data.as_str()),
                Button::Url { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Actor {
    /// Username without `@`, if the actor has a non-blank one.
    pub fn handle(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(|u| u.trim().trim_start_matches('@'))
            .filter(|u| !u.is_empty())
    }

    /// `@username`, else the full name, else the numeric id.
    pub fn display_name(&self) -> String {
        if let Some(handle) = self.handle() {
            return format!("@{handle}");
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or("").trim(),
            self.last_name.as_deref().unwrap_or("").trim()
        );
        let full = full.trim();
        if full.is_empty() {
            self.id.to_string()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    PreCheckout {
        query_id: String,
    },
    /// A button press. `chat_id` is absent when the originating message is
    /// no longer available; the press is then only acknowledged.
    Callback {
        query_id: String,
        actor: Actor,
        chat_id: Option<i64>,
        data: String,
    },
    Payment {
        actor: Actor,
        chat_id: i64,
        payload: String,
    },
    Text {
        actor: Actor,
        chat_id: i64,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub update_id: i64,
    /// `None` for update kinds the bot does not handle.
    pub inbound: Option<Inbound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub title: String,
    pub description: String,
    pub payload: String,
    pub currency: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Long poll; returns once updates arrive or `timeout` elapses.
    async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>, ChatError>;

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
        html: bool,
    ) -> Result<(), ChatError>;

    async fn answer_callback(&self, query_id: &str) -> Result<(), ChatError>;

    async fn answer_pre_checkout(&self, query_id: &str, ok: bool, error: Option<&str>) -> Result<(), ChatError>;

    async fn send_invoice(&self, chat_id: i64, invoice: &Invoice) -> Result<(), ChatError>;

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChatError>;
}
