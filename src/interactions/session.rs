//! Admin dialogue state.
//!
//! Each variant carries only the fields that step needs. On disk a session is
//! a `(step, payload)` pair: the serde tag becomes the step column and the
//! remaining fields become the JSON payload object.

use crate::interactions::selector::Filter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the administrator is browsing the selector for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectIntent {
    View,
    Edit,
    Extend,
    Block,
    Unblock,
    TrialOff,
    #[serde(rename = "del")]
    Delete,
}

impl SelectIntent {
    pub fn filter(self) -> Filter {
        match self {
            SelectIntent::Block => Filter::OnlyActive,
            SelectIntent::Unblock => Filter::OnlyBlocked,
            SelectIntent::TrialOff => Filter::OnlyTrial,
            SelectIntent::View | SelectIntent::Edit | SelectIntent::Extend | SelectIntent::Delete => Filter::All,
        }
    }

    /// `View` lists accounts without offering per-row buttons.
    pub fn can_choose(self) -> bool {
        self != SelectIntent::View
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryMode {
    /// Expiry becomes now + N days.
    #[default]
    Set,
    /// Expiry becomes max(now, current expiry) + N days.
    Extend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum AdminSession {
    AddName,
    AddDays {
        name: String,
    },
    EditDays {
        name: String,
        #[serde(default)]
        mode: ExpiryMode,
    },
    #[serde(rename = "block_confirm")]
    ConfirmBlock { name: String },
    #[serde(rename = "unblock_confirm")]
    ConfirmUnblock { name: String },
    #[serde(rename = "trial_off_confirm")]
    ConfirmTrialOff { name: String },
    #[serde(rename = "del_confirm")]
    ConfirmDelete { name: String },
    #[serde(rename = "select_user")]
    Selecting {
        intent: SelectIntent,
        #[serde(default)]
        query: String,
        #[serde(default)]
        offset: usize,
    },
    SearchQuery {
        intent: SelectIntent,
    },
}

impl AdminSession {
    pub fn step(&self) -> &'static str {
        match self {
            AdminSession::AddName => "add_name",
            AdminSession::AddDays { .. } => "add_days",
            AdminSession::EditDays { .. } => "edit_days",
            AdminSession::ConfirmBlock { .. } => "block_confirm",
            AdminSession::ConfirmUnblock { .. } => "unblock_confirm",
            AdminSession::ConfirmTrialOff { .. } => "trial_off_confirm",
            AdminSession::ConfirmDelete { .. } => "del_confirm",
            AdminSession::Selecting { .. } => "select_user",
            AdminSession::SearchQuery { .. } => "search_query",
        }
    }

    /// Splits into the step tag and the JSON payload object.
    pub fn to_parts(&self) -> (String, String) {
        let mut payload = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        payload.remove("step");
        (self.step().to_string(), Value::Object(payload).to_string())
    }

    /// Inverse of [`to_parts`](Self::to_parts). A blank payload reads as `{}`.
    pub fn from_parts(step: &str, payload: &str) -> Result<Self, serde_json::Error> {
        let mut map: Map<String, Value> = if payload.trim().is_empty() {
            Map::new()
        } else {
            serde_json::from_str(payload)?
        };
        map.insert("step".into(), Value::String(step.to_string()));
        serde_json::from_value(Value::Object(map))
    }
}
