//! Central UI labels and glyphs.
pub const EMOJI_BACK: &str = "⬅️";
pub const EMOJI_NEXT: &str = "➡️";
pub const EMOJI_OK: &str = "✅";
pub const EMOJI_FAIL: &str = "❌";
pub const EMOJI_TRIAL: &str = "🧪";
pub const EMOJI_STOP: &str = "⛔";
pub const EMOJI_BELL: &str = "🔔";
pub const EMOJI_ALARM: &str = "🚨";
pub const EMOJI_STAR: &str = "⭐";

// Menu captions. Typing one of these as plain text routes like the button.
pub const LABEL_MY_SUB: &str = "👤 My subscription";
pub const LABEL_PAY: &str = "💰 Pay for subscription";
pub const LABEL_SUPPORT: &str = "❓ Support";
pub const LABEL_ADMIN: &str = "🛠 Admin";
pub const LABEL_BACK: &str = "⬅️ Back";
pub const LABEL_NODE_STATUS: &str = "📊 Node status";

pub const LABEL_CANCEL: &str = "❌ Cancel";
pub const LABEL_CONFIRM: &str = "✅ Confirm";
pub const LABEL_CONNECT: &str = "🔌 Connect";
pub const LABEL_TO_TARIFFS: &str = "⬅️ To plans";
pub const LABEL_SUPPORT_CHAT: &str = "💬 Open chat with admin";
pub const LABEL_SEARCH: &str = "🔎 Search";

pub const LABEL_USERS: &str = "👥 Users";
pub const LABEL_ACCESS: &str = "🔐 Access";
pub const LABEL_SERVICE: &str = "🖥 Service";
pub const LABEL_LIST: &str = "📋 List";
pub const LABEL_ADD: &str = "➕ Add";
pub const LABEL_DELETE: &str = "🗑 Delete";
pub const LABEL_TERM: &str = "🗓 Set term";
pub const LABEL_EXTEND: &str = "⏩ Extend";
pub const LABEL_BLOCK: &str = "⛔ Block";
pub const LABEL_UNBLOCK: &str = "🔓 Unblock";
pub const LABEL_TRIAL_OFF: &str = "🏷 Remove trial";

/// Caption without its leading glyph: `"👤 My subscription"` -> `"My subscription"`.
pub fn bare(label: &str) -> &str {
    label.split_once(' ').map_or(label, |(_, rest)| rest)
}

/// True when `text` is the caption, with or without its glyph.
pub fn matches_label(text: &str, label: &str) -> bool {
    let text = text.trim();
    text == label || text == bare(label)
}
