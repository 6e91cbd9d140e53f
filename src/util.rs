//! Misc small utilities shared across modules.
use chrono::{Local, TimeZone, Utc};

/// Current wall-clock time as epoch seconds.
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Truncate to at most `max` characters (not bytes), never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `14.03.2026` style date in the host's local zone; `None` for unset timestamps.
pub fn format_date(ts: i64) -> Option<String> {
    if ts <= 0 {
        return None;
    }
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%d.%m.%Y").to_string())
}

/// Full timestamp used in change notifications.
pub fn format_datetime(ts: i64) -> Option<String> {
    if ts <= 0 {
        return None;
    }
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %Z").to_string())
}

/// Whole days left, rounded up and never negative.
pub fn days_left(expire_ts: i64, now: i64) -> i64 {
    ((expire_ts - now + 86_399) / 86_400).max(0)
}

/// Account names accepted from administrators.
pub fn is_valid_account_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Strictly positive integer typed by an administrator.
pub fn parse_positive_days(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok().filter(|n| *n > 0)
}
