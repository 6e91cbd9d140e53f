//! Paginated account picker over the registry.
//!
//! Everything here is pure: the dispatcher loads the registry and the handle
//! map, this module filters, sorts, and slices.

use crate::constants::SELECT_PAGE_SIZE;
use crate::services::registry::AccountRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    OnlyActive,
    OnlyBlocked,
    OnlyTrial,
}

impl Filter {
    fn admits(self, c: &AccountRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::OnlyActive => !c.revoked,
            Filter::OnlyBlocked => c.revoked,
            Filter::OnlyTrial => c.trial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Suspended,
    Expired,
    Trial,
    Active,
}

impl RowStatus {
    pub fn of(c: &AccountRecord, now: i64) -> Self {
        if c.revoked {
            RowStatus::Suspended
        } else if c.is_expired(now) {
            RowStatus::Expired
        } else if c.trial {
            RowStatus::Trial
        } else {
            RowStatus::Active
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            RowStatus::Suspended => "⛔",
            RowStatus::Expired => "⌛",
            RowStatus::Trial => "🧪",
            RowStatus::Active => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRow {
    pub name: String,
    pub display: String,
    pub expire: i64,
    pub status: RowStatus,
}

/// `@handle` for bot-provisioned `tg_*` accounts whose owner has a known
/// handle, the raw account name otherwise.
pub fn display_name(name: &str, handles: &HashMap<String, String>) -> String {
    if name.starts_with("tg_")
        && let Some(handle) = handles.get(name)
    {
        let handle = handle.trim().trim_start_matches('@');
        if !handle.is_empty() {
            return format!("@{handle}");
        }
    }
    name.to_string()
}

pub fn build_rows(
    accounts: &[AccountRecord],
    handles: &HashMap<String, String>,
    query: &str,
    filter: Filter,
    now: i64,
) -> Vec<SelectorRow> {
    let needle = query.trim().to_lowercase();
    let mut rows: Vec<SelectorRow> = accounts
        .iter()
        .filter(|c| !c.name.trim().is_empty() && filter.admits(c))
        .filter_map(|c| {
            let name = c.name.trim();
            let display = display_name(name, handles);
            let haystack = format!("{name} {display}").to_lowercase();
            if !needle.is_empty() && !haystack.contains(&needle) {
                return None;
            }
            Some(SelectorRow {
                name: name.to_string(),
                display,
                expire: c.expire,
                status: RowStatus::of(c, now),
            })
        })
        .collect();
    rows.sort_by_cached_key(|r| r.display.to_lowercase());
    rows
}

/// An offset at or past the end snaps back to the last full page.
pub fn clamp_offset(offset: usize, total: usize) -> usize {
    if offset >= total {
        total.saturating_sub(SELECT_PAGE_SIZE)
    } else {
        offset
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub rows: &'a [SelectorRow],
    pub offset: usize,
    pub total: usize,
}

impl Page<'_> {
    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.rows.len() < self.total
    }
}

pub fn page(rows: &[SelectorRow], offset: usize) -> Page<'_> {
    let offset = clamp_offset(offset, rows.len());
    let end = (offset + SELECT_PAGE_SIZE).min(rows.len());
    Page {
        rows: &rows[offset..end],
        offset,
        total: rows.len(),
    }
}
