//! Centralized callback payload constants for inline keyboard buttons.
//! Payloads are persisted in chat history, so existing values must stay stable.

// User menu
pub const MAIN: &str = "main";
pub const MY_SUB: &str = "my_sub";
pub const PAY: &str = "pay";
pub const PAY_BACK: &str = "pay_back";
pub const PAY_TARIFF_PREFIX: &str = "pay_tariff_"; // followed by months
pub const PAY_INVOICE_PREFIX: &str = "pay_invoice_"; // followed by months
pub const SUPPORT: &str = "support";

// Admin sections
pub const ADMIN: &str = "admin";
pub const ADMIN_USERS: &str = "admin_users";
pub const ADMIN_ACCESS: &str = "admin_access";
pub const ADMIN_SERVICE: &str = "admin_service";
pub const ADMIN_CANCEL: &str = "admin_cancel";

// Admin actions
pub const ADMIN_LIST: &str = "admin_list";
pub const ADMIN_FIND: &str = "admin_find";
pub const ADMIN_ADD: &str = "admin_add";
pub const ADMIN_DEL: &str = "admin_del";
pub const ADMIN_EDIT: &str = "admin_edit";
pub const ADMIN_EXTEND: &str = "admin_extend";
pub const ADMIN_BLOCK: &str = "admin_block";
pub const ADMIN_UNBLOCK: &str = "admin_unblock";
pub const ADMIN_TRIAL_OFF: &str = "admin_trial_off";
pub const ADMIN_STATUS: &str = "admin_status";

// Confirmations
pub const CONFIRM_BLOCK: &str = "confirm_block";
pub const CONFIRM_UNBLOCK: &str = "confirm_unblock";
pub const CONFIRM_TRIAL_OFF: &str = "confirm_trial_off";
pub const CONFIRM_DELETE: &str = "confirm_delete";

// Selector
pub const SEL_PREV: &str = "sel_prev";
pub const SEL_NEXT: &str = "sel_next";
pub const SEL_FIND: &str = "sel_find";
pub const SEL_USER_PREFIX: &str = "sel_user:"; // followed by account name

// Slash commands
pub const CMD_START: &str = "/start";
pub const CMD_HEALTH: &str = "/health";

pub fn pay_tariff(months: u32) -> String {
    format!("{PAY_TARIFF_PREFIX}{months}")
}

pub fn pay_invoice(months: u32) -> String {
    format!("{PAY_INVOICE_PREFIX}{months}")
}

pub fn sel_user(name: &str) -> String {
    format!("{SEL_USER_PREFIX}{name}")
}

fn parse_months(id: &str, prefix: &str) -> Option<u32> {
    let rest = id.strip_prefix(prefix)?;
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// `pay_tariff_<months>` -> months.
pub fn parse_pay_tariff(id: &str) -> Option<u32> {
    parse_months(id, PAY_TARIFF_PREFIX)
}

/// `pay_invoice_<months>` -> months.
pub fn parse_pay_invoice(id: &str) -> Option<u32> {
    parse_months(id, PAY_INVOICE_PREFIX)
}

/// `sel_user:<name>` -> trimmed account name.
pub fn parse_sel_user(id: &str) -> Option<&str> {
    let name = id.strip_prefix(SEL_USER_PREFIX)?.trim();
    (!name.is_empty()).then_some(name)
}

pub fn is_start_command(text: &str) -> bool {
    text.trim_start().starts_with(CMD_START)
}
