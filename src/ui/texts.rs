//! Message bodies. Anything that interpolates data lives here so the flows
//! only decide *which* screen to show.
use crate::constants::MAX_DIAG_TAIL_CHARS;
use crate::interactions::selector::Page;
use crate::interactions::session::SelectIntent;
use crate::ui::style::*;
use crate::util::{days_left, format_date, truncate_chars};

pub const ADMINS_ONLY: &str = "This command is for administrators only.";
pub const CHOOSE_PLAN: &str = "Choose a plan:";
pub const UNKNOWN_PLAN: &str = "Unknown plan.";
pub const PROVISION_PENDING: &str = "⏳ Your subscription is still being created. This can take up to 1-2 minutes.";
pub const PROVISION_STARTED: &str =
    "⏳ Creating your subscription. This usually takes 30-90 seconds.\nI will send a message when it is ready.";
pub const NO_SUBSCRIPTION: &str = "Subscription not found. Send /start";
pub const INVOICE_FAILED: &str =
    "❌ Could not open Stars payment.\nCheck the payment settings in BotFather or try again later.";
pub const ASK_NEW_NAME: &str = "Adding a user\n\nEnter a name (latin letters, digits, . _ -):";
pub const ASK_SEARCH: &str = "Enter a user name or part of it to search:";
pub const INVALID_NAME: &str = "Invalid name. Allowed: A-Z a-z 0-9 . _ -";
pub const NAME_TAKEN: &str = "User already exists. Enter another name.";
pub const INVALID_DAYS: &str = "Invalid value. Enter a whole number of days > 0.";
pub const USE_CONFIRM_BUTTON: &str = "Confirm with the «✅ Confirm» button.";
pub const VIEW_ONLY: &str = "The list is for browsing and search only; no selection is needed.";
pub const PICKED_NOT_FOUND: &str = "User not found (possibly already deleted).";
pub const SECTION_USERS: &str = "«Users» section.\nChoose an action:";
pub const SECTION_ACCESS: &str = "«Access» section.\nChoose an action:";
pub const SECTION_SERVICE: &str = "«Service» section.\nChoose an action:";
pub const MONITOR_RECOVERED: &str = "✅ Monitoring: recovered. Healthcheck is OK again.";
pub const START_COMMAND_DESCRIPTION: &str = "Start using the bot";

pub fn greeting(name: &str) -> String {
    format!(
        "Hi, {name}!\nWelcome.\n\n\
         Start with «My subscription»:\n\
         it shows the expiry date and the link to connect.\n\n\
         Choose an action:"
    )
}

fn with_support(lead: &str, support_text: &str) -> String {
    format!("{lead}\n\n{support_text}")
}

pub fn registry_missing(support_text: &str) -> String {
    with_support("Your subscription was not found in the system. Contact support.", support_text)
}

/// "My subscription" screen, HTML formatted.
pub fn my_subscription(expire: i64, trial: bool, connect_url: &str, now: i64) -> String {
    let valid_line = match format_date(expire) {
        Some(date) => format!("<b>Valid until - {date} ({} d.)</b>", days_left(expire, now)),
        None => "<b>Valid until - not set</b>".to_string(),
    };
    let link_hint = format!("ℹ️ If the «Connect» button does not work, open this link:\n{connect_url}");
    match (trial, expire > now) {
        (true, true) => format!(
            "{EMOJI_TRIAL} Subscription status - <b>Trial access</b>\n{valid_line}\n\n\
             To keep using the service after the trial, extend your subscription via «{}».\n\n{link_hint}",
            bare(LABEL_PAY)
        ),
        (true, false) => format!(
            "{EMOJI_STOP} Subscription status - <b>Trial ended</b>\n{valid_line}\n\n\
             To restore access, pay for a subscription in «{}».",
            bare(LABEL_PAY)
        ),
        (false, _) => format!("{EMOJI_OK} Subscription status - <b>Active</b>\n{valid_line}\n\n{link_hint}"),
    }
}

pub fn pay_plan(months: u32, stars: u32) -> String {
    format!("Subscription payment for {months} mo.\n{stars} {EMOJI_STAR}")
}

pub fn admin_home(total: usize) -> String {
    format!("Admin\nTotal users: {total}\n\nChoose a section:")
}

pub fn metrics_failed(diag: &str) -> String {
    format!("{EMOJI_FAIL} Could not fetch node metrics.\n\n{diag}")
}

pub fn selector_title(intent: SelectIntent) -> &'static str {
    match intent {
        SelectIntent::View => "User list",
        SelectIntent::Edit => "Set term: choose a user",
        SelectIntent::Extend => "Extend term: choose a user",
        SelectIntent::Block => "Block: choose a user",
        SelectIntent::Unblock => "Unblock: choose a user",
        SelectIntent::TrialOff => "Remove trial: choose a user",
        SelectIntent::Delete => "Delete: choose a user",
    }
}

pub fn selector(intent: SelectIntent, page: &Page<'_>, query: &str) -> String {
    let filter_line = if query.is_empty() {
        String::new()
    } else {
        format!("\nFilter: {query}")
    };
    let body = if page.rows.is_empty() {
        "(empty)".to_string()
    } else {
        page.rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. {} | {} | {}",
                    page.offset + i + 1,
                    r.display,
                    format_date(r.expire).unwrap_or_else(|| "-".into()),
                    r.status.glyph()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{}\nTotal: {}{filter_line}\n\n{body}", selector_title(intent), page.total)
}

pub fn ask_add_days(name: &str) -> String {
    format!("Name: {name}\nEnter the term in days:")
}

pub fn ask_edit_days(name: &str, extend: bool) -> String {
    if extend {
        format!("User: {name}\nEnter how many days to add:")
    } else {
        format!("User: {name}\nEnter the new term in days:")
    }
}

pub fn ask_confirm(verb: &str, name: &str) -> String {
    format!("Confirm {verb} of user {name}?")
}

pub fn failure(what: &str, name: &str, diag: &str) -> String {
    format!(
        "{EMOJI_FAIL} Could not {what} {name}.\n\n{}",
        truncate_chars(diag, MAX_DIAG_TAIL_CHARS)
    )
}

pub fn user_added(name: &str, days: i64) -> String {
    format!("{EMOJI_OK} User added: {name}\nTerm: {days} d.")
}

pub fn term_updated(name: &str, days: i64, extend: bool) -> String {
    if extend {
        format!("{EMOJI_OK} Term extended: {name}\nAdded: {days} d.")
    } else {
        format!("{EMOJI_OK} Term updated: {name}\nNew term: {days} d.")
    }
}

pub fn term_changed_notice(days: i64, extend: bool, valid_until: &str) -> String {
    let what = if extend { "extended" } else { "updated" };
    format!(
        "{EMOJI_BELL} An administrator {what} your subscription term.\n\
         Days: {days}\nValid until: {valid_until}"
    )
}

pub const BLOCKED_NOTICE: &str =
    "⛔ An administrator changed your subscription status: access is temporarily suspended.\n\
     If this is a mistake, contact support.";
pub const UNBLOCKED_NOTICE: &str = "✅ An administrator changed your subscription status: access is restored.";
pub const TRIAL_OFF_NOTICE: &str = "🔔 An administrator turned off the trial status of your subscription.";
pub const DELETED_NOTICE: &str = "🗑 An administrator deleted your subscription.\nSend /start to get access again.";

pub fn blocked(name: &str) -> String {
    format!("{EMOJI_OK} User blocked: {name}")
}

pub fn unblocked(name: &str) -> String {
    format!("{EMOJI_OK} User unblocked: {name}")
}

pub fn trial_removed(name: &str) -> String {
    format!("{EMOJI_OK} Trial removed: {name}")
}

pub fn deleted(name: &str, rows: u64) -> String {
    format!("{EMOJI_OK} User deleted: {name}\nAlso removed from the bot directory ({rows} link(s)).")
}

pub fn provisioned(free_days: i64) -> String {
    format!(
        "{EMOJI_OK} Your subscription is ready.\n{EMOJI_TRIAL} Trial access: {free_days} d.\n\
         Open «{}» to connect.\nUse «{}» to extend.",
        bare(LABEL_MY_SUB),
        bare(LABEL_PAY)
    )
}

pub fn provision_failed(support_text: &str) -> String {
    with_support("❌ Could not create your subscription automatically. Contact support.", support_text)
}

pub fn new_user_alert(who: &str, account: &str, free_days: i64) -> String {
    format!("🆕 New user registered.\nUser: {who}\nAccount: {account}\nTrial: {free_days} d.")
}

pub fn provision_failed_alert(who: &str, account: &str, diag: &str) -> String {
    format!(
        "{EMOJI_ALARM} New user registration failed.\nUser: {who}\nAccount: {account}\n\n{}",
        truncate_chars(diag.trim(), MAX_DIAG_TAIL_CHARS)
    )
}

pub const TRIAL_ENDING_NOTICE: &str = "⏰ Your trial access ends soon (less than 6 hours).\n\
     To keep using the service without interruption, extend your subscription.";
pub const TRIAL_ENDED_NOTICE: &str = "⛔ Your trial access has ended.\nTo restore access, pay for a subscription.";

pub fn monitor_problem(body: &str) -> String {
    format!("{EMOJI_ALARM} Monitoring: problem on the service nodes.\n\n{body}")
}

pub fn payment_applied(months: u32, valid_until: &str) -> String {
    format!("{EMOJI_OK} Payment received. Subscription extended by {months} mo.\nValid until: {valid_until}")
}

pub fn payment_manual(support_text: &str) -> String {
    with_support("✅ Payment received. Contact support for manual activation.", support_text)
}

pub fn payment_not_applied(support_text: &str) -> String {
    with_support(
        "✅ Payment received.\n❌ Could not extend the term automatically, contact support.",
        support_text,
    )
}

pub fn payment_unmatched_alert(actor_id: i64, payload: &str) -> String {
    format!(
        "💳 Stars payment received, but auto-extension was not possible.\nactor_id={actor_id} payload={}",
        if payload.is_empty() { "-" } else { payload }
    )
}

pub fn payment_failed_alert(account: &str, actor_id: i64, payload: &str, diag: &str) -> String {
    format!(
        "💳 Payment received, but the extension did not apply.\nuser={account} actor_id={actor_id} payload={}\n{}",
        if payload.is_empty() { "-" } else { payload },
        truncate_chars(diag, MAX_DIAG_TAIL_CHARS)
    )
}
