//! Inline keyboards for every screen.
use crate::interactions::ids;
use crate::interactions::selector::Page;
use crate::services::payments::PLANS;
use crate::transport::Keyboard;
use crate::ui::buttons::Btn;
use crate::ui::style::*;
use crate::util::format_date;

pub fn main(is_admin: bool) -> Keyboard {
    let kb = Keyboard::new()
        .single(Btn::go(LABEL_MY_SUB, ids::MY_SUB))
        .single(Btn::go(LABEL_PAY, ids::PAY))
        .single(Btn::go(LABEL_SUPPORT, ids::SUPPORT));
    if is_admin {
        kb.single(Btn::go(LABEL_ADMIN, ids::ADMIN))
    } else {
        kb
    }
}

pub fn my_sub(connect_url: &str) -> Keyboard {
    Keyboard::new()
        .single(Btn::link(LABEL_CONNECT, connect_url))
        .single(Btn::go(LABEL_BACK, ids::MAIN))
}

pub fn pay() -> Keyboard {
    PLANS
        .iter()
        .fold(Keyboard::new(), |kb, p| {
            kb.single(Btn::go(
                &format!("{} mo • {} {EMOJI_STAR}", p.months, p.stars),
                &ids::pay_tariff(p.months),
            ))
        })
        .single(Btn::go(LABEL_BACK, ids::MAIN))
}

pub fn pay_plan(months: u32, stars: u32) -> Keyboard {
    Keyboard::new()
        .single(Btn::go(&format!("{EMOJI_STAR} Pay {stars}"), &ids::pay_invoice(months)))
        .single(Btn::go(LABEL_TO_TARIFFS, ids::PAY_BACK))
}

pub fn support(chat_url: &str) -> Keyboard {
    Keyboard::new().single(Btn::link(LABEL_SUPPORT_CHAT, chat_url))
}

pub fn admin() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Btn::go(LABEL_USERS, ids::ADMIN_USERS),
            Btn::go(LABEL_ACCESS, ids::ADMIN_ACCESS),
        ])
        .single(Btn::go(LABEL_SERVICE, ids::ADMIN_SERVICE))
        .single(Btn::go(LABEL_BACK, ids::MAIN))
}

pub fn admin_users() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Btn::go(LABEL_LIST, ids::ADMIN_LIST),
            Btn::go(LABEL_SEARCH, ids::ADMIN_FIND),
        ])
        .row(vec![
            Btn::go(LABEL_ADD, ids::ADMIN_ADD),
            Btn::go(LABEL_DELETE, ids::ADMIN_DEL),
        ])
        .single(Btn::go(LABEL_BACK, ids::ADMIN))
}

pub fn admin_access() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Btn::go(LABEL_TERM, ids::ADMIN_EDIT),
            Btn::go(LABEL_EXTEND, ids::ADMIN_EXTEND),
        ])
        .row(vec![
            Btn::go(LABEL_BLOCK, ids::ADMIN_BLOCK),
            Btn::go(LABEL_UNBLOCK, ids::ADMIN_UNBLOCK),
        ])
        .single(Btn::go(LABEL_TRIAL_OFF, ids::ADMIN_TRIAL_OFF))
        .single(Btn::go(LABEL_BACK, ids::ADMIN))
}

pub fn admin_service() -> Keyboard {
    Keyboard::new()
        .single(Btn::go(LABEL_NODE_STATUS, ids::ADMIN_STATUS))
        .single(Btn::go(LABEL_BACK, ids::ADMIN))
}

/// Shown while the admin is expected to type something.
pub fn admin_back() -> Keyboard {
    Keyboard::new()
        .single(Btn::go(LABEL_BACK, ids::ADMIN))
        .single(Btn::go(LABEL_CANCEL, ids::ADMIN_CANCEL))
}

pub fn confirm(action: &str) -> Keyboard {
    Keyboard::new()
        .single(Btn::go(LABEL_CONFIRM, action))
        .single(Btn::go(LABEL_CANCEL, ids::ADMIN_CANCEL))
}

pub fn selector(page: &Page<'_>, can_choose: bool) -> Keyboard {
    let mut kb = Keyboard::new();
    if can_choose {
        for r in page.rows {
            let label = format!(
                "{} {} | {}",
                r.status.glyph(),
                r.display,
                format_date(r.expire).unwrap_or_else(|| "-".into())
            );
            kb = kb.single(Btn::go(&label, &ids::sel_user(&r.name)));
        }
    }
    let mut nav = Vec::new();
    if page.has_prev() {
        nav.push(Btn::go(EMOJI_BACK, ids::SEL_PREV));
    }
    if page.has_next() {
        nav.push(Btn::go(EMOJI_NEXT, ids::SEL_NEXT));
    }
    kb.row(nav)
        .single(Btn::go(LABEL_SEARCH, ids::SEL_FIND))
        .single(Btn::go(LABEL_BACK, ids::ADMIN))
}
