use std::collections::HashMap;
use subscription_console::interactions::selector::{Filter, RowStatus, build_rows, clamp_offset, display_name, page};
use subscription_console::interactions::session::SelectIntent;
use subscription_console::services::registry::AccountRecord;

const NOW: i64 = 1_700_000_000;

fn record(name: &str, expire: i64, trial: bool, revoked: bool) -> AccountRecord {
    let mut c = AccountRecord::new(name);
    c.expire = expire;
    c.trial = trial;
    c.revoked = revoked;
    c
}

/// A suspended, B on trial, C active.
fn fixture() -> (Vec<AccountRecord>, HashMap<String, String>) {
    let accounts = vec![
        record("alpha", NOW + 86_400, false, true),
        record("tg_200", NOW + 3_600, true, false),
        record("charlie", NOW + 86_400 * 30, false, false),
    ];
    let handles = HashMap::from([("tg_200".to_string(), "Bravo_Handle".to_string())]);
    (accounts, handles)
}

fn names(accounts: &[AccountRecord], handles: &HashMap<String, String>, query: &str, filter: Filter) -> Vec<String> {
    build_rows(accounts, handles, query, filter, NOW)
        .into_iter()
        .map(|r| r.name)
        .collect()
}

#[test]
fn intent_filters_pick_the_right_accounts() {
    let (accounts, handles) = fixture();
    assert_eq!(names(&accounts, &handles, "", SelectIntent::Unblock.filter()), ["alpha"]);
    assert_eq!(names(&accounts, &handles, "", SelectIntent::TrialOff.filter()), ["tg_200"]);
    assert_eq!(names(&accounts, &handles, "", SelectIntent::Block.filter()), ["tg_200", "charlie"]);
}

#[test]
fn handle_query_matches_regardless_of_intent() {
    let (accounts, handles) = fixture();
    for intent in [
        SelectIntent::View,
        SelectIntent::Edit,
        SelectIntent::Extend,
        SelectIntent::Block,
        SelectIntent::TrialOff,
        SelectIntent::Delete,
    ] {
        assert_eq!(names(&accounts, &handles, "bravo", intent.filter()), ["tg_200"], "{intent:?}");
    }
}

#[test]
fn rows_sort_by_display_and_carry_status() {
    let (accounts, handles) = fixture();
    let rows = build_rows(&accounts, &handles, "", Filter::All, NOW);
    let displays: Vec<&str> = rows.iter().map(|r| r.display.as_str()).collect();
    assert_eq!(displays, ["@Bravo_Handle", "alpha", "charlie"]);
    let statuses: Vec<RowStatus> = rows.iter().map(|r| r.status).collect();
    assert_eq!(statuses, [RowStatus::Trial, RowStatus::Suspended, RowStatus::Active]);

    let lapsed = record("old", NOW - 1, false, false);
    assert_eq!(RowStatus::of(&lapsed, NOW), RowStatus::Expired);
}

#[test]
fn display_name_only_resolves_bot_accounts() {
    let handles = HashMap::from([
        ("tg_1".to_string(), "@neo".to_string()),
        ("manual".to_string(), "someone".to_string()),
    ]);
    assert_eq!(display_name("tg_1", &handles), "@neo");
    assert_eq!(display_name("tg_2", &handles), "tg_2");
    assert_eq!(display_name("manual", &handles), "manual");
}

#[test]
fn paging_and_offset_clamping() {
    let accounts: Vec<AccountRecord> = (0..20).map(|i| record(&format!("user{i:02}"), 0, false, false)).collect();
    let rows = build_rows(&accounts, &HashMap::new(), "", Filter::All, NOW);

    let first = page(&rows, 0);
    assert_eq!(first.rows.len(), 8);
    assert!(!first.has_prev());
    assert!(first.has_next());

    let last = page(&rows, 16);
    assert_eq!(last.rows.len(), 4);
    assert!(last.has_prev());
    assert!(!last.has_next());

    let past_end = page(&rows, 24);
    assert_eq!(past_end.offset, 12);
    assert_eq!(past_end.rows.first().map(|r| r.name.as_str()), Some("user12"));

    assert_eq!(clamp_offset(5, 3), 0);
    assert_eq!(clamp_offset(0, 0), 0);
    assert_eq!(clamp_offset(8, 20), 8);
}
