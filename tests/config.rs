use std::collections::HashMap;
use std::time::Duration;
use subscription_console::config::{Config, parse_handle_set, parse_id_set};

fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply() {
    let cfg = load(&[("BOT_TOKEN", "t")]).unwrap();
    assert_eq!(cfg.free_days, 1);
    assert_eq!(cfg.start_rate_limit, Duration::from_secs(30));
    assert_eq!(cfg.monitor_interval, Duration::from_secs(300));
    assert_eq!(cfg.monitor_cooldown, Duration::from_secs(1800));
    assert_eq!(cfg.trial_notice_interval, Duration::from_secs(300));
    assert!(cfg.monitor_enabled);
    assert_eq!(cfg.monitor_check_user, None);
    assert_eq!(cfg.primary_admin_id, 0);
    assert!(cfg.alert_recipients().is_empty());
}

#[test]
fn missing_token_is_an_error() {
    assert!(load(&[]).is_err());
    assert!(load(&[("BOT_TOKEN", "   ")]).is_err());
}

#[test]
fn malformed_integer_is_an_error() {
    let err = load(&[("BOT_TOKEN", "t"), ("FREE_DAYS", "three")]).unwrap_err();
    assert!(err.to_string().contains("FREE_DAYS"));
}

#[test]
fn base_url_and_menu_link() {
    let cfg = load(&[("BOT_TOKEN", "t"), ("BASE_URL", "https://vpn.example.org:8443///")]).unwrap();
    assert_eq!(cfg.menu_url("tg_1"), "https://vpn.example.org:8443/i/tg_1");
}

#[test]
fn admin_identity() {
    let cfg = load(&[
        ("BOT_TOKEN", "t"),
        ("ADMIN_TG_IDS", "5, 3, junk,,3"),
        ("ADMIN_TG_USERNAMES", "@Root"),
        ("PRIMARY_ADMIN_TG_ID", "9"),
        ("MONITOR_ENABLED", "0"),
    ])
    .unwrap();
    assert!(cfg.is_admin(9, None));
    assert!(cfg.is_admin(5, None));
    assert!(cfg.is_admin(100, Some("@ROOT")));
    assert!(!cfg.is_admin(100, Some("rooter")));
    assert!(!cfg.is_admin(100, None));
    assert_eq!(cfg.alert_recipients(), vec![3, 5, 9]);
    assert!(!cfg.monitor_enabled);
}

#[test]
fn list_parsing() {
    assert_eq!(parse_id_set("1,x, 2 ,-4").into_iter().collect::<Vec<_>>(), vec![-4, 1, 2]);
    assert_eq!(
        parse_handle_set(" @A , b,, ").into_iter().collect::<Vec<_>>(),
        vec!["a".to_string(), "b".to_string()]
    );
}
