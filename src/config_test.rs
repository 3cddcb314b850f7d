use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, ()> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned().ok_or(())
}

#[test]
fn empty_environment_yields_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, "http://localhost:8000");
    assert_eq!(cfg.session.startup_grace, Duration::from_millis(100));
    assert_eq!(cfg.session.login_settle, Duration::from_millis(200));
    assert_eq!(cfg.queries.retry.max_retries, 2);
}

#[test]
fn overrides_are_parsed() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("ONLEARN_API_URL", "https://api.example.test/"),
        ("ONLEARN_REQUEST_TIMEOUT_SECS", "5"),
        ("ONLEARN_STARTUP_GRACE_MS", "0"),
        ("ONLEARN_LOGIN_SETTLE_MS", " 50 "),
        ("ONLEARN_QUERY_STALE_SECS", "120"),
        ("ONLEARN_QUERY_MAX_RETRIES", "4"),
        ("ONLEARN_RETRY_MAX_MS", "8000"),
    ]))
    .unwrap();

    assert_eq!(cfg.base_url, "https://api.example.test");
    assert_eq!(cfg.timeouts.request, Duration::from_secs(5));
    assert_eq!(cfg.timeouts.connect, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    assert_eq!(cfg.session.startup_grace, Duration::ZERO);
    assert_eq!(cfg.session.login_settle, Duration::from_millis(50));
    assert_eq!(cfg.queries.stale_time, Duration::from_secs(120));
    assert_eq!(cfg.queries.retry.max_retries, 4);
    assert_eq!(cfg.queries.retry.max_delay, Duration::from_millis(8000));
}

#[test]
fn unparsable_number_is_reported() {
    let err = ClientConfig::from_lookup(lookup_from(&[("ONLEARN_LOGIN_SETTLE_MS", "soon")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidNumber { var: "ONLEARN_LOGIN_SETTLE_MS", value: "soon".to_owned() }
    );
}

#[test]
fn base_url_without_scheme_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("ONLEARN_API_URL", "localhost:8000")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
}

#[test]
fn zero_timings_disable_settle_delays() {
    let timings = SessionTimings::zero();
    assert_eq!(timings.startup_grace, Duration::ZERO);
    assert_eq!(timings.login_settle, Duration::ZERO);
}

#[test]
fn base_url_override_is_normalized() {
    let cfg = ClientConfig::default().with_base_url("https://courses.example.test//").unwrap();
    assert_eq!(cfg.base_url, "https://courses.example.test");
    assert_eq!(
        ClientConfig::default().with_base_url("ftp://nope"),
        Err(ConfigError::InvalidBaseUrl("ftp://nope".to_owned()))
    );
}
