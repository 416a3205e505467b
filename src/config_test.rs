use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[]));
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
}

#[test]
fn from_lookup_trims_trailing_slash() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(API_BASE_URL_VAR, "https://diary.example.test/api/")]));
    assert_eq!(cfg.base_url, "https://diary.example.test/api");
}

#[test]
fn from_lookup_blank_base_url_falls_back() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(API_BASE_URL_VAR, "   ")]));
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_lookup_parses_timeout_override() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_VAR, "42")]));
    assert_eq!(cfg.request_timeout, Duration::from_secs(42));
}

#[test]
fn from_lookup_bad_timeout_uses_default() {
    for raw in ["abc", "-1", "0", ""] {
        let cfg = ClientConfig::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_VAR, raw)]));
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS), "raw={raw:?}");
    }
}

#[test]
fn url_joins_paths_with_single_slash() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.url("/auth/token"), "http://127.0.0.1:8000/auth/token");
    assert_eq!(cfg.url("auth/me"), "http://127.0.0.1:8000/auth/me");
}

#[test]
fn url_passes_absolute_urls_through() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.url("https://other.test/x"), "https://other.test/x");
}

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_diary_env() {
    unsafe {
        std::env::remove_var(API_BASE_URL_VAR);
        std::env::remove_var(REQUEST_TIMEOUT_VAR);
    }
}

#[test]
fn from_env_reads_process_environment() {
    unsafe {
        clear_diary_env();
        std::env::set_var(API_BASE_URL_VAR, "http://10.0.0.5:9000/");
        std::env::set_var(REQUEST_TIMEOUT_VAR, "7");
    }

    let cfg = ClientConfig::from_env();
    assert_eq!(cfg.base_url, "http://10.0.0.5:9000");
    assert_eq!(cfg.request_timeout, Duration::from_secs(7));

    unsafe { clear_diary_env() };
}
