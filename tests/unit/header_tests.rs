// Header field model tests through the public API

use http::HeaderMap;
use kura::cache::{parse_http_date, Age, CacheControl, Expires, MaxStale, Private, Vary};
use rstest::rstest;
use std::time::{Duration, UNIX_EPOCH};

fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(*name, value.parse().unwrap());
    }
    map
}

#[test]
fn test_cache_control_across_multiple_lines() {
    let map = headers(&[
        ("cache-control", "public"),
        ("cache-control", "max-age=60, stale-while-revalidate=30"),
    ]);
    let cc = CacheControl::from_headers(&map);
    assert!(cc.public);
    assert_eq!(cc.max_age, Some(Duration::from_secs(60)));
    assert_eq!(cc.stale_while_revalidate, Some(Duration::from_secs(30)));
}

#[test]
fn test_cache_control_unknown_and_malformed_directives() {
    let cc = CacheControl::parse("community=\"UCI\", max-age=abc, no-store");
    assert!(cc.no_store);
    assert_eq!(cc.max_age, None);
}

#[test]
fn test_cache_control_three_state_directives() {
    let cc = CacheControl::parse("max-stale, private");
    assert_eq!(cc.max_stale, MaxStale::Unbounded);
    assert_eq!(cc.private, Private::Whole);

    let cc = CacheControl::parse("max-stale=5, private=\"set-cookie, x-user\"");
    assert_eq!(cc.max_stale, MaxStale::Bounded(Duration::from_secs(5)));
    assert_eq!(
        cc.private,
        Private::Fields(vec!["set-cookie".to_string(), "x-user".to_string()])
    );

    let cc = CacheControl::parse("");
    assert_eq!(cc.max_stale, MaxStale::Absent);
    assert_eq!(cc.private, Private::Absent);
    assert!(cc.is_empty());
}

#[rstest]
#[case("max-age=99999999999999999999", 2_147_483_648)]
#[case("max-age=2147483648", 2_147_483_648)]
#[case("max-age=0", 0)]
fn test_delta_seconds_overflow_clamps(#[case] text: &str, #[case] secs: u64) {
    assert_eq!(
        CacheControl::parse(text).max_age,
        Some(Duration::from_secs(secs))
    );
}

#[rstest]
#[case("Sun, 06 Nov 1994 08:49:37 GMT")]
#[case("Sunday, 06-Nov-94 08:49:37 GMT")]
#[case("Sun Nov  6 08:49:37 1994")]
fn test_http_date_forms(#[case] text: &str) {
    assert_eq!(
        parse_http_date(text),
        Some(UNIX_EPOCH + Duration::from_secs(784_111_777))
    );
}

#[test]
fn test_invalid_expires_is_absent() {
    let map = headers(&[("expires", "0")]);
    assert!(Expires::from_headers(&map).is_none());
}

#[test]
fn test_age_header() {
    assert_eq!(Age::parse("120").map(|a| a.as_secs()), Some(120));
    assert!(Age::parse("-1").is_none());
    assert!(Age::parse("1.5").is_none());
}

#[test]
fn test_vary_matching() {
    let vary = Vary::parse("Accept-Encoding").unwrap();
    let gzip = headers(&[("accept-encoding", "gzip")]);
    let br = headers(&[("accept-encoding", "br")]);

    assert!(vary.matches(&gzip, &gzip));
    assert!(!vary.matches(&gzip, &br));
    assert!(!Vary::Any.matches(&gzip, &gzip));
}
