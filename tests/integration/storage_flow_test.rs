// Storage eligibility across methods, statuses and cache kinds

use super::test_harness::{request, response};
use http::{HeaderMap, Method};
use kura::cache::{
    is_storable, strip_hop_by_hop, CacheKey, CachePolicy, IneligibleReason, Storability, Vary,
};
use kura::config::PolicyConfig;
use rstest::rstest;

#[rstest]
#[case(Method::GET)]
#[case(Method::HEAD)]
#[case(Method::POST)]
fn test_no_store_is_never_storable(#[case] method: Method) {
    let req = request(method, "/r", &[]);
    let res = response(200, &[("cache-control", "no-store, max-age=60")], b"");
    for shared in [false, true] {
        assert_eq!(
            is_storable(&req, &res, shared),
            Storability::Ineligible(IneligibleReason::NoStoreDirective)
        );
    }
}

#[test]
fn test_unknown_method_is_not_storable() {
    let req = request(Method::PUT, "/r", &[]);
    let res = response(200, &[("cache-control", "max-age=60")], b"");
    assert_eq!(
        is_storable(&req, &res, false).reason(),
        Some(IneligibleReason::MethodNotUnderstood)
    );
}

#[rstest]
#[case(200, true)]
#[case(301, true)]
#[case(404, true)]
#[case(302, false)]
#[case(500, false)]
fn test_default_cacheable_statuses(#[case] status: u16, #[case] eligible: bool) {
    let req = request(Method::GET, "/r", &[]);
    let res = response(status, &[], b"");
    assert_eq!(is_storable(&req, &res, false).is_eligible(), eligible);
}

#[test]
fn test_shared_cache_and_authorization() {
    let policy = CachePolicy::new(PolicyConfig::shared_cache());
    let req = request(Method::GET, "/r", &[("authorization", "Bearer token")]);

    let res = response(200, &[("cache-control", "max-age=60")], b"");
    assert_eq!(
        policy.is_storable(&req, &res).reason(),
        Some(IneligibleReason::AuthorizedRequestWithoutSharingPermission)
    );

    let res = response(200, &[("cache-control", "public, max-age=60")], b"");
    assert!(policy.is_storable(&req, &res).is_eligible());

    let private = CachePolicy::new(PolicyConfig::private_cache());
    let res = response(200, &[("cache-control", "max-age=60")], b"");
    assert!(private.is_storable(&req, &res).is_eligible());
}

#[test]
fn test_storable_response_is_stripped_and_keyed() {
    let req = request(
        Method::GET,
        "https://example.com/r",
        &[("accept-encoding", "gzip")],
    );
    let mut res = response(
        200,
        &[
            ("cache-control", "max-age=60"),
            ("vary", "Accept-Encoding"),
            ("connection", "x-hop"),
            ("x-hop", "1"),
            ("transfer-encoding", "chunked"),
            ("content-type", "text/plain"),
        ],
        b"",
    );
    assert!(is_storable(&req, &res, true).is_eligible());

    strip_hop_by_hop(res.headers_mut());
    let headers: &HeaderMap = res.headers();
    assert!(!headers.contains_key("connection"));
    assert!(!headers.contains_key("x-hop"));
    assert!(!headers.contains_key("transfer-encoding"));
    assert!(headers.contains_key("content-type"));

    let vary = Vary::from_headers(res.headers());
    let key = CacheKey::for_request(&req, vary.as_ref()).unwrap();
    assert_eq!(
        key.to_string(),
        "GET https://example.com/r accept-encoding=gzip"
    );
}

#[test]
fn test_storability_serializes_for_logs() {
    let value = serde_json::to_value(Storability::Ineligible(
        IneligibleReason::NoCacheabilityIndicator,
    ))
    .unwrap();
    assert_eq!(value["decision"], "ineligible");
    assert_eq!(value["reason"], "no-cacheability-indicator");
}
