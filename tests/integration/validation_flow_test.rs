// Validation round trips: stale response, conditional request, origin answer

use super::test_harness::{at, date, request, response, T};
use bytes::Bytes;
use http::{Method, StatusCode};
use kura::cache::{CachePolicy, ReuseDecision, ResponseTiming, ValidationOutcome};

#[test]
fn test_stale_response_revalidated_with_304() {
    let policy = CachePolicy::default();
    let stored_date = date(T);
    let stored = response(
        200,
        &[
            ("cache-control", "max-age=60"),
            ("date", stored_date.as_str()),
            ("etag", "\"v1\""),
            ("content-type", "text/html"),
        ],
        b"<html/>",
    );
    let req = request(Method::GET, "https://example.com/page", &[]);

    let decision = policy.reuse(&stored, &req, at(T + 120), ResponseTiming::new(at(T), at(T)));
    assert!(matches!(decision, ReuseDecision::MustValidate { .. }));

    // Conditional request carries the stored validator
    let conditional = policy.validation_request(&stored, &req);
    assert_eq!(conditional.headers()["if-none-match"], "\"v1\"");
    assert_eq!(conditional.uri(), req.uri());

    let refreshed_date = date(T + 120);
    let not_modified = response(
        304,
        &[
            ("date", refreshed_date.as_str()),
            ("cache-control", "max-age=300"),
            ("etag", "\"v1\""),
        ],
        b"",
    );

    let outcome = policy.process_validation_response(not_modified, stored);
    assert!(outcome.can_use_stored_response());
    let refreshed = outcome.into_response().unwrap();
    assert_eq!(refreshed.status(), StatusCode::OK);
    assert_eq!(refreshed.body(), &Bytes::from_static(b"<html/>"));
    assert_eq!(refreshed.headers()["content-type"], "text/html");
    assert_eq!(refreshed.headers()["cache-control"], "max-age=300");

    // Freshness restarts from the refreshed Date
    let timing = ResponseTiming::new(at(T + 120), at(T + 120));
    assert_eq!(
        policy.reuse(&refreshed, &req, at(T + 180), timing),
        ReuseDecision::Reuse { fresh: true }
    );
}

#[test]
fn test_last_modified_validator() {
    let policy = CachePolicy::default();
    let last_modified = date(T - 3600);
    let stored = response(200, &[("last-modified", last_modified.as_str())], b"");
    let req = request(Method::GET, "/r", &[]);

    let conditional = policy.validation_request(&stored, &req);
    assert_eq!(conditional.headers()["if-modified-since"], last_modified.as_str());
    assert!(!conditional.headers().contains_key("if-none-match"));
}

#[test]
fn test_modified_response_replaces_stored() {
    let policy = CachePolicy::default();
    let stored = response(200, &[("etag", "\"v1\"")], b"old");
    let fresh = response(200, &[("etag", "\"v2\"")], b"new");

    match policy.process_validation_response(fresh, stored) {
        ValidationOutcome::Modified(response) => {
            assert_eq!(response.body(), &Bytes::from_static(b"new"));
        }
        other => panic!("expected modified, got {}", other.kind()),
    }
}

#[test]
fn test_origin_failure_allows_stale() {
    let policy = CachePolicy::default();

    for status in [500, 502, 503, 504] {
        let stored = response(200, &[("etag", "\"v1\"")], b"old");
        let outcome = policy.process_validation_response(response(status, &[], b""), stored);
        assert!(matches!(
            outcome,
            ValidationOutcome::ServerError {
                can_serve_stale: true
            }
        ));
    }
}

#[test]
fn test_client_error_is_forwarded() {
    let policy = CachePolicy::default();
    let stored = response(200, &[("etag", "\"v1\"")], b"old");

    let outcome = policy.process_validation_response(response(410, &[], b"gone"), stored);
    assert!(!outcome.can_use_stored_response());
    assert_eq!(outcome.response().unwrap().status(), StatusCode::GONE);
}
