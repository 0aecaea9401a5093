// Invalidation after unsafe requests

use super::test_harness::{request, response};
use http::Method;
use kura::cache::{CacheKey, CachePolicy, InvalidationTarget, Origin};

#[test]
fn test_post_invalidates_collection_and_created_item() {
    let policy = CachePolicy::default();
    let req = request(Method::POST, "https://api.example.com/items", &[]);
    let res = response(
        201,
        &[
            ("location", "/items/42"),
            ("content-location", "https://cdn.example.com/items/42"),
        ],
        b"",
    );

    let targets = policy.invalidation_targets(&req, &res, None);
    assert_eq!(
        targets,
        vec![
            InvalidationTarget::RequestTarget("https://api.example.com/items".to_string()),
            InvalidationTarget::Location("https://api.example.com/items/42".to_string()),
        ]
    );
}

#[test]
fn test_invalidation_target_matches_stored_key() {
    let policy = CachePolicy::default();
    let stored_req = request(Method::GET, "https://example.com/doc", &[]);
    let key = CacheKey::primary(&stored_req);

    let req = request(Method::DELETE, "https://example.com/doc", &[]);
    let targets = policy.invalidation_targets(&req, &response(204, &[], b""), None);

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].uri(), key.uri);
}

#[test]
fn test_failed_unsafe_request_invalidates_nothing() {
    let policy = CachePolicy::default();
    let req = request(Method::PUT, "/doc", &[]);
    assert!(policy
        .invalidation_targets(&req, &response(409, &[], b""), None)
        .is_empty());
    assert!(policy
        .invalidation_targets(&req, &response(502, &[], b""), None)
        .is_empty());
}

#[test]
fn test_safe_request_invalidates_nothing() {
    let policy = CachePolicy::default();
    let req = request(Method::GET, "/doc", &[]);
    let res = response(200, &[("content-location", "/doc.en")], b"");
    assert!(policy.invalidation_targets(&req, &res, None).is_empty());
}

#[test]
fn test_connection_origin_filters_foreign_location() {
    let policy = CachePolicy::default();
    let origin = Origin::new("https", "example.com", None);
    let req = request(Method::PUT, "/doc", &[]);
    let res = response(
        200,
        &[
            ("location", "https://evil.example/doc"),
            ("content-location", "https://example.com:443/doc"),
        ],
        b"",
    );

    let targets = policy.invalidation_targets(&req, &res, Some(&origin));
    assert_eq!(
        targets,
        vec![
            InvalidationTarget::RequestTarget("https://example.com/doc".to_string()),
            InvalidationTarget::ContentLocation("https://example.com/doc".to_string()),
        ]
    );
}
