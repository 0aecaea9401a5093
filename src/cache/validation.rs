//! Validation of stored responses (RFC 9111 §4.3).
//!
//! Builds the conditional request sent to the origin and interprets whatever
//! comes back.

use http::header::{CONTENT_LENGTH, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use http::{HeaderMap, Request, Response};

use super::storage::{connection_nominated, is_hop_by_hop};

/// Build a conditional request that asks the origin whether `stored` is still
/// current.
///
/// The original request is copied. An `ETag` on the stored response becomes
/// `If-None-Match`; only when there is no ETag does `Last-Modified` become
/// `If-Modified-Since`. A stored response with neither validator yields a
/// plain copy of the original request.
///
/// # Example
/// ```rust
/// use http::{Request, Response};
/// use kura::cache::validation_request;
///
/// let stored = Response::builder()
///     .header("etag", "\"v1\"")
///     .header("last-modified", "Sun, 06 Nov 1994 08:49:37 GMT")
///     .body(())
///     .unwrap();
/// let original = Request::get("https://example.com/r").body(()).unwrap();
///
/// let conditional = validation_request(&stored, &original);
/// assert_eq!(conditional.headers()["if-none-match"], "\"v1\"");
/// assert!(!conditional.headers().contains_key("if-modified-since"));
/// ```
pub fn validation_request<A, B: Clone>(stored: &Response<A>, original: &Request<B>) -> Request<B> {
    let mut request = Request::new(original.body().clone());
    *request.method_mut() = original.method().clone();
    *request.uri_mut() = original.uri().clone();
    *request.version_mut() = original.version();
    *request.headers_mut() = original.headers().clone();

    let headers = request.headers_mut();
    if let Some(etag) = stored.headers().get(ETAG) {
        headers.remove(IF_NONE_MATCH);
        headers.append(IF_NONE_MATCH, etag.clone());
    } else if let Some(last_modified) = stored.headers().get(LAST_MODIFIED) {
        headers.remove(IF_MODIFIED_SINCE);
        headers.append(IF_MODIFIED_SINCE, last_modified.clone());
    }

    request
}

/// True when the stored response carries a validator usable in a
/// conditional request.
pub fn has_validator<A>(stored: &Response<A>) -> bool {
    stored.headers().contains_key(ETAG) || stored.headers().contains_key(LAST_MODIFIED)
}

/// Result of sending a conditional request to the origin.
#[derive(Debug)]
pub enum ValidationOutcome<B> {
    /// 304: the stored response, refreshed with the 304's headers
    NotModified(Response<B>),
    /// 2xx: the origin sent a replacement response
    Modified(Response<B>),
    /// 5xx: the origin failed; serving the stale response is permitted
    ServerError { can_serve_stale: bool },
    /// Any other status: hand the origin's response to the client
    ClientError(Response<B>),
}

impl<B> ValidationOutcome<B> {
    /// True when the host may answer from the (possibly refreshed) stored
    /// response.
    pub fn can_use_stored_response(&self) -> bool {
        matches!(
            self,
            ValidationOutcome::NotModified(_) | ValidationOutcome::ServerError { .. }
        )
    }

    /// Response to forward or store, when the outcome carries one.
    pub fn response(&self) -> Option<&Response<B>> {
        match self {
            ValidationOutcome::NotModified(response)
            | ValidationOutcome::Modified(response)
            | ValidationOutcome::ClientError(response) => Some(response),
            ValidationOutcome::ServerError { .. } => None,
        }
    }

    pub fn into_response(self) -> Option<Response<B>> {
        match self {
            ValidationOutcome::NotModified(response)
            | ValidationOutcome::Modified(response)
            | ValidationOutcome::ClientError(response) => Some(response),
            ValidationOutcome::ServerError { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationOutcome::NotModified(_) => "not-modified",
            ValidationOutcome::Modified(_) => "modified",
            ValidationOutcome::ServerError { .. } => "server-error",
            ValidationOutcome::ClientError(_) => "client-error",
        }
    }
}

/// Interpret the origin's answer to a conditional request.
///
/// A 304 keeps the stored status and body and takes over the 304's header
/// fields; a 2xx replaces the stored response outright; a 5xx allows serving
/// stale; anything else is passed back as a client error.
pub fn process_validation_response<B>(
    validation: Response<B>,
    stored: Response<B>,
) -> ValidationOutcome<B> {
    let status = validation.status();

    if status == http::StatusCode::NOT_MODIFIED {
        let mut updated = stored;
        merge_not_modified_headers(updated.headers_mut(), validation.headers());
        return ValidationOutcome::NotModified(updated);
    }

    if status.is_success() {
        return ValidationOutcome::Modified(validation);
    }

    if status.is_server_error() {
        return ValidationOutcome::ServerError {
            can_serve_stale: true,
        };
    }

    ValidationOutcome::ClientError(validation)
}

/// Update stored header fields from a 304 (RFC 9111 §3.2).
///
/// Each field in the 304 replaces every stored line of the same name; stored
/// fields the 304 does not mention stay. Content-Length, hop-by-hop fields
/// and fields named by the 304's Connection header describe the 304 message
/// itself and are skipped.
pub fn merge_not_modified_headers(stored: &mut HeaderMap, not_modified: &HeaderMap) {
    let nominated = connection_nominated(not_modified);
    for name in not_modified.keys() {
        if *name == CONTENT_LENGTH || is_hop_by_hop(name) || nominated.contains(name) {
            continue;
        }
        stored.remove(name);
        for value in not_modified.get_all(name) {
            stored.append(name.clone(), value.clone());
        }
    }
}
