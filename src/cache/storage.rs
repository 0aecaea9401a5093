//! Storage eligibility (RFC 9111 §3).
//!
//! Decides whether a response may be stored at all. Rules are checked in a
//! fixed order and the first failing rule is the reported reason.

use http::header::{AUTHORIZATION, CONNECTION, EXPIRES};
use http::{HeaderMap, HeaderName, Method, Request, Response};
use serde::Serialize;
use std::fmt;

use super::control::CacheControl;
use crate::constants::{HEURISTICALLY_CACHEABLE_STATUSES, HOP_BY_HOP_HEADERS};

/// Why a response may not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IneligibleReason {
    /// Request method is not one the cache stores responses for
    MethodNotUnderstood,
    /// Response is informational (1xx)
    StatusNotFinal,
    /// Response carries `no-store`
    NoStoreDirective,
    /// Shared cache and the response carries `private`
    PrivateDirectiveInSharedCache,
    /// Shared cache, authorized request, and no permission to share
    AuthorizedRequestWithoutSharingPermission,
    /// Nothing marks the response as cacheable
    NoCacheabilityIndicator,
}

impl IneligibleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IneligibleReason::MethodNotUnderstood => "method-not-understood",
            IneligibleReason::StatusNotFinal => "status-not-final",
            IneligibleReason::NoStoreDirective => "no-store-directive",
            IneligibleReason::PrivateDirectiveInSharedCache => "private-directive-in-shared-cache",
            IneligibleReason::AuthorizedRequestWithoutSharingPermission => {
                "authorized-request-without-sharing-permission"
            }
            IneligibleReason::NoCacheabilityIndicator => "no-cacheability-indicator",
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a storage eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "kebab-case")]
pub enum Storability {
    Eligible,
    Ineligible(IneligibleReason),
}

impl Storability {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Storability::Eligible)
    }

    pub fn reason(&self) -> Option<IneligibleReason> {
        match self {
            Storability::Eligible => None,
            Storability::Ineligible(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for Storability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storability::Eligible => f.write_str("eligible"),
            Storability::Ineligible(reason) => write!(f, "ineligible ({})", reason),
        }
    }
}

/// Methods whose responses the cache knows how to store.
pub fn is_understood_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::POST
}

/// Check whether `response` to `request` may be stored.
///
/// # Example
/// ```rust
/// use http::{Request, Response};
/// use kura::cache::{is_storable, IneligibleReason, Storability};
///
/// let request = Request::get("https://example.com/").body(()).unwrap();
/// let response = Response::builder()
///     .header("cache-control", "private, max-age=60")
///     .body(())
///     .unwrap();
/// assert_eq!(is_storable(&request, &response, false), Storability::Eligible);
/// assert_eq!(
///     is_storable(&request, &response, true),
///     Storability::Ineligible(IneligibleReason::PrivateDirectiveInSharedCache)
/// );
/// ```
pub fn is_storable<A, B>(
    request: &Request<A>,
    response: &Response<B>,
    shared: bool,
) -> Storability {
    match check(request, response, shared) {
        Ok(()) => Storability::Eligible,
        Err(reason) => Storability::Ineligible(reason),
    }
}

fn check<A, B>(
    request: &Request<A>,
    response: &Response<B>,
    shared: bool,
) -> Result<(), IneligibleReason> {
    if !is_understood_method(request.method()) {
        return Err(IneligibleReason::MethodNotUnderstood);
    }

    if response.status().is_informational() {
        return Err(IneligibleReason::StatusNotFinal);
    }

    let cc = CacheControl::from_headers(response.headers());
    if cc.no_store {
        return Err(IneligibleReason::NoStoreDirective);
    }

    if shared && cc.private.is_present() {
        return Err(IneligibleReason::PrivateDirectiveInSharedCache);
    }

    if shared
        && request.headers().contains_key(AUTHORIZATION)
        && !(cc.public || cc.must_revalidate || cc.s_maxage.is_some())
    {
        return Err(IneligibleReason::AuthorizedRequestWithoutSharingPermission);
    }

    let has_indicator = cc.public
        || cc.private.is_present()
        || cc.max_age.is_some()
        || cc.s_maxage.is_some()
        || response.headers().contains_key(EXPIRES)
        || HEURISTICALLY_CACHEABLE_STATUSES.contains(&response.status());
    if !has_indicator {
        return Err(IneligibleReason::NoCacheabilityIndicator);
    }

    Ok(())
}

/// Remove connection-specific fields before a response is stored.
///
/// Drops the fixed hop-by-hop set and every field the Connection header names.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in connection_nominated(headers) {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}

/// Field names listed in the Connection header of `headers`.
pub(crate) fn connection_nominated(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect()
}

/// True for header fields that never leave a single connection.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}
