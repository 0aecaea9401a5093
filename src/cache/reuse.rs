//! Reuse conditions for stored responses (RFC 9111 §4.2, §5.2).
//!
//! Given the age and freshness lifetime of a stored response, decide whether
//! it may be served as is, served stale, or must be validated first.
//!
//! `stale-if-error` is not consulted here. It only applies once a validation
//! attempt itself has failed, which is up to the host.

use http::{Request, Response};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::control::{CacheControl, MaxStale};

/// Why a stored response has to be validated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationReason {
    RequestNoCacheDirective,
    ResponseNoCacheDirective,
    ExceedsRequestMaxAge,
    InsufficientRemainingFreshness,
    MustRevalidateDirective,
    ProxyRevalidateDirective,
    ExceedsMaxStale,
    StaleWithoutPermission,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationReason::RequestNoCacheDirective => "request-no-cache-directive",
            ValidationReason::ResponseNoCacheDirective => "response-no-cache-directive",
            ValidationReason::ExceedsRequestMaxAge => "exceeds-request-max-age",
            ValidationReason::InsufficientRemainingFreshness => "insufficient-remaining-freshness",
            ValidationReason::MustRevalidateDirective => "must-revalidate-directive",
            ValidationReason::ProxyRevalidateDirective => "proxy-revalidate-directive",
            ValidationReason::ExceedsMaxStale => "exceeds-max-stale",
            ValidationReason::StaleWithoutPermission => "stale-without-permission",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether and how a stored response may be used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", rename_all = "kebab-case")]
pub enum ReuseDecision {
    /// Serve the stored response; `fresh` is false when serving it stale
    /// because the client accepts staleness
    Reuse { fresh: bool },
    /// Serve the stale response and revalidate in the background
    ReuseStaleWhileRevalidating,
    /// Validate with the origin before serving
    MustValidate { reason: ValidationReason },
}

impl ReuseDecision {
    /// True when the stored response may be served without waiting on the origin.
    pub fn allows_reuse(&self) -> bool {
        !matches!(self, ReuseDecision::MustValidate { .. })
    }

    pub fn validation_reason(&self) -> Option<ValidationReason> {
        match self {
            ReuseDecision::MustValidate { reason } => Some(*reason),
            _ => None,
        }
    }

    fn must_validate(reason: ValidationReason) -> Self {
        ReuseDecision::MustValidate { reason }
    }
}

impl fmt::Display for ReuseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReuseDecision::Reuse { fresh: true } => f.write_str("reuse (fresh)"),
            ReuseDecision::Reuse { fresh: false } => f.write_str("reuse (stale)"),
            ReuseDecision::ReuseStaleWhileRevalidating => {
                f.write_str("reuse (stale-while-revalidate)")
            }
            ReuseDecision::MustValidate { reason } => write!(f, "must validate ({})", reason),
        }
    }
}

/// Decide whether `stored` may satisfy `request` given its age and lifetime.
///
/// Checks run in a fixed order: request `no-cache`, response `no-cache`,
/// then either the fresh-path limits (`max-age`, `min-fresh`) or the
/// stale-path permissions (`must-revalidate`, `proxy-revalidate`,
/// `max-stale`, `stale-while-revalidate`).
///
/// # Example
/// ```rust
/// use http::{Request, Response};
/// use kura::cache::{can_reuse, ReuseDecision, ValidationReason};
/// use std::time::Duration;
///
/// let request = Request::get("/r").body(()).unwrap();
/// let stored = Response::builder().header("cache-control", "max-age=60").body(()).unwrap();
///
/// let fresh = can_reuse(&stored, &request, Duration::from_secs(30), Duration::from_secs(60));
/// assert_eq!(fresh, ReuseDecision::Reuse { fresh: true });
///
/// let stale = can_reuse(&stored, &request, Duration::from_secs(90), Duration::from_secs(60));
/// assert_eq!(stale.validation_reason(), Some(ValidationReason::StaleWithoutPermission));
/// ```
pub fn can_reuse<A, B>(
    stored: &Response<A>,
    request: &Request<B>,
    age: Duration,
    freshness_lifetime: Duration,
) -> ReuseDecision {
    let request_cc = CacheControl::from_headers(request.headers());
    let response_cc = CacheControl::from_headers(stored.headers());
    decide(&request_cc, &response_cc, age, freshness_lifetime)
}

/// Same decision as [`can_reuse`], from already parsed directives.
pub fn decide(
    request_cc: &CacheControl,
    response_cc: &CacheControl,
    age: Duration,
    freshness_lifetime: Duration,
) -> ReuseDecision {
    if request_cc.no_cache {
        return ReuseDecision::must_validate(ValidationReason::RequestNoCacheDirective);
    }
    if response_cc.no_cache {
        return ReuseDecision::must_validate(ValidationReason::ResponseNoCacheDirective);
    }

    if age < freshness_lifetime {
        if let Some(max_age) = request_cc.max_age {
            if age > max_age {
                return ReuseDecision::must_validate(ValidationReason::ExceedsRequestMaxAge);
            }
        }
        if let Some(min_fresh) = request_cc.min_fresh {
            if freshness_lifetime - age < min_fresh {
                return ReuseDecision::must_validate(
                    ValidationReason::InsufficientRemainingFreshness,
                );
            }
        }
        return ReuseDecision::Reuse { fresh: true };
    }

    if response_cc.must_revalidate {
        return ReuseDecision::must_validate(ValidationReason::MustRevalidateDirective);
    }
    if response_cc.proxy_revalidate {
        return ReuseDecision::must_validate(ValidationReason::ProxyRevalidateDirective);
    }

    let staleness = age - freshness_lifetime;
    match request_cc.max_stale {
        MaxStale::Unbounded => return ReuseDecision::Reuse { fresh: false },
        MaxStale::Bounded(limit) if staleness <= limit => {
            return ReuseDecision::Reuse { fresh: false }
        }
        MaxStale::Bounded(_) => {
            return ReuseDecision::must_validate(ValidationReason::ExceedsMaxStale)
        }
        MaxStale::Absent => {}
    }

    if let Some(window) = response_cc.stale_while_revalidate {
        if staleness <= window {
            return ReuseDecision::ReuseStaleWhileRevalidating;
        }
    }

    ReuseDecision::must_validate(ValidationReason::StaleWithoutPermission)
}
