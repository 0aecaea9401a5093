//! Age and freshness lifetime calculation (RFC 9111 §4.2).
//!
//! A stored response is fresh while its current age is strictly below its
//! freshness lifetime. The lifetime comes from, in priority order:
//! 1. `s-maxage` (shared caches only)
//! 2. `max-age`
//! 3. `Expires` minus `Date`
//! 4. a heuristic based on `Last-Modified` (when allowed)
//! 5. zero

use http::header::{DATE, LAST_MODIFIED};
use http::Response;
use std::time::{Duration, SystemTime};

use super::age::Age;
use super::control::CacheControl;
use super::expires::Expires;
use super::http_date::{header_date, saturating_elapsed};
use crate::constants::{DEFAULT_HEURISTIC_FRACTION, DEFAULT_MAX_HEURISTIC_LIFETIME_SECS};

/// Timestamps a host recorded around the exchange that produced a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTiming {
    /// When the request that produced the stored response was sent
    pub request_time: Option<SystemTime>,
    /// When the stored response was received
    pub response_time: Option<SystemTime>,
}

impl ResponseTiming {
    pub fn new(request_time: SystemTime, response_time: SystemTime) -> Self {
        Self {
            request_time: Some(request_time),
            response_time: Some(response_time),
        }
    }
}

/// Age and freshness lifetime of a stored response at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Freshness {
    pub age: Duration,
    pub lifetime: Duration,
}

impl Freshness {
    /// Compute both halves of the pair for `response` at `now`.
    pub fn evaluate<B>(
        response: &Response<B>,
        now: SystemTime,
        timing: ResponseTiming,
        shared: bool,
        allow_heuristics: bool,
    ) -> Self {
        Self {
            age: current_age(response, now, timing.request_time, timing.response_time),
            lifetime: freshness_lifetime(response, shared, allow_heuristics),
        }
    }

    /// Fresh means age strictly below lifetime; equal counts as stale.
    pub fn is_fresh(&self) -> bool {
        self.age < self.lifetime
    }

    /// Freshness left before the response goes stale.
    pub fn remaining(&self) -> Duration {
        self.lifetime.saturating_sub(self.age)
    }

    /// How far past its lifetime the response is.
    pub fn staleness(&self) -> Duration {
        self.age.saturating_sub(self.lifetime)
    }
}

/// Freshness lifetime of a response (RFC 9111 §4.2.1).
///
/// # Example
/// ```rust
/// use http::Response;
/// use kura::cache::freshness_lifetime;
/// use std::time::Duration;
///
/// let response = Response::builder()
///     .header("cache-control", "max-age=3600, s-maxage=7200")
///     .body(())
///     .unwrap();
/// assert_eq!(freshness_lifetime(&response, true, false), Duration::from_secs(7200));
/// assert_eq!(freshness_lifetime(&response, false, false), Duration::from_secs(3600));
/// ```
pub fn freshness_lifetime<B>(
    response: &Response<B>,
    shared: bool,
    allow_heuristics: bool,
) -> Duration {
    if let Some(lifetime) = explicit_freshness_lifetime(response, shared) {
        return lifetime;
    }

    if allow_heuristics {
        return heuristic_freshness(response);
    }

    Duration::ZERO
}

/// Lifetime assigned by the origin through `s-maxage`, `max-age` or
/// `Expires`; `None` when the response carries none of them.
pub fn explicit_freshness_lifetime<B>(response: &Response<B>, shared: bool) -> Option<Duration> {
    let cc = CacheControl::from_headers(response.headers());
    if let Some(max_age) = cc.effective_max_age(shared) {
        return Some(max_age);
    }

    let headers = response.headers();
    match (Expires::from_headers(headers), header_date(headers, DATE)) {
        (Some(expires), Some(date)) => Some(saturating_elapsed(expires.timestamp(), date)),
        _ => None,
    }
}

/// Heuristic freshness with the default fraction (10%) and cap (one day).
pub fn heuristic_freshness<B>(response: &Response<B>) -> Duration {
    heuristic_freshness_with(
        response,
        DEFAULT_HEURISTIC_FRACTION,
        Duration::from_secs(DEFAULT_MAX_HEURISTIC_LIFETIME_SECS),
    )
}

/// Heuristic freshness: a fraction of the time since Last-Modified, capped.
///
/// Needs both `Date` and `Last-Modified` to parse; otherwise zero. A
/// Last-Modified later than Date yields zero rather than a negative lifetime.
pub fn heuristic_freshness_with<B>(
    response: &Response<B>,
    fraction: f64,
    cap: Duration,
) -> Duration {
    let headers = response.headers();
    let (Some(date), Some(last_modified)) =
        (header_date(headers, DATE), header_date(headers, LAST_MODIFIED))
    else {
        return Duration::ZERO;
    };

    let since_modified = saturating_elapsed(date, last_modified);
    let secs = (since_modified.as_secs() as f64 * fraction.max(0.0)).floor() as u64;
    Duration::from_secs(secs).min(cap)
}

/// Current age of a response (RFC 9111 §4.2.3).
///
/// Without a usable Date header the result is just the Age header value (or
/// zero); the corrected-age algorithm needs Date to estimate apparent age.
pub fn current_age<B>(
    response: &Response<B>,
    now: SystemTime,
    request_time: Option<SystemTime>,
    response_time: Option<SystemTime>,
) -> Duration {
    let headers = response.headers();
    let age_value = Age::from_headers(headers).unwrap_or_default().as_duration();

    let Some(date) = header_date(headers, DATE) else {
        return age_value;
    };

    let apparent_age = response_time
        .map(|received| saturating_elapsed(received, date))
        .unwrap_or_default();

    let response_delay = match (request_time, response_time) {
        (Some(sent), Some(received)) => saturating_elapsed(received, sent),
        _ => Duration::ZERO,
    };

    let corrected_age_value = age_value.saturating_add(response_delay);
    let corrected_initial_age = apparent_age.max(corrected_age_value);

    let resident_time = response_time
        .map(|received| saturating_elapsed(now, received))
        .unwrap_or_default();

    corrected_initial_age.saturating_add(resident_time)
}

/// True when the response's current age is below its freshness lifetime.
pub fn is_fresh<B>(
    response: &Response<B>,
    now: SystemTime,
    timing: ResponseTiming,
    shared: bool,
    allow_heuristics: bool,
) -> bool {
    Freshness::evaluate(response, now, timing, shared, allow_heuristics).is_fresh()
}

/// Instant the response becomes stale, or `None` for a zero lifetime.
pub fn stale_date<B>(
    response: &Response<B>,
    response_time: SystemTime,
    shared: bool,
    allow_heuristics: bool,
) -> Option<SystemTime> {
    let lifetime = freshness_lifetime(response, shared, allow_heuristics);
    if lifetime.is_zero() {
        return None;
    }
    response_time.checked_add(lifetime)
}
