//! The `Expires` header field (RFC 9111 §5.3).

use http::header::EXPIRES;
use http::HeaderMap;
use std::fmt;
use std::time::SystemTime;

use super::http_date::{fmt_http_date, parse_http_date, seconds_between};

/// Timestamp after which a response is considered stale.
///
/// An unparseable value (including the common `Expires: 0`) yields `None`.
/// Treating such a response as already expired is a freshness policy decision
/// and is left to the freshness calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expires(SystemTime);

impl Expires {
    pub fn new(timestamp: SystemTime) -> Self {
        Self(timestamp)
    }

    pub fn timestamp(&self) -> SystemTime {
        self.0
    }

    pub fn parse(text: &str) -> Option<Self> {
        parse_http_date(text).map(Self)
    }

    /// Read the first Expires field line from a header map.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(EXPIRES)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
    }

    /// True when the expiry lies strictly before `now`.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.0 < now
    }

    /// Seconds left until expiry, negative once the expiry has passed.
    pub fn time_remaining(&self, now: SystemTime) -> i64 {
        seconds_between(self.0, now)
    }
}

impl From<SystemTime> for Expires {
    fn from(timestamp: SystemTime) -> Self {
        Self(timestamp)
    }
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_http_date(self.0))
    }
}
