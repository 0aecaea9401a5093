//! The `Age` header field (RFC 9111 §5.1).

use http::header::AGE;
use http::HeaderMap;
use std::fmt;
use std::time::Duration;

use crate::constants::DELTA_SECONDS_OVERFLOW;

/// Parse a delta-seconds value: one or more ASCII digits, nothing else.
///
/// Values too large for `u64` saturate to 2147483648 as RFC 9111 §1.2.2
/// requires. A sign, decimal point or any other character makes the value
/// unusable.
pub(crate) fn parse_delta_seconds(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.parse::<u64>().unwrap_or(DELTA_SECONDS_OVERFLOW))
}

/// Seconds since a response was generated or validated at the origin.
///
/// The count is unsigned, so a negative age cannot be constructed at all.
/// Wire values that are negative or not integers parse to `None`.
///
/// # Example
/// ```rust
/// use kura::cache::Age;
///
/// assert_eq!(Age::parse("120"), Some(Age::from_secs(120)));
/// assert_eq!(Age::parse("-5"), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u64);

impl Age {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }

    /// Parse an Age field value, allowing surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        parse_delta_seconds(text.trim()).map(Self)
    }

    /// Read the Age header from a header map.
    ///
    /// Only the first field line is considered; an unusable first value means
    /// the response carries no age information.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(AGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
    }
}

impl From<Duration> for Age {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs())
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
