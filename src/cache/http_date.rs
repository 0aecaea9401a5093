//! HTTP-date parsing, formatting and timestamp arithmetic.
//!
//! Parsing follows RFC 9110 §5.6.7: recipients accept the preferred
//! IMF-fixdate form as well as the obsolete RFC 850 and ANSI C `asctime()`
//! forms. Formatting always produces IMF-fixdate.

use chrono::{DateTime, NaiveDateTime, Utc};
use http::header::AsHeaderName;
use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Parse an HTTP-date into a timestamp.
///
/// Returns `None` when the text matches none of the accepted forms or names
/// an instant before the Unix epoch.
///
/// # Example
/// ```rust
/// use kura::cache::http_date::{fmt_http_date, parse_http_date};
///
/// let ts = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
/// assert_eq!(fmt_http_date(ts), "Sun, 06 Nov 1994 08:49:37 GMT");
/// assert!(parse_http_date("yesterday").is_none());
/// ```
pub fn parse_http_date(text: &str) -> Option<SystemTime> {
    let text = text.trim();

    let parsed = NaiveDateTime::parse_from_str(text, IMF_FIXDATE)
        .or_else(|_| NaiveDateTime::parse_from_str(text, RFC_850))
        .or_else(|_| NaiveDateTime::parse_from_str(text, ASCTIME))
        .ok()?;

    let secs = u64::try_from(parsed.and_utc().timestamp()).ok()?;
    Some(UNIX_EPOCH + Duration::from_secs(secs))
}

/// Format a timestamp as an IMF-fixdate.
///
/// Sub-second precision is truncated; instants before the epoch are clamped to
/// the epoch.
pub fn fmt_http_date(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let secs = i64::try_from(secs).unwrap_or(i64::MAX);

    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format(IMF_FIXDATE)
        .to_string()
}

/// Read the first value of a date-valued header and parse it.
pub fn header_date<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<SystemTime> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_http_date)
}

/// Signed difference `later - earlier` in whole seconds.
pub fn seconds_between(later: SystemTime, earlier: SystemTime) -> i64 {
    match later.duration_since(earlier) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(err) => -i64::try_from(err.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

/// Non-negative difference `later - earlier`; zero when `later` is earlier.
pub fn saturating_elapsed(later: SystemTime, earlier: SystemTime) -> Duration {
    later.duration_since(earlier).unwrap_or_default()
}
