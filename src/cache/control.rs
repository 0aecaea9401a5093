//! Cache-Control header parsing for RFC 9111 compliance.
//!
//! Parses Cache-Control header values from both requests and responses into a
//! flat set of directives. Parsing is total: malformed directives are dropped
//! and unknown directives are ignored (RFC 9111 §5.2.3), never reported.
//!
//! # Request directives
//! - `max-age`, `max-stale`, `min-fresh`: bound the age the client accepts
//! - `no-cache`: stored responses must be validated before use
//! - `no-store`, `no-transform`, `only-if-cached`
//!
//! # Response directives
//! - `max-age`, `s-maxage`: explicit freshness lifetime
//! - `no-store`, `no-cache`, `private`, `public`: storage and reuse limits
//! - `must-revalidate`, `proxy-revalidate`: stale responses must be validated
//! - `stale-while-revalidate`, `stale-if-error`, `immutable`, `must-understand`
//!
//! # Example
//!
//! ```rust
//! use kura::cache::{CacheControl, Private};
//!
//! let cc = CacheControl::parse("max-age=3600, private=\"Set-Cookie, X-Token\"");
//! assert_eq!(cc.max_age, Some(std::time::Duration::from_secs(3600)));
//! assert_eq!(
//!     cc.private,
//!     Private::Fields(vec!["set-cookie".to_string(), "x-token".to_string()])
//! );
//! ```

use http::header::CACHE_CONTROL;
use http::HeaderMap;
use std::fmt;
use std::time::Duration;

use super::age::parse_delta_seconds;

/// State of the `max-stale` request directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MaxStale {
    /// Directive not present
    #[default]
    Absent,
    /// `max-stale` without a value: any staleness is acceptable
    Unbounded,
    /// `max-stale=N`: staleness up to N seconds is acceptable
    Bounded(Duration),
}

impl MaxStale {
    pub fn is_present(&self) -> bool {
        !matches!(self, MaxStale::Absent)
    }
}

/// State of the `private` response directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Private {
    /// Directive not present
    #[default]
    Absent,
    /// `private` without a value: the whole response is private
    Whole,
    /// `private="a, b"`: only the named fields are private (lower-cased)
    Fields(Vec<String>),
}

impl Private {
    pub fn is_present(&self) -> bool {
        !matches!(self, Private::Absent)
    }
}

/// Parsed Cache-Control header directives.
///
/// One struct covers both request and response directives; which ones matter
/// depends on the message the value came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Maximum acceptable age (request) or freshness lifetime (response)
    pub max_age: Option<Duration>,

    /// Acceptable staleness (request only)
    pub max_stale: MaxStale,

    /// Minimum remaining freshness the client wants (request only)
    pub min_fresh: Option<Duration>,

    /// Stored responses must be validated before use
    pub no_cache: bool,

    /// Nothing about the message may be stored
    pub no_store: bool,

    /// Intermediaries must not transform the content
    pub no_transform: bool,

    /// Client only wants a stored response (request only)
    pub only_if_cached: bool,

    /// Stale responses must be validated before use
    pub must_revalidate: bool,

    /// Cache must understand the status code to store the response
    pub must_understand: bool,

    /// Response is intended for a single user
    pub private: Private,

    /// Like must-revalidate, but for shared caches only
    pub proxy_revalidate: bool,

    /// Response may be stored by any cache, even when it normally would not be
    pub public: bool,

    /// Freshness lifetime for shared caches, overrides max-age there
    pub s_maxage: Option<Duration>,

    /// Content will not change while fresh
    pub immutable: bool,

    /// Window during which a stale response may be served while revalidating
    pub stale_while_revalidate: Option<Duration>,

    /// Window during which a stale response may be served on origin errors
    pub stale_if_error: Option<Duration>,
}

impl CacheControl {
    /// Parse a Cache-Control header value into structured directives.
    ///
    /// Directive names are matched case-insensitively. Integer-valued
    /// directives with a missing or malformed argument are dropped silently,
    /// as are unknown directives.
    ///
    /// # Example
    /// ```rust
    /// use kura::cache::{CacheControl, MaxStale};
    ///
    /// let cc = CacheControl::parse("max-stale, no-cache, foo=bar");
    /// assert_eq!(cc.max_stale, MaxStale::Unbounded);
    /// assert!(cc.no_cache);
    /// ```
    pub fn parse(header_value: &str) -> Self {
        let mut result = Self::default();

        for directive in split_directives(header_value) {
            let (name, value) = match directive.split_once('=') {
                Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
                None => (directive, None),
            };
            if name.is_empty() {
                continue;
            }
            result.apply(&name.to_ascii_lowercase(), value);
        }

        result
    }

    /// Parse every Cache-Control field line in a header map as one value.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let combined = headers
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        Self::parse(&combined)
    }

    fn apply(&mut self, name: &str, value: Option<&str>) {
        let seconds = || value.and_then(parse_delta_seconds).map(Duration::from_secs);

        match name {
            "max-age" => {
                if let Some(secs) = seconds() {
                    self.max_age = Some(secs);
                }
            }
            "max-stale" => match value {
                None => self.max_stale = MaxStale::Unbounded,
                Some(_) => {
                    if let Some(secs) = seconds() {
                        self.max_stale = MaxStale::Bounded(secs);
                    }
                }
            },
            "min-fresh" => {
                if let Some(secs) = seconds() {
                    self.min_fresh = Some(secs);
                }
            }
            "s-maxage" => {
                if let Some(secs) = seconds() {
                    self.s_maxage = Some(secs);
                }
            }
            "stale-while-revalidate" => {
                if let Some(secs) = seconds() {
                    self.stale_while_revalidate = Some(secs);
                }
            }
            "stale-if-error" => {
                if let Some(secs) = seconds() {
                    self.stale_if_error = Some(secs);
                }
            }
            "private" => {
                self.private = match value {
                    None => Private::Whole,
                    Some(list) => Private::Fields(parse_field_list(list)),
                };
            }
            // A field-list argument to no-cache still requires validation of
            // the whole response here.
            "no-cache" => self.no_cache = true,
            "no-store" => self.no_store = true,
            "no-transform" => self.no_transform = true,
            "only-if-cached" => self.only_if_cached = true,
            "must-revalidate" => self.must_revalidate = true,
            "must-understand" => self.must_understand = true,
            "proxy-revalidate" => self.proxy_revalidate = true,
            "public" => self.public = true,
            "immutable" => self.immutable = true,
            _ => {
                // Unknown directive, ignore
            }
        }
    }

    /// True when no directive at all is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Get the effective freshness lifetime for this response.
    ///
    /// For shared caches, `s-maxage` takes precedence over `max-age`.
    pub fn effective_max_age(&self, shared: bool) -> Option<Duration> {
        if shared {
            if let Some(s_maxage) = self.s_maxage {
                return Some(s_maxage);
            }
        }
        self.max_age
    }
}

impl fmt::Display for CacheControl {
    /// Serialize in a fixed canonical directive order, joined with `", "`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if let Some(max_age) = self.max_age {
            parts.push(format!("max-age={}", max_age.as_secs()));
        }
        match self.max_stale {
            MaxStale::Absent => {}
            MaxStale::Unbounded => parts.push("max-stale".to_string()),
            MaxStale::Bounded(secs) => parts.push(format!("max-stale={}", secs.as_secs())),
        }
        if let Some(min_fresh) = self.min_fresh {
            parts.push(format!("min-fresh={}", min_fresh.as_secs()));
        }

        let flags = [
            (self.no_cache, "no-cache"),
            (self.no_store, "no-store"),
            (self.no_transform, "no-transform"),
            (self.only_if_cached, "only-if-cached"),
            (self.must_revalidate, "must-revalidate"),
            (self.must_understand, "must-understand"),
        ];
        parts.extend(
            flags
                .iter()
                .filter(|(set, _)| *set)
                .map(|(_, name)| name.to_string()),
        );

        match &self.private {
            Private::Absent => {}
            Private::Whole => parts.push("private".to_string()),
            Private::Fields(fields) => parts.push(format!("private=\"{}\"", fields.join(", "))),
        }
        if self.proxy_revalidate {
            parts.push("proxy-revalidate".to_string());
        }
        if self.public {
            parts.push("public".to_string());
        }
        if let Some(s_maxage) = self.s_maxage {
            parts.push(format!("s-maxage={}", s_maxage.as_secs()));
        }
        if self.immutable {
            parts.push("immutable".to_string());
        }
        if let Some(swr) = self.stale_while_revalidate {
            parts.push(format!("stale-while-revalidate={}", swr.as_secs()));
        }
        if let Some(sie) = self.stale_if_error {
            parts.push(format!("stale-if-error={}", sie.as_secs()));
        }

        write!(f, "{}", parts.join(", "))
    }
}

/// Split a header value on commas that sit outside quoted strings.
fn split_directives(header_value: &str) -> Vec<&str> {
    let mut directives = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in header_value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                directives.push(header_value[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    directives.push(header_value[start..].trim());

    directives.retain(|d| !d.is_empty());
    directives
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}
