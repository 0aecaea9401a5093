//! Cache key types
//!
//! A stored response is found by its primary key (request method plus target
//! URI) and then selected by its secondary key, the request header values
//! named by the response's Vary field.

use http::{Method, Request};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use super::vary::Vary;

/// Cache key for identifying stored responses
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Request method, upper-case
    pub method: String,
    /// Target URI without any fragment; absolute targets are normalized
    pub uri: String,
    /// Vary-selected request header values, sorted by field name
    pub variants: Vec<(String, Option<String>)>,
}

impl CacheKey {
    /// Primary key only: method and target URI.
    pub fn primary<B>(request: &Request<B>) -> Self {
        Self {
            method: normalize_method(request.method()),
            uri: normalize_target(&request.uri().to_string()),
            variants: Vec::new(),
        }
    }

    /// Full key for a request, given the Vary field of the stored response.
    ///
    /// Returns `None` for `Vary: *`, which no request can select without
    /// validation.
    ///
    /// # Example
    /// ```rust
    /// use http::Request;
    /// use kura::cache::{CacheKey, Vary};
    ///
    /// let request = Request::get("https://example.com/r")
    ///     .header("accept-encoding", "gzip")
    ///     .body(())
    ///     .unwrap();
    /// let vary = Vary::parse("Accept-Encoding");
    /// let key = CacheKey::for_request(&request, vary.as_ref()).unwrap();
    /// assert_eq!(key.to_string(), "GET https://example.com/r accept-encoding=gzip");
    ///
    /// assert!(CacheKey::for_request(&request, Some(&Vary::Any)).is_none());
    /// ```
    pub fn for_request<B>(request: &Request<B>, vary: Option<&Vary>) -> Option<Self> {
        let mut key = Self::primary(request);

        match vary {
            None => {}
            Some(Vary::Any) => return None,
            Some(Vary::Fields(fields)) => {
                let mut variants: Vec<(String, Option<String>)> = fields
                    .iter()
                    .map(|name| (name.clone(), joined_values(request, name)))
                    .collect();
                variants.sort();
                key.variants = variants;
            }
        }

        Some(key)
    }

    /// True when both keys name the same stored resource, ignoring Vary.
    pub fn same_primary(&self, other: &CacheKey) -> bool {
        self.method == other.method && self.uri == other.uri
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)?;
        for (name, value) in &self.variants {
            match value {
                Some(value) => write!(f, " {}={}", name, value)?,
                None => write!(f, " {}", name)?,
            }
        }
        Ok(())
    }
}

fn normalize_method(method: &Method) -> String {
    method.as_str().to_ascii_uppercase()
}

fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map(|(before, _)| before).unwrap_or(uri)
}

// Absolute targets take the same spelling as invalidation targets
fn normalize_target(uri: &str) -> String {
    let uri = strip_fragment(uri);
    match Url::parse(uri) {
        Ok(url) => url.to_string(),
        Err(_) => uri.to_string(),
    }
}

fn joined_values<B>(request: &Request<B>, name: &str) -> Option<String> {
    let values: Vec<&str> = request
        .headers()
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}
