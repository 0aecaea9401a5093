//! The `Vary` header field (RFC 9110 §12.5.5) and secondary cache key matching.

use http::header::VARY;
use http::HeaderMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Request header fields a stored response was selected on.
///
/// Field names are lower-cased on construction. Insertion order is kept for
/// serialization but plays no part in equality, hashing or matching.
#[derive(Debug, Clone)]
pub enum Vary {
    /// `Vary: *`: the response varies on things outside the request headers
    Any,
    /// The listed request header fields
    Fields(Vec<String>),
}

impl Vary {
    /// Build a field list, normalizing case and dropping blanks and repeats.
    ///
    /// Returns `None` when nothing usable remains.
    pub fn fields<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if name.is_empty() {
                continue;
            }
            if name == "*" {
                return Some(Vary::Any);
            }
            if !fields.contains(&name) {
                fields.push(name);
            }
        }
        if fields.is_empty() {
            None
        } else {
            Some(Vary::Fields(fields))
        }
    }

    /// Parse a Vary field value.
    ///
    /// # Example
    /// ```rust
    /// use kura::cache::Vary;
    ///
    /// assert_eq!(Vary::parse("*"), Some(Vary::Any));
    /// assert!(Vary::parse("Accept-Encoding, Origin").unwrap().includes("origin"));
    /// assert_eq!(Vary::parse(" , "), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        Self::fields(text.split(','))
    }

    /// Combine every Vary field line in a header map.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Self::fields(
            headers
                .get_all(VARY)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(',')),
        )
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Vary::Any)
    }

    /// Case-insensitive membership test; `Vary: *` includes every name.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Vary::Any => true,
            Vary::Fields(fields) => fields.iter().any(|f| f.eq_ignore_ascii_case(name.trim())),
        }
    }

    /// Check whether a new request selects the same stored response as the
    /// request that originally produced it.
    ///
    /// `Vary: *` never matches. Otherwise each varied field must carry the same
    /// values in both requests; a field missing from both counts as equal.
    pub fn matches(&self, request_headers: &HeaderMap, cached_request_headers: &HeaderMap) -> bool {
        match self {
            Vary::Any => false,
            Vary::Fields(fields) => fields.iter().all(|name| {
                request_headers
                    .get_all(name.as_str())
                    .iter()
                    .eq(cached_request_headers.get_all(name.as_str()).iter())
            }),
        }
    }

    fn sorted_fields(&self) -> Option<Vec<&str>> {
        match self {
            Vary::Any => None,
            Vary::Fields(fields) => {
                let mut sorted: Vec<&str> = fields.iter().map(String::as_str).collect();
                sorted.sort_unstable();
                Some(sorted)
            }
        }
    }
}

impl PartialEq for Vary {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_fields() == other.sorted_fields()
    }
}

impl Eq for Vary {}

impl Hash for Vary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_fields().hash(state);
    }
}

impl fmt::Display for Vary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vary::Any => f.write_str("*"),
            Vary::Fields(fields) => f.write_str(&fields.join(", ")),
        }
    }
}
