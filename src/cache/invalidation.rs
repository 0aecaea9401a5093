//! Invalidation after unsafe requests (RFC 9111 §4.4).
//!
//! A non-error response to PUT, POST or DELETE invalidates the stored
//! responses for the request target, and for the Location and
//! Content-Location URIs when they share the request's origin.

use http::header::{CONTENT_LOCATION, LOCATION};
use http::{HeaderName, Method, Request, Response, Uri};
use serde::Serialize;
use std::fmt;
use url::Url;

use crate::constants::{DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT};

/// A URI whose stored responses the host should evict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "uri", rename_all = "kebab-case")]
pub enum InvalidationTarget {
    /// The target URI of the unsafe request itself
    RequestTarget(String),
    /// URI from the response's Location header
    Location(String),
    /// URI from the response's Content-Location header
    ContentLocation(String),
}

impl InvalidationTarget {
    pub fn uri(&self) -> &str {
        match self {
            InvalidationTarget::RequestTarget(uri)
            | InvalidationTarget::Location(uri)
            | InvalidationTarget::ContentLocation(uri) => uri,
        }
    }
}

impl fmt::Display for InvalidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Scheme, host and port of a URI.
///
/// Scheme and host compare case-insensitively (both are lower-cased here); a
/// missing port takes the scheme's default (80 for http, 443 for https).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Origin {
    pub fn new(scheme: &str, host: &str, port: Option<u16>) -> Self {
        let scheme = scheme.to_ascii_lowercase();
        let port = port.or_else(|| default_port(&scheme));
        Self {
            scheme,
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    /// Origin of an absolute request target; `None` for origin-form targets.
    pub fn from_uri(uri: &Uri) -> Option<Self> {
        let scheme = uri.scheme_str()?;
        let host = uri.host()?;
        Some(Self::new(scheme, host, uri.port_u16()))
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self::new(url.scheme(), host, url.port()))
    }

    /// Root URL of the origin, the base for resolving origin-form targets.
    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&format!("{}/", self)).ok()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(DEFAULT_HTTP_PORT),
        "https" => Some(DEFAULT_HTTPS_PORT),
        _ => None,
    }
}

/// Methods that can change state at the origin.
pub fn is_unsafe_method(method: &Method) -> bool {
    *method == Method::PUT || *method == Method::DELETE || *method == Method::POST
}

/// URIs invalidated by `response` to `request`.
///
/// For origin-form request targets the connection's origin is unknown here,
/// so Location and Content-Location are assumed to be same-origin and every
/// target is reported as sent. Hosts that know the origin should call
/// [`invalidation_targets_with_origin`].
///
/// # Example
/// ```rust
/// use http::{Request, Response};
/// use kura::cache::{invalidation_targets, InvalidationTarget};
///
/// let request = Request::post("https://example.com/items").body(()).unwrap();
/// let response = Response::builder()
///     .status(201)
///     .header("location", "/items/7")
///     .body(())
///     .unwrap();
/// assert_eq!(
///     invalidation_targets(&request, &response),
///     vec![
///         InvalidationTarget::RequestTarget("https://example.com/items".to_string()),
///         InvalidationTarget::Location("https://example.com/items/7".to_string()),
///     ]
/// );
/// ```
pub fn invalidation_targets<A, B>(
    request: &Request<A>,
    response: &Response<B>,
) -> Vec<InvalidationTarget> {
    invalidation_targets_with_origin(request, response, None)
}

/// URIs invalidated by `response` to `request`, with a known connection origin.
///
/// `connection_origin` is used when the request target is not absolute. With
/// neither an absolute target nor a connection origin, the same-origin check
/// passes.
///
/// Whenever an absolute base is known, all targets are reported as absolute
/// URIs in the normalized form produced by [`Url`], the same form
/// [`CacheKey`](super::CacheKey) uses for absolute targets.
pub fn invalidation_targets_with_origin<A, B>(
    request: &Request<A>,
    response: &Response<B>,
    connection_origin: Option<&Origin>,
) -> Vec<InvalidationTarget> {
    let status = response.status();
    if !is_unsafe_method(request.method()) || status.is_client_error() || status.is_server_error() {
        return Vec::new();
    }

    let raw_target = request.uri().to_string();
    let absolute = Url::parse(&raw_target).ok();
    let request_origin = absolute
        .as_ref()
        .and_then(Origin::from_url)
        .or_else(|| connection_origin.cloned());

    let base = match absolute {
        Some(url) => Some(url),
        None => request_origin
            .as_ref()
            .and_then(Origin::to_url)
            .and_then(|root| root.join(&raw_target).ok()),
    };
    let base = base.as_ref();
    let origin = request_origin.as_ref();

    let target = base.map(Url::to_string).unwrap_or(raw_target);
    let mut targets = vec![InvalidationTarget::RequestTarget(target)];

    if let Some(uri) = same_origin_reference(response, LOCATION, base, origin) {
        targets.push(InvalidationTarget::Location(uri));
    }
    if let Some(uri) = same_origin_reference(response, CONTENT_LOCATION, base, origin) {
        targets.push(InvalidationTarget::ContentLocation(uri));
    }

    targets
}

/// Read a URI-reference header and keep it only if it shares the request's origin.
///
/// Relative references, network-path ones included, are resolved against the
/// base before the origin check; without a base they are reported as sent.
fn same_origin_reference<B>(
    response: &Response<B>,
    name: HeaderName,
    base: Option<&Url>,
    request_origin: Option<&Origin>,
) -> Option<String> {
    let raw = response.headers().get(name)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    let resolved = match Url::parse(raw) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw).ok()?,
            None => return Some(raw.to_string()),
        },
        Err(_) => return None,
    };

    let same = match request_origin {
        Some(origin) => Origin::from_url(&resolved).as_ref() == Some(origin),
        None => true,
    };
    same.then(|| resolved.to_string())
}
