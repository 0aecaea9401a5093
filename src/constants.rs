// Constants module - centralized default values for caching rules
//
// This module defines the default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

use http::StatusCode;

// =============================================================================
// Heuristic freshness defaults
// =============================================================================

/// Default share of the time since Last-Modified granted as heuristic freshness
pub const DEFAULT_HEURISTIC_FRACTION: f64 = 0.1;

/// Default upper bound on a heuristic freshness lifetime in seconds (one day)
pub const DEFAULT_MAX_HEURISTIC_LIFETIME_SECS: u64 = 86_400;

// =============================================================================
// delta-seconds
// =============================================================================

/// Value used when a delta-seconds field overflows (RFC 9111 §1.2.2)
pub const DELTA_SECONDS_OVERFLOW: u64 = 2_147_483_648;

// =============================================================================
// Storage
// =============================================================================

/// Status codes that are cacheable by default (RFC 9110 §15.1)
///
/// A response with one of these codes may be stored even when it carries no
/// explicit freshness information.
pub const HEURISTICALLY_CACHEABLE_STATUSES: [StatusCode; 12] = [
    StatusCode::OK,
    StatusCode::NON_AUTHORITATIVE_INFORMATION,
    StatusCode::NO_CONTENT,
    StatusCode::PARTIAL_CONTENT,
    StatusCode::MULTIPLE_CHOICES,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::PERMANENT_REDIRECT,
    StatusCode::NOT_FOUND,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::GONE,
    StatusCode::URI_TOO_LONG,
    StatusCode::NOT_IMPLEMENTED,
];

/// Connection-specific header fields that never enter a stored response
pub const HOP_BY_HOP_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

// =============================================================================
// Origins
// =============================================================================

/// Default port for the http scheme
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default port for the https scheme
pub const DEFAULT_HTTPS_PORT: u16 = 443;
