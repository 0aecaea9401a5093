// Kura HTTP Caching Library
//
// Caching rules from RFC 9111 as plain functions over `http` messages, plus a
// configured policy facade for hosts that run a cache.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
