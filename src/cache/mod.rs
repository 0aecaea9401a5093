// Cache module
//
// Decision logic for an HTTP cache: which responses may be stored, how long
// they stay fresh, when they may be reused, how to validate them and what an
// unsafe request invalidates. Storage itself is left to the host.

mod age;
mod control;
mod expires;
mod freshness;
pub mod http_date;
mod invalidation;
mod key;
mod policy;
mod reuse;
mod storage;
mod validation;
mod vary;

pub use age::Age;
pub use control::{CacheControl, MaxStale, Private};
pub use expires::Expires;
pub use freshness::{
    current_age, explicit_freshness_lifetime, freshness_lifetime, heuristic_freshness,
    heuristic_freshness_with, is_fresh, stale_date, Freshness, ResponseTiming,
};
pub use http_date::{fmt_http_date, parse_http_date};
pub use invalidation::{
    invalidation_targets, invalidation_targets_with_origin, is_unsafe_method, InvalidationTarget,
    Origin,
};
pub use key::CacheKey;
pub use policy::CachePolicy;
pub use reuse::{can_reuse, decide, ReuseDecision, ValidationReason};
pub use storage::{
    is_hop_by_hop, is_storable, is_understood_method, strip_hop_by_hop, IneligibleReason,
    Storability,
};
pub use validation::{
    has_validator, merge_not_modified_headers, process_validation_response, validation_request,
    ValidationOutcome,
};
pub use vary::Vary;
