//! Cache policy bound to one cache's configuration.
//!
//! The free functions in this module's siblings take `shared` and heuristic
//! settings on every call. `CachePolicy` carries a [`PolicyConfig`] instead
//! and logs each decision at debug level.

use http::{Request, Response};
use std::time::{Duration, SystemTime};

use super::freshness::{
    current_age, explicit_freshness_lifetime, heuristic_freshness_with, Freshness, ResponseTiming,
};
use super::invalidation::{invalidation_targets_with_origin, InvalidationTarget, Origin};
use super::reuse::{can_reuse, ReuseDecision};
use super::storage::{is_storable, Storability};
use super::validation::{self, ValidationOutcome};
use crate::config::PolicyConfig;

#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    config: PolicyConfig,
}

impl CachePolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn is_shared(&self) -> bool {
        self.config.shared_cache
    }

    /// Freshness lifetime using this cache's heuristic settings.
    pub fn lifetime<B>(&self, response: &Response<B>) -> Duration {
        if let Some(lifetime) = explicit_freshness_lifetime(response, self.config.shared_cache) {
            return lifetime;
        }

        if !self.config.allow_heuristics {
            return Duration::ZERO;
        }

        heuristic_freshness_with(
            response,
            self.config.heuristic_fraction,
            self.config.max_heuristic_lifetime(),
        )
    }

    pub fn freshness<B>(
        &self,
        response: &Response<B>,
        now: SystemTime,
        timing: ResponseTiming,
    ) -> Freshness {
        Freshness {
            age: current_age(response, now, timing.request_time, timing.response_time),
            lifetime: self.lifetime(response),
        }
    }

    pub fn is_storable<A, B>(&self, request: &Request<A>, response: &Response<B>) -> Storability {
        let storability = is_storable(request, response, self.config.shared_cache);

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            status = response.status().as_u16(),
            shared = self.config.shared_cache,
            decision = %storability,
            "Evaluated storability"
        );

        storability
    }

    /// Decide whether `stored` may answer `request` at `now`.
    ///
    /// # Example
    /// ```rust
    /// use http::{Request, Response};
    /// use kura::cache::{fmt_http_date, CachePolicy, ResponseTiming, ValidationReason};
    /// use kura::config::PolicyConfig;
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let received = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    /// let stored = Response::builder()
    ///     .header("cache-control", "public, max-age=60")
    ///     .header("date", fmt_http_date(received))
    ///     .body(())
    ///     .unwrap();
    /// let request = Request::get("/r").body(()).unwrap();
    /// let timing = ResponseTiming::new(received, received);
    ///
    /// let policy = CachePolicy::new(PolicyConfig::shared_cache());
    /// assert!(policy
    ///     .reuse(&stored, &request, received + Duration::from_secs(30), timing)
    ///     .allows_reuse());
    /// assert_eq!(
    ///     policy
    ///         .reuse(&stored, &request, received + Duration::from_secs(90), timing)
    ///         .validation_reason(),
    ///     Some(ValidationReason::StaleWithoutPermission)
    /// );
    /// ```
    pub fn reuse<A, B>(
        &self,
        stored: &Response<A>,
        request: &Request<B>,
        now: SystemTime,
        timing: ResponseTiming,
    ) -> ReuseDecision {
        let freshness = self.freshness(stored, now, timing);
        let decision = can_reuse(stored, request, freshness.age, freshness.lifetime);

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            age_secs = freshness.age.as_secs(),
            lifetime_secs = freshness.lifetime.as_secs(),
            decision = %decision,
            "Evaluated stored response for reuse"
        );

        decision
    }

    pub fn validation_request<A, B: Clone>(
        &self,
        stored: &Response<A>,
        original: &Request<B>,
    ) -> Request<B> {
        let request = validation::validation_request(stored, original);

        tracing::debug!(
            uri = %original.uri(),
            if_none_match = request.headers().contains_key(http::header::IF_NONE_MATCH),
            if_modified_since = request.headers().contains_key(http::header::IF_MODIFIED_SINCE),
            "Built conditional request"
        );

        request
    }

    pub fn process_validation_response<B>(
        &self,
        validation: Response<B>,
        stored: Response<B>,
    ) -> ValidationOutcome<B> {
        let status = validation.status().as_u16();
        let outcome = validation::process_validation_response(validation, stored);

        tracing::debug!(
            status = status,
            outcome = outcome.kind(),
            "Processed validation response"
        );

        outcome
    }

    pub fn invalidation_targets<A, B>(
        &self,
        request: &Request<A>,
        response: &Response<B>,
        connection_origin: Option<&Origin>,
    ) -> Vec<InvalidationTarget> {
        let targets = invalidation_targets_with_origin(request, response, connection_origin);

        if !targets.is_empty() {
            tracing::debug!(
                method = %request.method(),
                status = response.status().as_u16(),
                count = targets.len(),
                "Unsafe request invalidates stored responses"
            );
        }

        targets
    }
}
