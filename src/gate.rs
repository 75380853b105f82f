// src/gate.rs

// rate limit gate: the admission check request handlers call before serving

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::config::RateLimitConfig;
use crate::errors::ConfigError;
use crate::registry::BucketRegistry;
use tracing::debug;

/// Every admission consumes one token.
const REQUEST_COST: f64 = 1.0;

/// Per-key admission control shared by all request handlers.
///
/// Built once at startup and handed to handlers by reference (or behind an
/// `Arc`); there is no process-global instance. State is in-memory only, so
/// a restart hands every key a full bucket again.
#[derive(Debug)]
pub struct RateLimitGate<C = MonotonicClock>
where
    C: Clock + Clone,
{
    registry: BucketRegistry<C>,
    config: RateLimitConfig,
}

impl<C> RateLimitGate<C>
where
    C: Clock + Clone,
{
    /// Create a gate from a config object
    pub fn with_config(config: RateLimitConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: BucketRegistry::new(clock),
            config,
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admit or deny one request from `key` under a quota of
    /// `limit_per_minute`. A quota of zero or less means unlimited.
    pub fn check_rate_limit(&self, key: &str, limit_per_minute: i64) -> bool {
        self.check(key, limit_per_minute).allowed
    }

    /// Like [`check_rate_limit`](Self::check_rate_limit), with the metadata an
    /// HTTP layer needs for rate limit headers.
    pub fn check(&self, key: &str, limit_per_minute: i64) -> RateLimitDecision {
        if !self.config.enabled || limit_per_minute <= 0 {
            return RateLimitDecision::unlimited(limit_per_minute);
        }

        // registry guard is released inside bucket_for
        let bucket = self.registry.bucket_for(key, limit_per_minute);
        let snapshot = bucket.try_acquire(REQUEST_COST);

        if !snapshot.allowed {
            debug!(
                limit_per_minute,
                retry_after_seconds = ?snapshot.retry_after_seconds,
                "Rate limit exceeded"
            );
        }

        RateLimitDecision {
            allowed: snapshot.allowed,
            limit_per_minute,
            remaining: snapshot.remaining,
            retry_after_seconds: snapshot.retry_after_seconds,
        }
    }

    /// Stop tracking `key`; its next request starts from a full bucket.
    pub fn forget(&self, key: &str) -> bool {
        self.registry.remove(key)
    }

    /// Number of keys with a live bucket.
    pub fn tracked_keys(&self) -> usize {
        self.registry.len()
    }

    /// Drop buckets idle for longer than the configured eviction window.
    pub fn evict_idle(&self) -> usize {
        self.registry.evict_idle(self.config.idle_eviction_window())
    }
}

impl RateLimitGate<MonotonicClock> {
    /// Gate with default configuration on the process monotonic clock.
    pub fn new() -> Self {
        Self {
            registry: BucketRegistry::default(),
            config: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitGate<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a rate limiting decision with metadata for HTTP responses
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    /// Whether the request should be allowed
    pub allowed: bool,
    /// Quota the decision was made against
    pub limit_per_minute: i64,
    /// Tokens left after this request (infinite for unlimited keys)
    pub remaining: f64,
    /// Seconds until the client can make another request (when denied)
    pub retry_after_seconds: Option<f64>,
}

impl RateLimitDecision {
    fn unlimited(limit_per_minute: i64) -> Self {
        Self {
            allowed: true,
            limit_per_minute,
            remaining: f64::INFINITY,
            retry_after_seconds: None,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.remaining.is_infinite()
    }
}
