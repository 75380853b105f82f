// src/errors.rs

// error handling for the gate and its configuration

// dependencies
use crate::config::MIN_IDLE_EVICTION_SECS;
use thiserror::Error;

/// Reasons a request is turned away before it reaches an order handler.
/// A rate-limit denial is ordinary control flow for the gate itself; it only
/// becomes an error once the authentication layer has to reject the caller.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    #[error("Invalid or missing API key")]
    InvalidApiKey,

    #[error("API client {api_client_id} is inactive")]
    InactiveClient { api_client_id: i64 },

    #[error("Rate limit exceeded, retry after {retry_after_seconds:.2}s")]
    RateLimited { retry_after_seconds: f64 },
}

impl GateError {
    /// HTTP status the serving layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::InvalidApiKey => 401,
            GateError::InactiveClient { .. } => 403,
            GateError::RateLimited { .. } => 429,
        }
    }

    /// Value for a `Retry-After` header, rounded up to whole seconds.
    pub fn retry_after_header(&self) -> Option<u64> {
        match self {
            GateError::RateLimited {
                retry_after_seconds,
            } => Some(retry_after_seconds.ceil().max(1.0) as u64),
            _ => None,
        }
    }
}

/// Error type for rate limit configuration issues.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "Idle eviction window must be at least {min}s, got {0}s",
        min = MIN_IDLE_EVICTION_SECS
    )]
    InvalidEvictionWindow(u64),

    #[error("Environment variable {name} has invalid value {value:?}")]
    InvalidEnvValue { name: &'static str, value: String },
}
