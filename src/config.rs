// src/config.rs

//! Configuration types for the gate

// dependencies
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Requests per minute granted to a client whose record carries no quota.
pub const DEFAULT_LIMIT_PER_MIN: i64 = 60;

/// Idle time after which a full bucket may be dropped from the registry.
pub const DEFAULT_IDLE_EVICTION_SECS: u64 = 600;

/// A bucket refills from empty to full in one minute, so shorter eviction
/// windows would have nothing extra to reclaim.
pub const MIN_IDLE_EVICTION_SECS: u64 = 60;

const ENV_ENABLED: &str = "MARKET_GATE_RATE_LIMIT_ENABLED";
const ENV_DEFAULT_LIMIT: &str = "MARKET_GATE_DEFAULT_LIMIT_PER_MIN";
const ENV_IDLE_EVICTION: &str = "MARKET_GATE_IDLE_EVICTION_SECS";

/// Configuration for gate behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Master switch; when off every request is admitted
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Quota used when a client record has none (requests per minute)
    #[serde(default = "default_limit")]
    pub default_limit_per_min: i64,

    /// Idle window for registry eviction sweeps
    #[serde(default = "default_idle_eviction")]
    pub idle_eviction_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT_PER_MIN
}

fn default_idle_eviction() -> u64 {
    DEFAULT_IDLE_EVICTION_SECS
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_limit_per_min: default_limit(),
            idle_eviction_secs: default_idle_eviction(),
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that admits everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builder-style: toggle limiting
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder-style: set the fallback quota
    pub fn default_limit(mut self, limit_per_min: i64) -> Self {
        self.default_limit_per_min = limit_per_min;
        self
    }

    /// Builder-style: set the idle eviction window
    pub fn idle_eviction(mut self, window: Duration) -> Self {
        self.idle_eviction_secs = window.as_secs();
        self
    }

    pub fn idle_eviction_window(&self) -> Duration {
        Duration::from_secs(self.idle_eviction_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_eviction_secs < MIN_IDLE_EVICTION_SECS {
            return Err(ConfigError::InvalidEvictionWindow(self.idle_eviction_secs));
        }
        Ok(())
    }

    /// Load configuration from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_ENABLED) {
            config.enabled = parse_var(ENV_ENABLED, &val)?;
        }
        if let Some(val) = lookup(ENV_DEFAULT_LIMIT) {
            config.default_limit_per_min = parse_var(ENV_DEFAULT_LIMIT, &val)?;
        }
        if let Some(val) = lookup(ENV_IDLE_EVICTION) {
            config.idle_eviction_secs = parse_var(ENV_IDLE_EVICTION, &val)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvValue {
            name,
            value: value.to_string(),
        })
}
