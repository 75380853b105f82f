// tests/ratelimiter/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use market_gate::{ConfigError, DEFAULT_LIMIT_PER_MIN, RateLimitConfig, RateLimitGate};
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = RateLimitConfig::new();
        assert!(config.enabled);
        assert_eq!(config.default_limit_per_min, DEFAULT_LIMIT_PER_MIN);
        assert_eq!(config.idle_eviction_window(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_short_eviction_window() {
        let config = RateLimitConfig::new().idle_eviction(Duration::from_secs(59));
        let result = config.validate();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidEvictionWindow(59)
        ));
    }

    #[test]
    fn constructor_with_invalid_config_fails() {
        let clock = TestClock::new(0.0);
        let config = RateLimitConfig::new().idle_eviction(Duration::from_secs(1));
        let result = RateLimitGate::with_config(config, clock);
        assert!(result.is_err());
    }

    #[test]
    fn config_builder_pattern_works() {
        let config = RateLimitConfig::new()
            .enabled(false)
            .default_limit(300)
            .idle_eviction(Duration::from_secs(3600));

        assert!(config.validate().is_ok());
        assert!(!config.enabled);
        assert_eq!(config.default_limit_per_min, 300);
        assert_eq!(config.idle_eviction_secs, 3600);
    }

    #[test]
    fn non_positive_default_limit_is_valid() {
        // zero means unlimited, not misconfigured
        let config = RateLimitConfig::new().default_limit(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_serialization_round_trip() {
        let config = RateLimitConfig::new().default_limit(90);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RateLimitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: RateLimitConfig =
            serde_json::from_str(r#"{"default_limit_per_min": 15}"#).unwrap();
        assert!(parsed.enabled);
        assert_eq!(parsed.default_limit_per_min, 15);
        assert_eq!(parsed.idle_eviction_secs, 600);
    }
}
