// tests/ratelimiter/token_bucket_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use market_gate::TokenBucket;

    #[test]
    fn admits_exactly_capacity_without_elapsed_time() {
        let clock = TestClock::new(0.0);
        let bucket = TokenBucket::per_minute(10, clock);

        for _ in 0..10 {
            assert!(bucket.allow(1.0));
        }

        // 11th request at the same instant is denied
        assert!(!bucket.allow(1.0));
    }

    #[test]
    fn sixty_per_minute_scenario() {
        let clock = TestClock::new(0.0);
        let bucket = TokenBucket::per_minute(60, clock.clone()); // 1 token/sec
        assert_eq!(bucket.refill_rate_per_sec(), 1.0);

        let admitted = (0..61).filter(|_| bucket.allow(1.0)).count();
        assert_eq!(admitted, 60);

        // one second buys exactly one more request
        clock.advance(1.0);
        assert!(bucket.allow(1.0));
        assert!(!bucket.allow(1.0));
    }

    #[test]
    fn refill_after_deny_admits_next_call() {
        let clock = TestClock::new(0.0);
        let bucket = TokenBucket::per_minute(30, clock.clone()); // 0.5 tokens/sec
        for _ in 0..30 {
            bucket.allow(1.0);
        }
        assert!(!bucket.allow(1.0));

        clock.advance(1.0);
        assert!(!bucket.allow(1.0)); // 0.5 tokens

        clock.advance(1.0);
        assert!(bucket.allow(1.0)); // 1.0 tokens
    }

    #[test]
    fn long_idle_clamps_to_capacity() {
        let clock = TestClock::new(0.0);
        let bucket = TokenBucket::per_minute(5, clock.clone());
        assert!(bucket.allow(1.0));

        // an hour of idle time still only restores a full bucket
        clock.advance(3600.0);
        assert_eq!(clock.time_as_f64(), 3600.0);
        assert_eq!(bucket.available(), 5.0);

        let admitted = (0..20).filter(|_| bucket.allow(1.0)).count();
        assert_eq!(admitted, 5);
    }

    #[test]
    fn custom_cost_consumes_fractional_tokens() {
        let clock = TestClock::new(0.0);
        let bucket = TokenBucket::new(1.0, 1.0, clock);

        assert!(bucket.allow(0.25));
        assert!(bucket.allow(0.25));
        assert!(bucket.allow(0.5));
        assert!(!bucket.allow(0.25));
    }

    #[test]
    fn clock_going_backwards_does_not_refill_twice() {
        let clock = TestClock::new(10.0);
        let bucket = TokenBucket::per_minute(60, clock.clone());
        for _ in 0..60 {
            bucket.allow(1.0);
        }

        clock.set_time(5.0);
        assert!(!bucket.allow(1.0));

        // refill is measured from t=10, not from the earlier reading
        clock.set_time(10.5);
        assert!(!bucket.allow(1.0));
        clock.set_time(11.0);
        assert!(bucket.allow(1.0));
    }
}
