// src/token_bucket.rs

// per-key token bucket: burst allowance equal to capacity, steady refill in between

// dependencies
use crate::clock::{Clock, MonotonicClock};
use parking_lot::Mutex;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// A token bucket holding real-valued tokens.
///
/// Starts full. Every admission consumes `cost` tokens; tokens flow back at
/// `refill_rate_per_sec` up to `capacity`. The token count and the timestamp
/// of the last refill sit behind one lock so they are always updated as a pair.
#[derive(Debug)]
pub struct TokenBucket<C = MonotonicClock>
where
    C: Clock,
{
    capacity: f64,
    refill_rate_per_sec: f64,
    state: Mutex<BucketState>,
    clock: C,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill_nanos: u64,
}

/// Outcome of a single [`TokenBucket::try_acquire`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSnapshot {
    pub allowed: bool,
    /// Tokens left in the bucket after this call
    pub remaining: f64,
    /// Seconds until the requested cost could be covered (denials only)
    pub retry_after_seconds: Option<f64>,
}

impl<C> TokenBucket<C>
where
    C: Clock,
{
    /// Create a full bucket with an explicit capacity and refill rate.
    pub fn new(capacity: f64, refill_rate_per_sec: f64, clock: C) -> Self {
        let capacity = capacity.max(0.0);
        let now = clock.now();
        Self {
            capacity,
            refill_rate_per_sec: refill_rate_per_sec.max(0.0),
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill_nanos: now,
            }),
            clock,
        }
    }

    /// Create a full bucket sized for a requests-per-minute quota:
    /// capacity equals the quota and refill is `quota / 60` tokens per second.
    pub fn per_minute(limit_per_minute: i64, clock: C) -> Self {
        let capacity = limit_per_minute as f64;
        Self::new(capacity, capacity / 60.0, clock)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refill_rate_per_sec(&self) -> f64 {
        self.refill_rate_per_sec
    }

    /// Admit or deny a request costing `cost` tokens.
    pub fn allow(&self, cost: f64) -> bool {
        self.try_acquire(cost).allowed
    }

    /// Refill for the elapsed time, then consume `cost` tokens if available.
    /// Tokens are left untouched on a denial. Negative or NaN costs are
    /// always denied so stored tokens stay within `[0, capacity]`.
    pub fn try_acquire(&self, cost: f64) -> BucketSnapshot {
        let mut state = self.state.lock();
        let now = self.clock.now();
        self.refill(&mut state, now);

        if cost.is_nan() || cost < 0.0 {
            return BucketSnapshot {
                allowed: false,
                remaining: state.tokens,
                retry_after_seconds: None,
            };
        }

        if state.tokens >= cost {
            state.tokens -= cost;
            BucketSnapshot {
                allowed: true,
                remaining: state.tokens,
                retry_after_seconds: None,
            }
        } else {
            BucketSnapshot {
                allowed: false,
                remaining: state.tokens,
                retry_after_seconds: Some(self.seconds_until(state.tokens, cost)),
            }
        }
    }

    /// Tokens available right now, without consuming any or moving the
    /// refill timestamp.
    pub fn available(&self) -> f64 {
        let state = self.state.lock();
        self.projected_tokens(&state, self.clock.now())
    }

    /// Nanoseconds since the bucket last refilled.
    pub fn idle_nanos(&self) -> u64 {
        let state = self.state.lock();
        self.clock.now().saturating_sub(state.last_refill_nanos)
    }

    /// True when the bucket has been idle for at least `max_idle_nanos` and
    /// has already refilled to capacity, i.e. a fresh bucket would behave
    /// identically.
    pub fn is_evictable(&self, max_idle_nanos: u64) -> bool {
        let state = self.state.lock();
        let now = self.clock.now();
        let idle = now.saturating_sub(state.last_refill_nanos);
        idle >= max_idle_nanos && self.projected_tokens(&state, now) >= self.capacity
    }

    fn refill(&self, state: &mut BucketState, now: u64) {
        state.tokens = self.projected_tokens(state, now);
        state.last_refill_nanos = state.last_refill_nanos.max(now);
    }

    fn projected_tokens(&self, state: &BucketState, now: u64) -> f64 {
        let elapsed_secs = now.saturating_sub(state.last_refill_nanos) as f64 / NANOS_PER_SECOND;
        (state.tokens + elapsed_secs * self.refill_rate_per_sec).min(self.capacity)
    }

    fn seconds_until(&self, tokens: f64, cost: f64) -> f64 {
        if cost > self.capacity || self.refill_rate_per_sec <= 0.0 {
            return f64::INFINITY;
        }
        (cost - tokens) / self.refill_rate_per_sec
    }
}
