// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::Instant;

/// Clock trait to abstract monotonic time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns nanoseconds elapsed since an arbitrary fixed origin.
/// Readings never go backwards, which is what the token refill math relies on.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// MonotonicClock implementation backed by `Instant`.
/// The origin is the moment the clock was created.
/// Cheap to copy; every copy shares the same origin.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        // u64 nanoseconds cover ~584 years of process uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
