// src/registry.rs

// registry of per-key token buckets

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::token_bucket::TokenBucket;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Maps client identifiers to their token buckets.
///
/// Lookup-or-create-or-replace for a key runs under that key's shard guard,
/// so two callers can never install competing buckets for the same key.
/// Callers receive an `Arc` handle and the guard is gone before they touch
/// the bucket's own lock.
#[derive(Debug)]
pub struct BucketRegistry<C = MonotonicClock>
where
    C: Clock + Clone,
{
    buckets: DashMap<String, Slot<C>>,
    clock: C,
}

/// A bucket together with the exact quota it was sized for.
#[derive(Debug)]
struct Slot<C>
where
    C: Clock,
{
    limit_per_minute: i64,
    bucket: Arc<TokenBucket<C>>,
}

impl<C> BucketRegistry<C>
where
    C: Clock + Clone,
{
    pub fn new(clock: C) -> Self {
        Self {
            buckets: DashMap::new(),
            clock,
        }
    }

    /// Return the bucket for `key`, creating it if absent or replacing it if
    /// it was sized for a different `limit_per_minute`. A replaced bucket
    /// starts full; whatever the old one held is discarded.
    pub fn bucket_for(&self, key: &str, limit_per_minute: i64) -> Arc<TokenBucket<C>> {
        // fast path: shared guard only
        if let Some(slot) = self.buckets.get(key) {
            if slot.limit_per_minute == limit_per_minute {
                return Arc::clone(&slot.bucket);
            }
        }

        // keys are client credentials and stay out of log fields
        match self.buckets.entry(key.to_owned()) {
            Entry::Occupied(mut entry) => {
                // re-checked under the exclusive guard; another caller may have
                // already swapped in a bucket with the right quota
                if entry.get().limit_per_minute != limit_per_minute {
                    debug!(
                        old_limit = entry.get().limit_per_minute,
                        new_limit = limit_per_minute,
                        "Quota changed, replacing token bucket"
                    );
                    entry.insert(self.fresh_slot(limit_per_minute));
                }
                Arc::clone(&entry.get().bucket)
            }
            Entry::Vacant(entry) => {
                debug!(limit_per_minute, "Creating token bucket");
                let slot = self.fresh_slot(limit_per_minute);
                let bucket = Arc::clone(&slot.bucket);
                entry.insert(slot);
                bucket
            }
        }
    }

    /// Drop the bucket tracked for `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> bool {
        self.buckets.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remove buckets idle for at least `max_idle` that have refilled to
    /// capacity and are not held by an in-flight caller. Such a bucket is
    /// indistinguishable from the fresh one the next request would create.
    ///
    /// Lock order is shard guard then bucket lock; the admission path never
    /// takes them in the opposite order.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let max_idle_nanos = max_idle.as_nanos().min(u64::MAX as u128) as u64;
        let mut evicted = 0;

        self.buckets.retain(|_, slot| {
            let keep =
                Arc::strong_count(&slot.bucket) > 1 || !slot.bucket.is_evictable(max_idle_nanos);
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            info!(evicted, remaining = self.buckets.len(), "Evicted idle token buckets");
        }
        evicted
    }

    fn fresh_slot(&self, limit_per_minute: i64) -> Slot<C> {
        Slot {
            limit_per_minute,
            bucket: Arc::new(TokenBucket::per_minute(limit_per_minute, self.clock.clone())),
        }
    }
}

impl Default for BucketRegistry<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::new())
    }
}
