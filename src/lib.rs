// src/lib.rs

//! # Market Gate
//!
//! Per-API-key admission control for the mock marketplace orders API.
//!
//! Each key gets a token bucket whose capacity equals its requests-per-minute
//! quota and which refills at `quota / 60` tokens per second. Buckets are
//! created on first use and replaced when the quota changes.
//!
//! ## Quick Example
//!
//! ```rust
//! use market_gate::RateLimitGate;
//!
//! let gate = RateLimitGate::new();
//!
//! if gate.check_rate_limit("DEV-KEY-001", 60) {
//!     println!("Request allowed");
//! } else {
//!     println!("Rate limited");
//! }
//!
//! // zero or negative quotas are unlimited
//! assert!(gate.check_rate_limit("internal", 0));
//! ```
//!
//! With API key resolution in front:
//!
//! ```rust
//! use std::sync::Arc;
//! use market_gate::{Authenticator, InMemoryClientDirectory, RateLimitGate};
//!
//! let auth = Authenticator::new(
//!     Arc::new(InMemoryClientDirectory::with_dev_keys()),
//!     Arc::new(RateLimitGate::new()),
//! );
//!
//! match auth.authorize("DEV-KEY-001") {
//!     Ok(client) => println!("serving {:?}", client.seller_name),
//!     Err(err) => println!("{} -> HTTP {}", err, err.status_code()),
//! }
//! ```

// private modules
mod clients;
mod clock;
mod config;
mod errors;
mod gate;
mod registry;
mod token_bucket;

// public API exports
pub use clients::{ApiClient, Authenticator, ClientDirectory, InMemoryClientDirectory, Platform};
pub use clock::{Clock, MonotonicClock};
pub use config::{DEFAULT_IDLE_EVICTION_SECS, DEFAULT_LIMIT_PER_MIN, RateLimitConfig};
pub use errors::{ConfigError, GateError};
pub use gate::{RateLimitDecision, RateLimitGate};
pub use registry::BucketRegistry;
pub use token_bucket::{BucketSnapshot, TokenBucket};
