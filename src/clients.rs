// src/clients.rs

//! API clients and the authentication step that sits in front of the gate.
//!
//! A request presents an API key. The key is resolved to an [`ApiClient`]
//! through a [`ClientDirectory`], the client's quota is resolved (falling back
//! to the configured default), and only then is the gate consulted.

// dependencies
use crate::clock::{Clock, MonotonicClock};
use crate::errors::GateError;
use crate::gate::RateLimitGate;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marketplaces the mock API serves orders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Smartstore,
    Coupang,
    Zigzag,
    Ably,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Smartstore => "SMARTSTORE",
            Platform::Coupang => "COUPANG",
            Platform::Zigzag => "ZIGZAG",
            Platform::Ably => "ABLY",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered API consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiClient {
    pub api_client_id: i64,
    pub seller_id: i64,
    #[serde(default)]
    pub seller_name: Option<String>,
    pub api_key: String,
    pub platform: Platform,
    /// Requests per minute; `None` defers to the gate's configured default
    #[serde(default)]
    pub rate_limit_per_min: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Source of client records, keyed by API key.
pub trait ClientDirectory: Send + Sync {
    fn find_by_api_key(&self, api_key: &str) -> Option<ApiClient>;
}

/// Directory held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: DashMap<String, ApiClient>,
}

impl InMemoryClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-loaded with the two development keys.
    pub fn with_dev_keys() -> Self {
        let directory = Self::new();
        for (id, key, name) in [
            (1, "DEV-KEY-001", "data-engineer-1"),
            (2, "DEV-KEY-002", "data-engineer-2"),
        ] {
            directory.insert(ApiClient {
                api_client_id: id,
                seller_id: id,
                seller_name: Some(name.to_string()),
                api_key: key.to_string(),
                platform: Platform::Smartstore,
                rate_limit_per_min: None,
                is_active: true,
            });
        }
        directory
    }

    /// Insert or replace a client, returning the previous record for its key.
    pub fn insert(&self, client: ApiClient) -> Option<ApiClient> {
        self.clients.insert(client.api_key.clone(), client)
    }

    pub fn deactivate(&self, api_key: &str) -> bool {
        match self.clients.get_mut(api_key) {
            Some(mut client) => {
                client.is_active = false;
                true
            }
            None => false,
        }
    }

    pub fn set_rate_limit(&self, api_key: &str, rate_limit_per_min: Option<i64>) -> bool {
        match self.clients.get_mut(api_key) {
            Some(mut client) => {
                client.rate_limit_per_min = rate_limit_per_min;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ClientDirectory for InMemoryClientDirectory {
    fn find_by_api_key(&self, api_key: &str) -> Option<ApiClient> {
        self.clients.get(api_key).map(|entry| entry.value().clone())
    }
}

/// Resolves API keys to clients and runs them through the gate.
#[derive(Debug)]
pub struct Authenticator<D, C = MonotonicClock>
where
    D: ClientDirectory,
    C: Clock + Clone,
{
    directory: Arc<D>,
    gate: Arc<RateLimitGate<C>>,
}

impl<D, C> Clone for Authenticator<D, C>
where
    D: ClientDirectory,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<D, C> Authenticator<D, C>
where
    D: ClientDirectory,
    C: Clock + Clone,
{
    pub fn new(directory: Arc<D>, gate: Arc<RateLimitGate<C>>) -> Self {
        Self { directory, gate }
    }

    pub fn gate(&self) -> &RateLimitGate<C> {
        &self.gate
    }

    /// Quota applied to `client`: its own setting, else the gate default.
    pub fn quota_for(&self, client: &ApiClient) -> i64 {
        client
            .rate_limit_per_min
            .unwrap_or(self.gate.config().default_limit_per_min)
    }

    /// Authenticate `api_key` and charge one request against its quota.
    pub fn authorize(&self, api_key: &str) -> Result<ApiClient, GateError> {
        if api_key.is_empty() {
            warn!("Rejected request without API key");
            return Err(GateError::InvalidApiKey);
        }

        let client = self.directory.find_by_api_key(api_key).ok_or_else(|| {
            warn!("Rejected unknown API key");
            GateError::InvalidApiKey
        })?;

        if !client.is_active {
            warn!(api_client_id = client.api_client_id, "Rejected inactive API client");
            return Err(GateError::InactiveClient {
                api_client_id: client.api_client_id,
            });
        }

        let decision = self.gate.check(api_key, self.quota_for(&client));
        if !decision.allowed {
            return Err(GateError::RateLimited {
                retry_after_seconds: decision.retry_after_seconds.unwrap_or(0.0),
            });
        }

        debug!(
            api_client_id = client.api_client_id,
            platform = %client.platform,
            "API client authorized"
        );
        Ok(client)
    }
}
