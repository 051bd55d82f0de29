//! RPC client configuration

use crate::{Error, Result};
use masslet_params::Network;
use std::env;
use std::time::Duration;

/// Default per-attempt timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Comma-separated endpoint list override
pub const ENDPOINTS_ENV: &str = "MASSLET_RPC_ENDPOINTS";

/// Per-attempt timeout override, in seconds
pub const TIMEOUT_ENV: &str = "MASSLET_RPC_TIMEOUT_SECS";

/// RPC client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    /// Endpoints, tried strictly in this order
    pub endpoints: Vec<String>,
    /// Timeout applied to each endpoint attempt
    pub request_timeout: Duration,
}

impl RpcConfig {
    /// Configuration with explicit endpoints and the default timeout.
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Default endpoints of `network`.
    pub fn for_network(network: &Network) -> Self {
        Self::new(network.default_endpoints())
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Reject configurations the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(Error::Config("at least one endpoint is required".to_string()));
        }
        if self.endpoints.iter().any(|e| e.trim().is_empty()) {
            return Err(Error::Config("endpoint URLs must not be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Apply `MASSLET_RPC_ENDPOINTS` and `MASSLET_RPC_TIMEOUT_SECS`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Unparsable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(ENDPOINTS_ENV) {
            let endpoints = split_list(&value);
            if !endpoints.is_empty() {
                self.endpoints = endpoints;
            }
        }
        if let Some(value) = lookup(TIMEOUT_ENV) {
            if let Ok(secs) = value.trim().parse::<u64>() {
                self.request_timeout = Duration::from_secs(secs.max(1));
            }
        }
        self
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::for_network(&Network::buildnet())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
