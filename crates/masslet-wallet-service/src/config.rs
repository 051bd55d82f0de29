//! Wallet service configuration

use crate::{Error, Result};
use masslet_core::{DEFAULT_FEE, EXPIRE_PERIOD_OFFSET};
use masslet_params::{Network, NetworkType};
use masslet_rpc::RpcConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Network selection override
pub const NETWORK_ENV: &str = "MASSLET_NETWORK";
/// Chain id override
pub const CHAIN_ID_ENV: &str = "MASSLET_CHAIN_ID";
/// Fee override, in nano-units
pub const FEE_ENV: &str = "MASSLET_FEE_NANO";

/// Wallet service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Network to talk to
    pub network: NetworkType,
    /// Chain id mixed into signatures
    pub chain_id: u64,
    /// Fixed fee in nano-units
    pub fee_nano: u64,
    /// Periods between the current period and an operation's expiry
    pub expire_period_offset: u64,
    /// Maximum operations fetched for history
    pub history_limit: usize,
    /// Periods scanned backwards by the history graph fallback
    pub history_lookback_periods: u64,
    /// Per-endpoint request timeout
    pub request_timeout_secs: u64,
    /// Endpoint override; empty means the network defaults
    pub endpoints: Vec<String>,
}

impl ServiceConfig {
    /// Defaults for `network_type`.
    pub fn for_network(network_type: NetworkType) -> Self {
        let network = Network::from_type(network_type);
        Self {
            network: network_type,
            chain_id: network.chain_id,
            fee_nano: DEFAULT_FEE,
            expire_period_offset: EXPIRE_PERIOD_OFFSET,
            history_limit: 10,
            history_lookback_periods: 100,
            request_timeout_secs: 10,
            endpoints: Vec::new(),
        }
    }

    /// Static parameters of the configured network
    pub fn network_params(&self) -> Network {
        Network::from_type(self.network)
    }

    /// RPC client configuration derived from this config.
    pub fn rpc_config(&self) -> RpcConfig {
        let endpoints = if self.endpoints.is_empty() {
            self.network_params().default_endpoints()
        } else {
            self.endpoints.clone()
        };
        RpcConfig::new(endpoints).with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    /// Apply `MASSLET_NETWORK`, `MASSLET_CHAIN_ID`, `MASSLET_FEE_NANO`,
    /// `MASSLET_RPC_ENDPOINTS` and `MASSLET_RPC_TIMEOUT_SECS`.
    ///
    /// Switching network also switches the chain id unless one is given explicitly.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network = match lookup(NETWORK_ENV) {
            Some(value) if !value.trim().is_empty() => value.parse::<NetworkType>()?,
            _ => NetworkType::Buildnet,
        };
        Self::for_network_with_lookup(network, lookup)
    }

    /// Defaults for `network_type`, then every override except the network itself.
    pub fn for_network_with_lookup(
        network_type: NetworkType,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::for_network(network_type);

        if let Some(value) = lookup(CHAIN_ID_ENV) {
            config.chain_id = value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{CHAIN_ID_ENV} must be an integer")))?;
        }
        if let Some(value) = lookup(FEE_ENV) {
            config.fee_nano = value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{FEE_ENV} must be an integer")))?;
        }

        let defaults = config.rpc_config();
        let rpc = defaults.clone().with_overrides(&lookup);
        if rpc.endpoints != defaults.endpoints {
            config.endpoints = rpc.endpoints;
        }
        config.request_timeout_secs = rpc.request_timeout.as_secs();
        Ok(config)
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> Result<()> {
        if self.expire_period_offset == 0 {
            return Err(Error::Config("expire period offset must be non-zero".to_string()));
        }
        if self.history_limit == 0 {
            return Err(Error::Config("history limit must be non-zero".to_string()));
        }
        self.rpc_config().validate().map_err(|e| Error::Config(e.to_string()))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::for_network(NetworkType::Buildnet)
    }
}
