//! Massa network definitions

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Mainnet
    Mainnet,
    /// Buildnet (public test network)
    Buildnet,
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "buildnet" | "build" | "testnet" => Ok(Self::Buildnet),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Human-readable name
    pub name: &'static str,
    /// Chain id mixed into every signed operation payload
    pub chain_id: u64,
    /// JSON-RPC endpoints, tried in this order
    pub rpc_endpoints: &'static [&'static str],
}

const MAINNET_ENDPOINTS: &[&str] = &["https://mainnet.massa.net/api/v2"];

const BUILDNET_ENDPOINTS: &[&str] = &[
    "https://buildnet.massa.net/api/v2",
    "https://buildnet.massa.net/api",
    "https://test.massa.net/api/v2",
    "https://test.massa.net/api",
];

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            name: "Massa Mainnet",
            chain_id: 77_658_377,
            rpc_endpoints: MAINNET_ENDPOINTS,
        }
    }

    /// Get buildnet parameters
    pub const fn buildnet() -> Self {
        Self {
            network_type: NetworkType::Buildnet,
            name: "Massa Buildnet",
            chain_id: 77_658_366,
            rpc_endpoints: BUILDNET_ENDPOINTS,
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Buildnet => Self::buildnet(),
        }
    }

    /// Default endpoints as owned strings, in failover order
    pub fn default_endpoints(&self) -> Vec<String> {
        self.rpc_endpoints.iter().map(|e| e.to_string()).collect()
    }
}
