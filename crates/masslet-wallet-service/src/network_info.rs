//! Network summary for display

use crate::status::{NetworkStatus, DEFAULT_NODE_VERSION};
use crate::{Error, Result};
use masslet_params::Network;
use masslet_rpc::{CancelToken, RpcClient, RpcTransport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Block height, or unknown when the node did not report one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockHeight {
    /// Reported period
    Known(u64),
    /// Serialized as `"Unknown"`
    Unknown(UnknownMarker),
}

/// Serializes as the string `"Unknown"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownMarker {
    /// The only value
    Unknown,
}

impl BlockHeight {
    /// Height of unknown value
    pub const UNKNOWN: Self = BlockHeight::Unknown(UnknownMarker::Unknown);
}

impl From<Option<u64>> for BlockHeight {
    fn from(height: Option<u64>) -> Self {
        height.map_or(Self::UNKNOWN, BlockHeight::Known)
    }
}

/// Network summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Network display name
    pub network: String,
    /// Current period
    pub block_height: BlockHeight,
    /// Connected peers
    pub peers: u32,
    /// Node version
    pub version: String,
}

impl NetworkInfo {
    /// Summary built from a `get_status` result.
    pub fn from_status(network: &Network, status: &Value) -> Self {
        let parsed = NetworkStatus::from_value(status);
        Self {
            network: network.name.to_string(),
            block_height: NetworkStatus::block_height(status).into(),
            peers: parsed.connected_peers,
            version: parsed.version,
        }
    }

    /// Summary used when no node answered.
    pub fn unreachable(network: &Network) -> Self {
        Self {
            network: network.name.to_string(),
            block_height: BlockHeight::UNKNOWN,
            peers: 0,
            version: DEFAULT_NODE_VERSION.to_string(),
        }
    }
}

/// Fetch the network summary. Failure degrades to [`NetworkInfo::unreachable`].
pub async fn resolve_network_info<T: RpcTransport>(
    rpc: &RpcClient<T>,
    network: &Network,
    cancel: &CancelToken,
) -> Result<NetworkInfo> {
    match rpc.call_with_cancel("get_status", json!([]), cancel).await {
        Ok(status) if status.is_object() => Ok(NetworkInfo::from_status(network, &status)),
        Ok(_) => Ok(NetworkInfo::unreachable(network)),
        Err(masslet_rpc::Error::Cancelled) => Err(Error::Cancelled),
        Err(e) => {
            warn!(error = %e, "get_status failed, reporting network as unreachable");
            Ok(NetworkInfo::unreachable(network))
        }
    }
}
