//! Error types

use std::time::Duration;

/// RPC errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure talking to one endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// Endpoint did not answer in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Body was JSON but neither a result nor an error
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Every configured endpoint failed
    #[error("All {attempts} endpoints failed; last error: {last_error}")]
    AllEndpointsFailed {
        /// Number of endpoints tried
        attempts: usize,
        /// Message of the final failure
        last_error: String,
    },

    /// Call was cancelled by its caller
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failover loop should move on to the next endpoint.
    pub fn is_endpoint_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Rpc { .. } | Error::Timeout(_) | Error::MalformedResponse(_)
        )
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
