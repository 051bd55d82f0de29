//! Transport seam between the failover client and the network

use crate::envelope::JsonRpcRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Sends one JSON-RPC request to one endpoint and returns the decoded body.
///
/// Implementations report transport failures as [`Error::Network`]; they do
/// not interpret the body.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// POST `request` to `endpoint`.
    async fn post(&self, endpoint: &str, request: &JsonRpcRequest) -> Result<Value>;
}

/// HTTPS transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("masslet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, endpoint: &str, request: &JsonRpcRequest) -> Result<Value> {
        let response = self
            .client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Network(format!("HTTP error: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read body: {e}")))?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(Error::Network(format!("HTTP error: {status}"))),
            Err(e) => Err(Error::Network(format!("JSON decode error: {e}"))),
        }
    }
}
