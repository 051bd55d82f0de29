//! Ordered-failover JSON-RPC client

use crate::cancel::CancelToken;
use crate::config::RpcConfig;
use crate::envelope::{JsonRpcRequest, Reply};
use crate::transport::{HttpTransport, RpcTransport};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// JSON-RPC client over an ordered endpoint list
///
/// Endpoints are tried one after another, never in parallel. An endpoint
/// that errors, times out or answers with a JSON-RPC error object is
/// skipped; it is not retried within the same call.
#[derive(Debug)]
pub struct RpcClient<T = HttpTransport> {
    config: RpcConfig,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// Create a client that talks HTTPS.
    pub fn new(config: RpcConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl<T: RpcTransport> RpcClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: RpcConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Client configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `method`, failing over across endpoints.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.call_with_cancel(method, params, &CancelToken::new())
            .await
    }

    /// Call `method` and decode the result into `R`.
    pub async fn call_typed<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        cancel: &CancelToken,
    ) -> Result<R> {
        let value = self.call_with_cancel(method, params, cancel).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Call `method`; `cancel` aborts the in-flight attempt and skips the rest.
    pub async fn call_with_cancel(
        &self,
        method: &str,
        params: Value,
        cancel: &CancelToken,
    ) -> Result<Value> {
        let mut attempts = 0;
        let mut last_error = None;

        for endpoint in &self.config.endpoints {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            attempts += 1;

            let request = JsonRpcRequest::new(method, params.clone());
            debug!(endpoint = %endpoint, method, id = request.id, "rpc attempt");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(endpoint = %endpoint, method, "rpc call cancelled");
                    return Err(Error::Cancelled);
                }
                outcome = self.attempt(endpoint, &request) => outcome,
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_endpoint_failure() => {
                    warn!(endpoint = %endpoint, method, error = %e, "endpoint failed, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::AllEndpointsFailed {
            attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no endpoints configured".to_string()),
        })
    }

    async fn attempt(&self, endpoint: &str, request: &JsonRpcRequest) -> Result<Value> {
        let timeout = self.config.request_timeout;
        let body = tokio::time::timeout(timeout, self.transport.post(endpoint, request))
            .await
            .map_err(|_| Error::Timeout(timeout))??;
        Reply::parse(body)?.into_result()
    }
}
