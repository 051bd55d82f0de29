//! Public wallet surface

use crate::balance::resolve_balance_display;
use crate::config::ServiceConfig;
use crate::history::{resolve_history, HistoryLimits, TransferRecord};
use crate::network_info::{resolve_network_info, NetworkInfo};
use crate::orchestrator::{SendRequest, TransactionOrchestrator};
use crate::{Error, Result};
use masslet_core::{Address, KeyVault, WalletRecord};
use masslet_rpc::{CancelToken, HttpTransport, RpcClient, RpcTransport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Result of [`WalletService::send_transaction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    /// Whether the node accepted the operation
    pub success: bool,
    /// Operation id on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// User-facing message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    /// Accepted with `operation_id`
    pub fn submitted(operation_id: String) -> Self {
        Self {
            success: true,
            operation_id: Some(operation_id),
            error: None,
        }
    }

    /// Failed with `err`
    pub fn failed(err: &Error) -> Self {
        Self {
            success: false,
            operation_id: None,
            error: Some(err.user_message()),
        }
    }
}

impl From<Result<String>> for SendOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(id) => SendOutcome::submitted(id),
            Err(e) => SendOutcome::failed(&e),
        }
    }
}

/// Wallet operations against one network
pub struct WalletService<T = HttpTransport> {
    config: ServiceConfig,
    rpc: RpcClient<T>,
    vault: Option<Arc<dyn KeyVault>>,
}

impl WalletService<HttpTransport> {
    /// Service talking HTTPS to the configured endpoints.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let rpc = RpcClient::new(config.rpc_config())?;
        Ok(Self::with_client(config, rpc))
    }
}

impl<T: RpcTransport> WalletService<T> {
    /// Service over an existing RPC client.
    pub fn with_client(config: ServiceConfig, rpc: RpcClient<T>) -> Self {
        Self {
            config,
            rpc,
            vault: None,
        }
    }

    /// Vault for opening sealed keys.
    pub fn with_vault(mut self, vault: Arc<dyn KeyVault>) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Underlying RPC client
    pub fn rpc(&self) -> &RpcClient<T> {
        &self.rpc
    }

    /// Create a new wallet.
    pub fn create_wallet(&self) -> Result<WalletRecord> {
        Ok(masslet_core::create_wallet()?)
    }

    /// Restore a wallet from its recovery phrase.
    pub fn import_wallet_from_mnemonic(&self, mnemonic: &str) -> Result<WalletRecord> {
        Ok(masslet_core::import_wallet_from_mnemonic(mnemonic)?)
    }

    /// Whether `address` is a well-formed user address.
    pub fn validate_address(&self, address: &str) -> bool {
        masslet_core::is_valid_address(address.trim())
    }

    /// Balance as MAS with six decimals.
    ///
    /// Network failure degrades to `"0.000000"`. An invalid address or a
    /// cancelled call is an error.
    pub async fn get_wallet_balance(&self, address: &str, cancel: &CancelToken) -> Result<String> {
        let address = Address::parse(address.trim())?;
        resolve_balance_display(&self.rpc, &address, cancel).await
    }

    /// Send `request`, reporting the outcome instead of failing.
    pub async fn send_transaction(&self, request: &SendRequest, cancel: &CancelToken) -> SendOutcome {
        let result = self.send(request, cancel).await;
        if let Err(e) = &result {
            warn!(error = %e, "send failed");
        }
        result.into()
    }

    /// Send `request`, returning the operation id or the failing stage's error.
    pub async fn send(&self, request: &SendRequest, cancel: &CancelToken) -> Result<String> {
        let orchestrator = TransactionOrchestrator::new(&self.rpc, &self.config);
        match self.vault.as_deref() {
            Some(vault) => orchestrator.with_vault(vault).send(request, cancel).await,
            None => orchestrator.send(request, cancel).await,
        }
    }

    /// Recent transfers, possibly empty.
    pub async fn get_transaction_history(
        &self,
        address: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<TransferRecord>> {
        let address = Address::parse(address.trim())?;
        let limits = HistoryLimits {
            max_operations: self.config.history_limit,
            lookback_periods: self.config.history_lookback_periods,
        };
        resolve_history(&self.rpc, &address, limits, cancel).await
    }

    /// Network summary; unreachable nodes give placeholder values.
    pub async fn get_network_info(&self, cancel: &CancelToken) -> Result<NetworkInfo> {
        resolve_network_info(&self.rpc, &self.config.network_params(), cancel).await
    }
}
