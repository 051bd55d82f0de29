//! Send flow: resolve period, build, sign, submit
//!
//! Every stage either advances or fails the whole send. There is no partial
//! success; a send ends with an operation id or a typed error.

use crate::config::ServiceConfig;
use crate::status::PeriodShape;
use crate::{Error, Result};
use masslet_core::vault::open_key_pair;
use masslet_core::{mas_to_nano, sign, Address, KeyPair, KeyVault, Operation, SignedSubmission};
use masslet_rpc::{CancelToken, RpcClient, RpcTransport};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, info};

/// Private key material supplied for a send
#[derive(Clone)]
pub enum KeyMaterial {
    /// Hex of the 64-byte private key
    PrivateKeyHex(String),
    /// Ciphertext produced by the embedding application's [`KeyVault`]
    Sealed {
        /// Opaque ciphertext
        ciphertext: String,
        /// Password that opens it
        password: String,
    },
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::PrivateKeyHex(_) => f.write_str("PrivateKeyHex(..)"),
            KeyMaterial::Sealed { .. } => f.write_str("Sealed { .. }"),
        }
    }
}

/// Send request as issued by the wallet UI
#[derive(Debug, Clone)]
pub struct SendRequest {
    /// Sender's key
    pub key: KeyMaterial,
    /// Sender's address; must belong to `key`
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Amount in MAS
    pub amount_mas: f64,
    /// Chain id to sign for
    pub chain_id: u64,
}

/// Send flow stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    /// Fetch the current period
    ResolvePeriod,
    /// Build the transfer operation
    BuildOperation,
    /// Serialize and sign
    Sign,
    /// Broadcast via `send_operations`
    Submit,
}

impl fmt::Display for SendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendStage::ResolvePeriod => write!(f, "resolve-period"),
            SendStage::BuildOperation => write!(f, "build-operation"),
            SendStage::Sign => write!(f, "sign"),
            SendStage::Submit => write!(f, "submit"),
        }
    }
}

/// Drives one send through its stages
pub struct TransactionOrchestrator<'a, T> {
    rpc: &'a RpcClient<T>,
    config: &'a ServiceConfig,
    vault: Option<&'a dyn KeyVault>,
}

impl<'a, T: RpcTransport> TransactionOrchestrator<'a, T> {
    /// New orchestrator over `rpc`.
    pub fn new(rpc: &'a RpcClient<T>, config: &'a ServiceConfig) -> Self {
        Self {
            rpc,
            config,
            vault: None,
        }
    }

    /// Vault used to open [`KeyMaterial::Sealed`] keys.
    pub fn with_vault(mut self, vault: &'a dyn KeyVault) -> Self {
        self.vault = Some(vault);
        self
    }

    /// Run a send to completion, returning the operation id.
    ///
    /// Recipient, amount and key are checked before any network call.
    pub async fn send(&self, request: &SendRequest, cancel: &CancelToken) -> Result<String> {
        let recipient = Address::parse(request.to.trim())?;
        let amount = mas_to_nano(request.amount_mas)?;
        if amount == 0 {
            return Err(masslet_core::Error::InvalidAmount(
                "amount must be greater than zero".to_string(),
            )
            .into());
        }
        let key_pair = self.open_key(&request.key)?;
        let sender = Address::parse(request.from.trim()).map_err(|e| {
            masslet_core::Error::InvalidKey(format!("sending address is invalid: {e}"))
        })?;
        if key_pair.address() != sender {
            return Err(masslet_core::Error::InvalidKey(
                "private key does not belong to the sending address".to_string(),
            )
            .into());
        }

        debug!(stage = %SendStage::ResolvePeriod, from = %sender, "send");
        let period = self.resolve_period(cancel).await?;

        debug!(stage = %SendStage::BuildOperation, period, "send");
        let expire_period = period
            .checked_add(self.config.expire_period_offset)
            .ok_or_else(|| Error::StatusUnavailable(format!("period {period} out of range")))?;
        let operation = Operation::transfer(recipient, amount, self.config.fee_nano, expire_period)?;

        debug!(stage = %SendStage::Sign, chain_id = request.chain_id, "send");
        let submission = sign(&operation, &key_pair, request.chain_id)?;

        debug!(stage = %SendStage::Submit, "send");
        let operation_id = self.submit(&submission, cancel).await?;

        info!(
            operation_id = %operation_id,
            from = %sender,
            to = %operation.recipient,
            amount_nano = operation.amount,
            expire_period,
            "operation submitted"
        );
        Ok(operation_id)
    }

    fn open_key(&self, key: &KeyMaterial) -> Result<KeyPair> {
        match key {
            KeyMaterial::PrivateKeyHex(hex) => Ok(KeyPair::from_private_key_hex(hex)?),
            KeyMaterial::Sealed {
                ciphertext,
                password,
            } => {
                let vault = self
                    .vault
                    .ok_or_else(|| Error::Config("no key vault configured".to_string()))?;
                Ok(open_key_pair(vault, ciphertext, password)?)
            }
        }
    }

    /// Current period from `get_status`; no usable shape is fatal.
    pub async fn resolve_period(&self, cancel: &CancelToken) -> Result<u64> {
        let status = self
            .rpc
            .call_with_cancel("get_status", json!([]), cancel)
            .await?;
        let shape = PeriodShape::parse(&status).ok_or_else(|| {
            Error::StatusUnavailable("status carries no current period".to_string())
        })?;
        debug!(?shape, "resolved period shape");
        shape
            .period()
            .ok_or_else(|| Error::StatusUnavailable(format!("period out of range: {shape:?}")))
    }

    async fn submit(&self, submission: &SignedSubmission, cancel: &CancelToken) -> Result<String> {
        let result = self
            .rpc
            .call_with_cancel("send_operations", json!([submission]), cancel)
            .await?;

        match result.as_array().and_then(|ids| ids.first()) {
            Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
            Some(other) => Err(Error::SubmissionRejected(format!(
                "unexpected operation id: {other}"
            ))),
            None => Err(Error::SubmissionRejected(
                "node returned no operation id".to_string(),
            )),
        }
    }
}
