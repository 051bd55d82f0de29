//! Wallet creation and import

use crate::address::{compute_address, Address};
use crate::keys::{derive_key_pair, generate_mnemonic, KeyPair};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// Freshly created or imported wallet, as handed to the presentation layer
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Recovery phrase
    pub mnemonic: String,
    /// Hex-encoded 32-byte public key
    pub public_key: String,
    /// Hex-encoded 64-byte private key (`seed || public_key`)
    pub private_key: String,
    /// Address string
    pub address: String,
}

impl WalletRecord {
    fn from_parts(mnemonic: String, key_pair: &KeyPair) -> Self {
        Self {
            mnemonic,
            public_key: key_pair.public_key_hex(),
            private_key: key_pair.private_key_hex().to_string(),
            address: key_pair.address().to_string(),
        }
    }

    /// Rebuild the signing keypair from the stored private key.
    pub fn key_pair(&self) -> Result<KeyPair> {
        KeyPair::from_private_key_hex(&self.private_key)
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("public_key", &self.public_key)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Drop for WalletRecord {
    fn drop(&mut self) {
        self.mnemonic.zeroize();
        self.private_key.zeroize();
    }
}

/// Create a wallet from a new 12-word mnemonic.
pub fn create_wallet() -> Result<WalletRecord> {
    let mnemonic = generate_mnemonic(None)?;
    let record = import_wallet_from_mnemonic(&mnemonic)?;
    tracing::info!(address = %record.address, "created wallet");
    Ok(record)
}

/// Restore a wallet from its recovery phrase.
pub fn import_wallet_from_mnemonic(mnemonic: &str) -> Result<WalletRecord> {
    let normalized = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");
    let key_pair = derive_key_pair(&normalized)?;
    Ok(WalletRecord::from_parts(normalized, &key_pair))
}

/// Address for a hex-encoded public key.
pub fn generate_address(public_key_hex: &str) -> Result<Address> {
    let public_key = hex::decode(public_key_hex.trim())
        .map_err(|e| Error::InvalidKey(format!("public key is not hex: {e}")))?;
    compute_address(&public_key)
}
