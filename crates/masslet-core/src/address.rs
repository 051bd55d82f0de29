//! User address encoding and validation
//!
//! An address is `"AU"` followed by the Base58Check encoding of a version
//! byte (`0x00`) and the SHA-256 hash of the owner's public key.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Prefix of every user address
pub const ADDRESS_PREFIX: &str = "AU";

/// Address version byte
pub const ADDRESS_VERSION: u8 = 0;

/// Length of the public key hash carried by an address
pub const ADDRESS_HASH_LENGTH: usize = 32;

const PUBLIC_KEY_LENGTH: usize = 32;

/// Validated user address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    encoded: String,
    hash: [u8; ADDRESS_HASH_LENGTH],
}

impl Address {
    /// Build the address for a public key hash.
    pub fn from_hash(hash: [u8; ADDRESS_HASH_LENGTH]) -> Self {
        let mut payload = Vec::with_capacity(1 + ADDRESS_HASH_LENGTH);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&hash);
        let encoded = format!(
            "{ADDRESS_PREFIX}{}",
            bs58::encode(payload).with_check().into_string()
        );
        Self { encoded, hash }
    }

    /// Parse and fully validate an address string.
    pub fn parse(address: &str) -> Result<Self> {
        let hash = decode_address(address)?;
        Ok(Self {
            encoded: address.to_string(),
            hash,
        })
    }

    /// Public key hash carried by the address
    pub fn hash(&self) -> &[u8; ADDRESS_HASH_LENGTH] {
        &self.hash
    }

    /// Address string
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Fixed address for tests
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn test_address() -> Self {
        Self::from_hash([0x42; ADDRESS_HASH_LENGTH])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        let hash = decode_address(&value)?;
        Ok(Self {
            encoded: value,
            hash,
        })
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.encoded
    }
}

pub(crate) fn hash_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> [u8; ADDRESS_HASH_LENGTH] {
    Sha256::digest(public_key).into()
}

/// Compute the address of a 32-byte public key.
pub fn compute_address(public_key: &[u8]) -> Result<Address> {
    let public_key: &[u8; PUBLIC_KEY_LENGTH] =
        public_key
            .try_into()
            .map_err(|_| Error::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: public_key.len(),
            })?;
    Ok(Address::from_hash(hash_public_key(public_key)))
}

/// Decode an address string into its public key hash.
///
/// Checks, in order: the `AU` prefix, Base58 alphabet and checksum, a decoded
/// length of 33 bytes, and the version byte.
pub fn decode_address(address: &str) -> Result<[u8; ADDRESS_HASH_LENGTH]> {
    let body = address.strip_prefix(ADDRESS_PREFIX).ok_or_else(|| {
        Error::InvalidAddress(format!("address must start with '{ADDRESS_PREFIX}'"))
    })?;

    let payload = bs58::decode(body)
        .with_check(None)
        .into_vec()
        .map_err(|e| Error::InvalidAddress(format!("base58check decode failed: {e}")))?;

    if payload.len() != 1 + ADDRESS_HASH_LENGTH {
        return Err(Error::InvalidAddress(format!(
            "expected {} payload bytes, got {}",
            1 + ADDRESS_HASH_LENGTH,
            payload.len()
        )));
    }
    if payload[0] != ADDRESS_VERSION {
        return Err(Error::InvalidAddress(format!(
            "unsupported address version {}",
            payload[0]
        )));
    }

    let mut hash = [0u8; ADDRESS_HASH_LENGTH];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

/// Whether `address` decodes cleanly.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}
