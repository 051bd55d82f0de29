//! Key derivation and management
//!
//! Mnemonic phrases are stretched with BIP-39 into a 64-byte seed. The first
//! 32 seed bytes are the Ed25519 secret seed; the exported private key is the
//! 64-byte `seed || public_key` form.

use crate::address::Address;
use crate::{Error, Result};
use bip39::{Language, Mnemonic};
use ed25519_dalek::{SigningKey, VerifyingKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

/// Word count used when none (or an unsupported one) is requested
pub const DEFAULT_WORD_COUNT: u32 = 12;

/// BIP-39 seed, wiped on drop
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    /// Stretch a mnemonic into its seed (empty passphrase).
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self> {
        let mnemonic = parse_mnemonic(mnemonic)?;
        Ok(Self(Zeroizing::new(mnemonic.to_seed_normalized(""))))
    }

    /// Full 64 seed bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// The 32 bytes used as signing-key entropy
    pub fn signing_entropy(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut out = [0u8; SECRET_KEY_LENGTH];
        out.copy_from_slice(&self.0[..SECRET_KEY_LENGTH]);
        out
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Ed25519 signing keypair
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Build a keypair from 32 bytes of secret seed material.
    pub fn from_secret_seed(secret: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Import the 64-byte `seed || public_key` private key.
    ///
    /// The public half must match the one derived from the seed half.
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; KEYPAIR_LENGTH] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                expected: KEYPAIR_LENGTH,
                actual: bytes.len(),
            })?;
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|_| Error::InvalidKey("public key does not match secret seed".to_string()))?;
        Ok(Self { signing_key })
    }

    /// Import a hex-encoded 64-byte private key.
    pub fn from_private_key_hex(private_key_hex: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(private_key_hex.trim())
                .map_err(|e| Error::InvalidKey(format!("private key is not hex: {e}")))?,
        );
        Self::from_private_key_bytes(&bytes)
    }

    /// 32-byte public key
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Verifying half of the pair
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// 64-byte private key (`seed || public_key`)
    pub fn private_key(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// Hex-encoded public key
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    /// Hex-encoded private key
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.private_key().as_slice()))
    }

    /// Address owned by this keypair
    pub fn address(&self) -> Address {
        Address::from_hash(crate::address::hash_public_key(&self.public_key()))
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Fixed keypair for tests
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn test_key_pair() -> Self {
        Self::from_secret_seed(&[7u8; SECRET_KEY_LENGTH])
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
            && self.private_key().as_slice() == other.private_key().as_slice()
    }
}

impl Eq for KeyPair {}

fn parse_mnemonic(mnemonic: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in_normalized(Language::English, mnemonic)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Generate a new random mnemonic.
///
/// Supported word counts are 12, 18 and 24; anything else produces
/// [`DEFAULT_WORD_COUNT`] words.
pub fn generate_mnemonic(word_count: Option<u32>) -> Result<String> {
    let entropy_size = match word_count.unwrap_or(DEFAULT_WORD_COUNT) {
        18 => 24,
        24 => 32,
        _ => 16,
    };

    let mut entropy = Zeroizing::new(vec![0u8; entropy_size]);
    rand::thread_rng().fill_bytes(&mut entropy);

    let mnemonic =
        Mnemonic::from_entropy(&entropy).map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Check wordlist membership and checksum.
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    parse_mnemonic(mnemonic).is_ok()
}

/// Derive the signing keypair for a mnemonic.
pub fn derive_key_pair(mnemonic: &str) -> Result<KeyPair> {
    let seed = Seed::from_mnemonic(mnemonic)?;
    let entropy = Zeroizing::new(seed.signing_entropy());
    Ok(KeyPair::from_secret_seed(&entropy))
}
