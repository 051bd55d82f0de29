//! Encrypt/decrypt capability for private keys at rest
//!
//! The on-disk format belongs to the embedding application. The core only
//! calls through this trait when it is handed sealed key material.

use crate::keys::KeyPair;
use crate::Result;
use zeroize::Zeroizing;

/// Password-based sealing of private key bytes
pub trait KeyVault: Send + Sync {
    /// Encrypt `secret` under `password`, returning an opaque ciphertext string.
    fn seal(&self, secret: &[u8], password: &str) -> Result<String>;

    /// Decrypt a ciphertext produced by [`KeyVault::seal`].
    ///
    /// A wrong password or corrupted ciphertext must fail with `Error::Vault`.
    fn open(&self, ciphertext: &str, password: &str) -> Result<Zeroizing<Vec<u8>>>;
}

/// Seal a keypair's 64-byte private key.
pub fn seal_key_pair(vault: &dyn KeyVault, key_pair: &KeyPair, password: &str) -> Result<String> {
    vault.seal(key_pair.private_key().as_slice(), password)
}

/// Open sealed key material into a keypair.
pub fn open_key_pair(vault: &dyn KeyVault, ciphertext: &str, password: &str) -> Result<KeyPair> {
    let secret = vault.open(ciphertext, password)?;
    KeyPair::from_private_key_bytes(&secret)
}
