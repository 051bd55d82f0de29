//! Operation signing
//!
//! The signed message is `chain_id (u64, big-endian) || public_key || serialized_operation`.
//! Binding the chain id prevents an operation signed for one network from
//! being replayed on another.

use crate::keys::KeyPair;
use crate::operation::Operation;
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::{Signature, Signer as _, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use serde::{Deserialize, Serialize};

/// Operation ready for `send_operations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// Canonical operation bytes
    pub serialized_content: Vec<u8>,
    /// Base64 public key of the creator
    pub creator_public_key: String,
    /// Base64 detached signature over the signing payload
    pub signature: String,
}

/// Bytes covered by the signature
pub fn signing_payload(chain_id: u64, public_key: &[u8; PUBLIC_KEY_LENGTH], serialized: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8 + PUBLIC_KEY_LENGTH + serialized.len());
    payload.extend_from_slice(&chain_id.to_be_bytes());
    payload.extend_from_slice(public_key);
    payload.extend_from_slice(serialized);
    payload
}

/// Serialize and sign `operation` for `chain_id`.
pub fn sign(operation: &Operation, key_pair: &KeyPair, chain_id: u64) -> Result<SignedSubmission> {
    let serialized = operation.serialize();
    let public_key = key_pair.public_key();
    let payload = signing_payload(chain_id, &public_key, &serialized);

    let signature = key_pair
        .signing_key()
        .try_sign(&payload)
        .map_err(|e| Error::SigningError(e.to_string()))?;

    tracing::debug!(
        chain_id,
        recipient = %operation.recipient,
        amount = operation.amount,
        expire_period = operation.expire_period,
        "signed operation"
    );

    Ok(SignedSubmission {
        serialized_content: serialized,
        creator_public_key: STANDARD.encode(public_key),
        signature: STANDARD.encode(signature.to_bytes()),
    })
}

/// Sign with a raw 64-byte private key.
pub fn sign_with_private_key(
    operation: &Operation,
    private_key: &[u8],
    chain_id: u64,
) -> Result<SignedSubmission> {
    let key_pair = KeyPair::from_private_key_bytes(private_key).map_err(|e| match e {
        Error::InvalidKeyLength { expected, actual } => Error::SigningError(format!(
            "private key must be {expected} bytes, got {actual}"
        )),
        other => Error::SigningError(other.to_string()),
    })?;
    sign(operation, &key_pair, chain_id)
}

/// Check a submission's signature against its own public key and content.
pub fn verify_submission(submission: &SignedSubmission, chain_id: u64) -> Result<()> {
    let public_key: [u8; PUBLIC_KEY_LENGTH] = decode_fixed(&submission.creator_public_key, "public key")?;
    let signature: [u8; SIGNATURE_LENGTH] = decode_fixed(&submission.signature, "signature")?;

    let verifying_key = VerifyingKey::from_bytes(&public_key)
        .map_err(|e| Error::SigningError(format!("invalid public key: {e}")))?;
    let payload = signing_payload(chain_id, &public_key, &submission.serialized_content);

    verifying_key
        .verify_strict(&payload, &Signature::from_bytes(&signature))
        .map_err(|e| Error::SigningError(format!("signature does not verify: {e}")))
}

fn decode_fixed<const N: usize>(encoded: &str, what: &str) -> Result<[u8; N]> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::SigningError(format!("{what} is not base64: {e}")))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| Error::SigningError(format!("{what} must be {N} bytes, got {len}")))
}
