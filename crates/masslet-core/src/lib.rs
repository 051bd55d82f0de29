//! Massa wallet core
//!
//! This crate implements the wallet engine: mnemonic key derivation,
//! address encoding, canonical operation serialization and operation
//! signing. It performs no I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod error;
pub mod keys;
pub mod operation;
pub mod signer;
pub mod varint;
pub mod vault;
pub mod wallet;

pub use address::{compute_address, decode_address, is_valid_address, Address, ADDRESS_PREFIX};
pub use amount::{
    format_nano, mas_to_nano, parse_mas, parse_nano_or_decimal, DEFAULT_FEE, NANO_PER_MAS,
};
pub use error::{Error, ErrorCategory, Result};
pub use keys::{
    derive_key_pair, generate_mnemonic, validate_mnemonic, KeyPair, Seed,
};
pub use operation::{Operation, OperationType, EXPIRE_PERIOD_OFFSET};
pub use signer::{
    sign, sign_with_private_key, signing_payload, verify_submission, SignedSubmission,
};
pub use vault::{open_key_pair, seal_key_pair, KeyVault};
pub use wallet::{create_wallet, generate_address, import_wallet_from_mnemonic, WalletRecord};
