//! Error types for Masslet Core
//!
//! Error taxonomy for key derivation, address and operation codecs, and signing.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Masslet Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mnemonic failed wordlist or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Address failed prefix, Base58Check, length or version checks
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Key bytes have the wrong length
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// Key material is well-sized but unusable (bad hex, mismatched halves)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Serialized operation bytes could not be decoded
    #[error("Malformed operation: {0}")]
    MalformedOperation(String),

    /// Amount is negative, non-finite, zero or out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Signing failed
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Key vault could not seal or open key material
    #[error("Key vault error: {0}")]
    Vault(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMnemonic(_)
                | Error::InvalidAddress(_)
                | Error::InvalidAmount(_)
                | Error::Vault(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidMnemonic(_) => {
                "The recovery phrase is invalid. Please check and try again.".to_string()
            }
            Error::InvalidAddress(_) => {
                "The recipient address is invalid. Please check and try again.".to_string()
            }
            Error::InvalidAmount(_) => {
                "The amount is invalid. Please enter a valid amount.".to_string()
            }
            Error::Vault(_) => {
                "Unable to unlock the wallet key. Please check your password.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidAmount(_) => ErrorCategory::Amount,
            Error::InvalidAddress(_) => ErrorCategory::Address,
            Error::MalformedOperation(_) | Error::SigningError(_) => ErrorCategory::Operation,
            Error::InvalidKeyLength { .. } | Error::InvalidKey(_) | Error::Vault(_) => {
                ErrorCategory::Keys
            }
            Error::InvalidMnemonic(_) => ErrorCategory::Wallet,
            Error::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Amount-related errors
    Amount,
    /// Address-related errors
    Address,
    /// Operation encoding and signing errors
    Operation,
    /// Key-related errors
    Keys,
    /// Wallet-related errors
    Wallet,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Amount => write!(f, "Amount"),
            ErrorCategory::Address => write!(f, "Address"),
            ErrorCategory::Operation => write!(f, "Operation"),
            ErrorCategory::Keys => write!(f, "Keys"),
            ErrorCategory::Wallet => write!(f, "Wallet"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}
