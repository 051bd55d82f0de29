//! Error types for wallet service operations

/// Wallet service errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key, address, codec or signing failure
    #[error(transparent)]
    Core(#[from] masslet_core::Error),

    /// RPC failure after failover
    #[error(transparent)]
    Rpc(masslet_rpc::Error),

    /// Node status carried no usable period
    #[error("Network status unavailable: {0}")]
    StatusUnavailable(String),

    /// Node accepted the call but returned no operation id
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid service configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<masslet_rpc::Error> for Error {
    fn from(err: masslet_rpc::Error) -> Self {
        match err {
            masslet_rpc::Error::Cancelled => Error::Cancelled,
            other => Error::Rpc(other),
        }
    }
}

impl From<masslet_params::Error> for Error {
    fn from(err: masslet_params::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    /// Message suitable for showing to the wallet user
    pub fn user_message(&self) -> String {
        match self {
            Error::Core(e) => e.user_message(),
            Error::Rpc(masslet_rpc::Error::AllEndpointsFailed { .. }) => {
                "Unable to reach the Massa network. Please try again later.".to_string()
            }
            Error::StatusUnavailable(_) => {
                "Could not read the current network period. Please try again later.".to_string()
            }
            Error::SubmissionRejected(_) => "The network rejected the transaction.".to_string(),
            Error::Cancelled => "The operation was cancelled.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
