//! Massa wallet service
//!
//! Composes key handling from `masslet-core` with the failover RPC client
//! from `masslet-rpc` into the operations a wallet front end calls:
//! create/import, validate, balance, send, history and network info.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod config;
pub mod error;
pub mod history;
pub mod network_info;
pub mod orchestrator;
pub mod service;
pub mod status;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use history::{TransferRecord, TransferStatus};
pub use network_info::{BlockHeight, NetworkInfo};
pub use orchestrator::{KeyMaterial, SendRequest, SendStage, TransactionOrchestrator};
pub use service::{SendOutcome, WalletService};
pub use status::NetworkStatus;

pub use masslet_rpc::CancelToken;
