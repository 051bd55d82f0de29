//! JSON-RPC client for Massa nodes
//!
//! Calls are tried against an ordered list of endpoints, one at a time,
//! each bounded by a per-call timeout. The first endpoint that returns a
//! result wins; exhausting the list is the only fatal network outcome.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod transport;

pub use cancel::CancelToken;
pub use client::RpcClient;
pub use config::RpcConfig;
pub use envelope::{JsonRpcRequest, Reply, JSONRPC_VERSION};
pub use error::{Error, Result};
pub use transport::{HttpTransport, RpcTransport};
