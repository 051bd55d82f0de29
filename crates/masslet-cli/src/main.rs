//! Command-line front end for the Massa wallet service
//!
//! Every command prints a JSON document on stdout; logs go to stderr and
//! are filtered with `RUST_LOG`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use masslet_params::NetworkType;
use masslet_wallet_service::{
    CancelToken, KeyMaterial, SendRequest, ServiceConfig, WalletService,
};
use serde::Serialize;
use serde_json::json;
use std::env;
use tracing::{info, warn};

/// Sender key for `send`; never accepted on the command line.
const PRIVATE_KEY_ENV: &str = "MASSLET_PRIVATE_KEY";

#[derive(Parser)]
#[command(name = "masslet")]
#[command(about = "Massa light wallet", long_about = None)]
struct Cli {
    /// Network to use (mainnet or buildnet); defaults to MASSLET_NETWORK
    #[arg(long, global = true)]
    network: Option<NetworkType>,

    /// JSON-RPC endpoints, tried in order; defaults to MASSLET_RPC_ENDPOINTS
    #[arg(long = "endpoint", global = true, value_delimiter = ',')]
    endpoints: Vec<String>,

    /// Per-endpoint timeout in seconds; defaults to MASSLET_RPC_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet
    Create,

    /// Restore a wallet from its recovery phrase
    Import {
        /// Recovery phrase
        #[arg(long, env = "MASSLET_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
    },

    /// Derive the address of a public key
    Address {
        /// Hex-encoded 32-byte public key
        public_key: String,
    },

    /// Check whether an address is well formed
    Validate {
        /// Address to check
        address: String,
    },

    /// Show an address balance
    Balance {
        /// Address to query
        address: String,
    },

    /// Send MAS, signing with the key in MASSLET_PRIVATE_KEY
    Send {
        /// Sending address
        #[arg(long)]
        from: String,

        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in MAS
        #[arg(long)]
        amount: f64,
    },

    /// Show recent transfers
    History {
        /// Address to query
        address: String,
    },

    /// Show network status
    NetworkInfo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli, |key| env::var(key).ok())?;

    match cli.command {
        Commands::Create => print_json(&masslet_core::create_wallet()?),
        Commands::Import { mnemonic } => {
            print_json(&masslet_core::import_wallet_from_mnemonic(&mnemonic)?)
        }
        Commands::Address { public_key } => {
            let address = masslet_core::generate_address(&public_key)?;
            print_json(&json!({ "address": address }))
        }
        Commands::Validate { address } => print_json(&json!({
            "address": address,
            "valid": masslet_core::is_valid_address(address.trim()),
        })),
        Commands::Balance { address } => {
            let service = WalletService::new(config)?;
            let cancel = cancel_on_ctrl_c();
            let balance = service.get_wallet_balance(&address, &cancel).await?;
            print_json(&json!({ "address": address, "balance": balance }))
        }
        Commands::Send {
            from,
            to,
            amount,
        } => {
            let private_key = env::var(PRIVATE_KEY_ENV)
                .with_context(|| format!("{PRIVATE_KEY_ENV} must hold the sender's private key hex"))?;
            let chain_id = config.chain_id;
            let service = WalletService::new(config)?;
            let cancel = cancel_on_ctrl_c();
            let request = SendRequest {
                key: KeyMaterial::PrivateKeyHex(private_key),
                from,
                to,
                amount_mas: amount,
                chain_id,
            };
            let outcome = service.send_transaction(&request, &cancel).await;
            print_json(&outcome)?;
            if !outcome.success {
                anyhow::bail!(outcome.error.unwrap_or_else(|| "send failed".to_string()));
            }
            Ok(())
        }
        Commands::History { address } => {
            let service = WalletService::new(config)?;
            let cancel = cancel_on_ctrl_c();
            print_json(&service.get_transaction_history(&address, &cancel).await?)
        }
        Commands::NetworkInfo => {
            let service = WalletService::new(config)?;
            let cancel = cancel_on_ctrl_c();
            print_json(&service.get_network_info(&cancel).await?)
        }
    }
}

/// Environment settings from `lookup`, overridden by command-line flags.
fn build_config(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<ServiceConfig> {
    let mut config = match cli.network {
        Some(network) => ServiceConfig::for_network_with_lookup(network, lookup),
        None => ServiceConfig::from_lookup(lookup),
    }
    .context("reading configuration from environment")?;
    let endpoints: Vec<String> = cli
        .endpoints
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if !endpoints.is_empty() {
        config.endpoints = endpoints;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    info!(network = ?config.network, chain_id = config.chain_id, "configuration loaded");
    Ok(config)
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight request");
            handle.cancel();
        }
    });
    cancel
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config_for(args: &[&str], vars: &[(&str, &str)]) -> ServiceConfig {
        let cli = Cli::parse_from(args.iter().copied());
        build_config(&cli, |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_network_flag_keeps_explicit_chain_id() {
        let config = config_for(
            &["masslet", "--network", "mainnet", "network-info"],
            &[("MASSLET_CHAIN_ID", "42")],
        );
        assert_eq!(config.network, NetworkType::Mainnet);
        assert_eq!(config.chain_id, 42);
    }

    #[test]
    fn test_network_flag_switches_default_chain_id() {
        let config = config_for(
            &["masslet", "--network", "mainnet", "network-info"],
            &[("MASSLET_NETWORK", "buildnet")],
        );
        assert_eq!(config.network, NetworkType::Mainnet);
        assert_eq!(config.chain_id, 77_658_377);
    }

    #[test]
    fn test_timeout_from_environment() {
        let config = config_for(
            &["masslet", "network-info"],
            &[("MASSLET_RPC_TIMEOUT_SECS", "3")],
        );
        assert_eq!(config.rpc_config().request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_flags_beat_environment() {
        let config = config_for(
            &["masslet", "--timeout-secs", "5", "--endpoint", "http://a,http://b", "network-info"],
            &[
                ("MASSLET_RPC_TIMEOUT_SECS", "3"),
                ("MASSLET_RPC_ENDPOINTS", "http://c"),
            ],
        );
        let rpc = config.rpc_config();
        assert_eq!(rpc.request_timeout, Duration::from_secs(5));
        assert_eq!(rpc.endpoints, vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_endpoints_from_environment() {
        let config = config_for(
            &["masslet", "balance", "AU12oQPzbLwjkCHHh8gqN6nmPXSA9h3KocX6AHKt4xz1ahorDYUzA"],
            &[("MASSLET_RPC_ENDPOINTS", "http://c")],
        );
        assert_eq!(config.rpc_config().endpoints, vec!["http://c"]);
    }
}
