//! Best-effort transfer history
//!
//! History comes from the address's operation list when the node reports
//! one, and otherwise from scanning recent blocks. Missing data yields an
//! empty list rather than an error.

use crate::balance::BalanceValue;
use crate::status::PeriodShape;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use masslet_core::amount::format_nano;
use masslet_core::Address;
use masslet_rpc::{CancelToken, RpcClient, RpcTransport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

const UNKNOWN: &str = "Unknown";

/// Finality of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Final on chain
    Success,
    /// Not yet final
    Pending,
}

impl From<bool> for TransferStatus {
    fn from(is_final: bool) -> Self {
        if is_final {
            TransferStatus::Success
        } else {
            TransferStatus::Pending
        }
    }
}

/// One normalized transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Operation id
    pub id: String,
    /// Creator address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Amount in MAS, six decimals, or `"0"` when unknown
    pub amount: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    /// Finality
    pub status: TransferStatus,
}

/// Limits for history lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Most operations fetched by id
    pub max_operations: usize,
    /// Periods scanned back from the current one
    pub lookback_periods: u64,
}

/// Operation ids listed in an address info object.
///
/// `operations` (or `created_operations`) may be an array of ids or an
/// object keyed by id.
pub fn operation_ids(info: &Value) -> Vec<String> {
    let listed = info
        .get("operations")
        .or_else(|| info.get("created_operations"));
    match listed {
        Some(Value::Array(ids)) => ids
            .iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(ids)) => ids.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Views of an operation entry that may be wrapped at several levels
struct OperationView<'a> {
    wrapper: &'a Value,
    operation: &'a Value,
    content: &'a Value,
}

impl<'a> OperationView<'a> {
    fn new(wrapper: &'a Value) -> Self {
        let operation = wrapper.get("operation").unwrap_or(wrapper);
        let content = operation.get("content").unwrap_or(operation);
        Self {
            wrapper,
            operation,
            content,
        }
    }

    fn id(&self) -> Option<&'a str> {
        self.wrapper
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| self.operation.get("id").and_then(Value::as_str))
    }

    fn creator(&self) -> Option<&'a str> {
        self.content
            .get("content_creator_address")
            .or_else(|| self.operation.get("content_creator_address"))
            .and_then(Value::as_str)
    }

    fn transfer(&self) -> Option<&'a Value> {
        const PATHS: [&str; 4] = [
            "/op/transaction",
            "/op/Transaction",
            "/transaction",
            "/Transaction",
        ];
        PATHS.iter().find_map(|path| self.content.pointer(path))
    }

    fn recipient(&self) -> Option<&'a str> {
        self.transfer()?.get("recipient_address")?.as_str()
    }

    fn amount(&self) -> Option<u64> {
        self.transfer()?
            .get("amount")
            .and_then(BalanceValue::parse)
            .map(BalanceValue::nano)
    }

    fn involves(&self, address: &str) -> bool {
        self.creator() == Some(address) || self.recipient() == Some(address)
    }

    fn into_record(self, timestamp: String, is_final: bool) -> TransferRecord {
        TransferRecord {
            id: self.id().unwrap_or(UNKNOWN).to_string(),
            from: self.creator().unwrap_or(UNKNOWN).to_string(),
            to: self.recipient().unwrap_or(UNKNOWN).to_string(),
            amount: self.amount().map_or_else(|| "0".to_string(), format_nano),
            timestamp,
            status: is_final.into(),
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a `get_operations` result.
pub fn records_from_operations(result: &Value, now: DateTime<Utc>) -> Vec<TransferRecord> {
    let Some(entries) = result.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| {
            let is_final = entry
                .get("is_operation_final")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            OperationView::new(entry).into_record(format_timestamp(now), is_final)
        })
        .collect()
}

/// Transfers touching `address` in a `get_graph_interval` result.
pub fn records_from_blocks(result: &Value, address: &str, now: DateTime<Utc>) -> Vec<TransferRecord> {
    let Some(blocks) = result.as_array() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for block in blocks {
        let Some(operations) = block.get("operations").and_then(Value::as_array) else {
            continue;
        };
        let timestamp = block
            .get("timestamp")
            .and_then(Value::as_i64)
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(now);
        let is_final = block
            .get("is_final")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        records.extend(
            operations
                .iter()
                .map(OperationView::new)
                .filter(|view| view.involves(address))
                .map(|view| view.into_record(format_timestamp(timestamp), is_final)),
        );
    }
    records
}

fn degrade<T: Default>(outcome: masslet_rpc::Result<T>, step: &str) -> Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(masslet_rpc::Error::Cancelled) => Err(Error::Cancelled),
        Err(e) => {
            warn!(step, error = %e, "history lookup failed");
            Ok(T::default())
        }
    }
}

/// Resolve recent transfers for `address`.
pub async fn resolve_history<T: RpcTransport>(
    rpc: &RpcClient<T>,
    address: &Address,
    limits: HistoryLimits,
    cancel: &CancelToken,
) -> Result<Vec<TransferRecord>> {
    let info = degrade(
        rpc.call_with_cancel("get_addresses", json!([[address.as_str()]]), cancel)
            .await,
        "get_addresses",
    )?;

    let mut ids = info.get(0).map(operation_ids).unwrap_or_default();
    ids.truncate(limits.max_operations);

    if !ids.is_empty() {
        debug!(address = %address, count = ids.len(), "fetching operations");
        let operations = degrade(
            rpc.call_with_cancel("get_operations", json!([ids]), cancel)
                .await,
            "get_operations",
        )?;
        let records = records_from_operations(&operations, Utc::now());
        if !records.is_empty() {
            return Ok(records);
        }
    }

    scan_recent_blocks(rpc, address, limits, cancel).await
}

async fn scan_recent_blocks<T: RpcTransport>(
    rpc: &RpcClient<T>,
    address: &Address,
    limits: HistoryLimits,
    cancel: &CancelToken,
) -> Result<Vec<TransferRecord>> {
    let status = degrade(
        rpc.call_with_cancel("get_status", json!([]), cancel).await,
        "get_status",
    )?;
    let Some(end) = PeriodShape::parse(&status).and_then(PeriodShape::period) else {
        debug!(address = %address, "no current period, skipping block scan");
        return Ok(Vec::new());
    };
    let start = end.saturating_sub(limits.lookback_periods);

    let blocks = degrade(
        rpc.call_with_cancel(
            "get_graph_interval",
            json!([{ "start": start, "end": end }]),
            cancel,
        )
        .await,
        "get_graph_interval",
    )?;

    Ok(records_from_blocks(&blocks, address.as_str(), Utc::now()))
}
