//! Balance resolution

use crate::{Error, Result};
use masslet_core::amount::{format_nano, parse_nano_or_decimal};
use masslet_core::Address;
use masslet_rpc::{CancelToken, RpcClient, RpcTransport};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Balance keys in preference order
const BALANCE_KEYS: [&str; 3] = ["candidate_balance", "final_balance", "balance"];

/// One balance field as reported by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceValue {
    /// String containing a decimal point, already in MAS
    MasDecimal(u64),
    /// Integer string or JSON number, in nano-units
    Nano(u64),
}

impl BalanceValue {
    /// Classify a balance field. Unusable values give `None`.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.contains('.') => {
                parse_nano_or_decimal(s).ok().map(BalanceValue::MasDecimal)
            }
            Value::String(s) => parse_nano_or_decimal(s).ok().map(BalanceValue::Nano),
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                        .map(|f| f.trunc() as u64)
                })
                .map(BalanceValue::Nano),
            _ => None,
        }
    }

    /// Balance in nano-units
    pub fn nano(self) -> u64 {
        match self {
            BalanceValue::MasDecimal(n) | BalanceValue::Nano(n) => n,
        }
    }
}

/// First usable balance field of an address info object.
pub fn balance_from_info(info: &Value) -> Option<u64> {
    BALANCE_KEYS
        .iter()
        .find_map(|key| info.get(*key).and_then(BalanceValue::parse))
        .map(BalanceValue::nano)
}

/// Balance out of a `get_balance` result, which is either a bare value or an object.
pub fn balance_from_get_balance(result: &Value) -> Option<u64> {
    match result {
        Value::Object(_) => balance_from_info(result),
        Value::Array(items) => items.first().and_then(balance_from_get_balance),
        other => BalanceValue::parse(other).map(BalanceValue::nano),
    }
}

/// Resolve an address balance in nano-units.
///
/// `get_addresses` is asked first; a zero or missing balance falls back to
/// `get_balance`. Network failures count as "no data"; only cancellation
/// is returned as an error.
pub async fn resolve_balance<T: RpcTransport>(
    rpc: &RpcClient<T>,
    address: &Address,
    cancel: &CancelToken,
) -> Result<u64> {
    let primary = match rpc
        .call_with_cancel("get_addresses", json!([[address.as_str()]]), cancel)
        .await
    {
        Ok(result) => result.get(0).and_then(balance_from_info),
        Err(masslet_rpc::Error::Cancelled) => return Err(Error::Cancelled),
        Err(e) => {
            warn!(address = %address, error = %e, "get_addresses failed");
            None
        }
    };

    if let Some(nano) = primary.filter(|n| *n > 0) {
        debug!(address = %address, nano, "balance from get_addresses");
        return Ok(nano);
    }

    let fallback = match rpc
        .call_with_cancel("get_balance", json!([address.as_str()]), cancel)
        .await
    {
        Ok(result) => balance_from_get_balance(&result),
        Err(masslet_rpc::Error::Cancelled) => return Err(Error::Cancelled),
        Err(e) => {
            warn!(address = %address, error = %e, "get_balance fallback failed");
            None
        }
    };

    Ok(fallback.or(primary).unwrap_or(0))
}

/// [`resolve_balance`] formatted as MAS with six decimals.
pub async fn resolve_balance_display<T: RpcTransport>(
    rpc: &RpcClient<T>,
    address: &Address,
    cancel: &CancelToken,
) -> Result<String> {
    resolve_balance(rpc, address, cancel).await.map(format_nano)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_value_shapes() {
        assert_eq!(
            BalanceValue::parse(&json!("1999000000")),
            Some(BalanceValue::Nano(1_999_000_000))
        );
        assert_eq!(
            BalanceValue::parse(&json!("1.999")),
            Some(BalanceValue::MasDecimal(1_999_000_000))
        );
        assert_eq!(BalanceValue::parse(&json!(42)), Some(BalanceValue::Nano(42)));
        assert_eq!(BalanceValue::parse(&json!(null)), None);
        assert_eq!(BalanceValue::parse(&json!("lots")), None);
        assert_eq!(BalanceValue::parse(&json!(-3)), None);
    }

    #[test]
    fn test_candidate_preferred() {
        let info = json!({"candidate_balance": "2.5", "final_balance": "1.0"});
        assert_eq!(balance_from_info(&info), Some(2_500_000_000));
    }

    #[test]
    fn test_final_used_when_candidate_missing() {
        let info = json!({"candidate_balance": null, "final_balance": "7000000000"});
        assert_eq!(balance_from_info(&info), Some(7_000_000_000));
    }

    #[test]
    fn test_get_balance_shapes() {
        assert_eq!(balance_from_get_balance(&json!("3.0")), Some(3_000_000_000));
        assert_eq!(
            balance_from_get_balance(&json!({"final_balance": "5"})),
            Some(5)
        );
        assert_eq!(
            balance_from_get_balance(&json!([{"balance": "1.5"}])),
            Some(1_500_000_000)
        );
        assert_eq!(balance_from_get_balance(&json!({})), None);
    }
}
