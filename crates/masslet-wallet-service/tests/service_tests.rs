//! Wallet service flows against a scripted node

use async_trait::async_trait;
use masslet_core::{KeyPair, KeyVault};
use masslet_rpc::{JsonRpcRequest, RpcClient, RpcConfig, RpcTransport};
use masslet_wallet_service::{
    CancelToken, Error, KeyMaterial, SendRequest, ServiceConfig, TransferStatus, WalletService,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zeroize::Zeroizing;

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ADDRESS: &str = "AU12oQPzbLwjkCHHh8gqN6nmPXSA9h3KocX6AHKt4xz1ahorDYUzA";
const PRIVATE_KEY_HEX: &str = "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1c5785e1865b708938aff8161d573006496663b1aa10834e396dc566869a2c66a";
const SERIALIZED_HEX: &str = "80ade204ca843d00ed0f8784166e0abfff51a9aff9ba259d8c028ed3b843ec1b3a58eea33ecf134e80dea0cb05";
const SIGNATURE_B64: &str = "u07I+7rtN203Zf7fWn9vxRL6GRTJ9IT0PRfQJ74w31NhmQUovzvvl4XFjxda5xwTx05wGtxHuEhF71hGYxnbCQ==";
const BUILDNET_CHAIN_ID: u64 = 77_658_366;

/// Answers by method name; unscripted methods fail at the transport level.
#[derive(Debug, Default)]
struct ScriptedNode {
    replies: HashMap<&'static str, Value>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedNode {
    fn with(mut self, method: &'static str, result: Value) -> Self {
        self.replies
            .insert(method, json!({"jsonrpc": "2.0", "id": 1, "result": result}));
        self
    }

    fn with_error(mut self, method: &'static str, message: &str) -> Self {
        self.replies.insert(
            method,
            json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": message}}),
        );
        self
    }

    fn methods_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    fn params_of(&self, method: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }
}

#[async_trait]
impl RpcTransport for ScriptedNode {
    async fn post(&self, _endpoint: &str, request: &JsonRpcRequest) -> masslet_rpc::Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((request.method.clone(), request.params.clone()));
        self.replies
            .get(request.method.as_str())
            .cloned()
            .ok_or_else(|| masslet_rpc::Error::Network("connection refused".to_string()))
    }
}

fn service(node: ScriptedNode) -> WalletService<ScriptedNode> {
    let rpc = RpcClient::with_transport(RpcConfig::new(vec!["http://node".to_string()]), node)
        .unwrap();
    WalletService::with_client(ServiceConfig::default(), rpc)
}

fn send_request(amount_mas: f64) -> SendRequest {
    SendRequest {
        key: KeyMaterial::PrivateKeyHex(PRIVATE_KEY_HEX.to_string()),
        from: ADDRESS.to_string(),
        to: ADDRESS.to_string(),
        amount_mas,
        chain_id: BUILDNET_CHAIN_ID,
    }
}

// ============================================================================
// Send
// ============================================================================

#[tokio::test]
async fn test_send_submits_pinned_operation() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"last_slot": {"period": 1_000_000, "thread": 4}}))
            .with("send_operations", json!(["O1pinned"])),
    );

    let id = svc.send(&send_request(1.5), &CancelToken::new()).await.unwrap();
    assert_eq!(id, "O1pinned");

    let node = svc.rpc().transport();
    assert_eq!(node.methods_called(), vec!["get_status", "send_operations"]);

    let params = node.params_of("send_operations").unwrap();
    let submitted = &params[0];
    let bytes: Vec<u8> = serde_json::from_value(submitted["serialized_content"].clone()).unwrap();
    assert_eq!(hex::encode(bytes), SERIALIZED_HEX);
    assert_eq!(submitted["creator_public_key"], "xXheGGW3CJOK/4Fh1XMAZJZmOxqhCDTjltxWaGmixmo=");
    assert_eq!(submitted["signature"], SIGNATURE_B64);
}

#[tokio::test]
async fn test_send_uses_cycle_derived_period() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"current_cycle": 7812, "periods_per_cycle": 128, "cycle_duration": 64}))
            .with("send_operations", json!(["O1cycle"])),
    );

    svc.send(&send_request(1.5), &CancelToken::new()).await.unwrap();
    // 7812 * 128 + 64 = 1_000_000, so the pinned bytes apply.
    let params = svc.rpc().transport().params_of("send_operations").unwrap();
    let bytes: Vec<u8> = serde_json::from_value(params[0]["serialized_content"].clone()).unwrap();
    assert_eq!(hex::encode(bytes), SERIALIZED_HEX);
}

#[tokio::test]
async fn test_send_without_period_is_status_unavailable() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"node_id": "N1", "version": "DEVN.28.3"}))
            .with("send_operations", json!(["never"])),
    );

    let err = svc.send(&send_request(1.0), &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::StatusUnavailable(_)));
    assert_eq!(svc.rpc().transport().methods_called(), vec!["get_status"]);
}

#[tokio::test]
async fn test_send_status_unreachable() {
    let svc = service(ScriptedNode::default());
    let err = svc.send(&send_request(1.0), &CancelToken::new()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Rpc(masslet_rpc::Error::AllEndpointsFailed { .. })
    ));
}

#[tokio::test]
async fn test_send_empty_result_is_rejected() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"period": 10}))
            .with("send_operations", json!([])),
    );

    let err = svc.send(&send_request(1.0), &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::SubmissionRejected(_)));
}

#[tokio::test]
async fn test_send_node_error_fails_loudly() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"period": 10}))
            .with_error("send_operations", "invalid signature"),
    );

    let err = svc.send(&send_request(1.0), &CancelToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("invalid signature"), "{err}");
}

#[tokio::test]
async fn test_send_validates_before_network() {
    let svc = service(ScriptedNode::default().with("get_status", json!({"period": 10})));
    let cancel = CancelToken::new();

    let mut bad_recipient = send_request(1.0);
    bad_recipient.to = "AU12oQPzbLwjkCHHh8gqN6nmPXSA9h3KocX6AHKt4xz1ahorF2UGW".to_string();
    let err = svc.send(&bad_recipient, &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Core(masslet_core::Error::InvalidAddress(_))));

    for amount in [-1.0, f64::NAN, f64::INFINITY, 0.0] {
        let err = svc.send(&send_request(amount), &cancel).await.unwrap_err();
        assert!(
            matches!(err, Error::Core(masslet_core::Error::InvalidAmount(_))),
            "amount {amount}: {err:?}"
        );
    }

    let mut bad_sender = send_request(1.0);
    bad_sender.from = "AU-not-mine".to_string();
    let err = svc.send(&bad_sender, &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Core(masslet_core::Error::InvalidKey(_))));
    let message = err.user_message();
    assert!(message.contains("sending address"), "{message}");
    assert!(!message.contains("recipient"), "{message}");

    let mut wrong_key = send_request(1.0);
    wrong_key.key = KeyMaterial::PrivateKeyHex(KeyPair::test_key_pair().private_key_hex().to_string());
    let err = svc.send(&wrong_key, &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Core(masslet_core::Error::InvalidKey(_))));

    assert!(svc.rpc().transport().methods_called().is_empty());
}

#[tokio::test]
async fn test_send_transaction_outcome() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"period": 10}))
            .with("send_operations", json!(["O1ok"])),
    );

    let outcome = svc.send_transaction(&send_request(0.25), &CancelToken::new()).await;
    assert!(outcome.success);
    assert_eq!(outcome.operation_id.as_deref(), Some("O1ok"));

    let mut bad = send_request(0.25);
    bad.to = "nope".to_string();
    let outcome = svc.send_transaction(&bad, &CancelToken::new()).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("address is invalid"));
}

/// Toy vault: password followed by the hex secret.
struct PrefixVault;

impl KeyVault for PrefixVault {
    fn seal(&self, secret: &[u8], password: &str) -> masslet_core::Result<String> {
        Ok(format!("{password}:{}", hex::encode(secret)))
    }

    fn open(&self, ciphertext: &str, password: &str) -> masslet_core::Result<Zeroizing<Vec<u8>>> {
        let body = ciphertext
            .strip_prefix(password)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| masslet_core::Error::Vault("wrong password".to_string()))?;
        hex::decode(body)
            .map(Zeroizing::new)
            .map_err(|e| masslet_core::Error::Vault(e.to_string()))
    }
}

#[tokio::test]
async fn test_send_with_sealed_key() {
    let svc = service(
        ScriptedNode::default()
            .with("get_status", json!({"period": 10}))
            .with("send_operations", json!(["O1sealed"])),
    )
    .with_vault(Arc::new(PrefixVault));

    let mut request = send_request(1.0);
    request.key = KeyMaterial::Sealed {
        ciphertext: format!("pw:{PRIVATE_KEY_HEX}"),
        password: "pw".to_string(),
    };
    assert_eq!(svc.send(&request, &CancelToken::new()).await.unwrap(), "O1sealed");

    request.key = KeyMaterial::Sealed {
        ciphertext: format!("pw:{PRIVATE_KEY_HEX}"),
        password: "wrong".to_string(),
    };
    let err = svc.send(&request, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::Core(masslet_core::Error::Vault(_))));
}

#[tokio::test]
async fn test_sealed_key_without_vault() {
    let svc = service(ScriptedNode::default());
    let mut request = send_request(1.0);
    request.key = KeyMaterial::Sealed {
        ciphertext: "x".to_string(),
        password: "y".to_string(),
    };
    let err = svc.send(&request, &CancelToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_send_cancelled() {
    let svc = service(ScriptedNode::default().with("get_status", json!({"period": 10})));
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = svc.send(&send_request(1.0), &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

// ============================================================================
// Wallet records
// ============================================================================

#[test]
fn test_import_and_validate() {
    let svc = service(ScriptedNode::default());
    let wallet = svc.import_wallet_from_mnemonic(MNEMONIC).unwrap();
    assert_eq!(wallet.address, ADDRESS);
    assert!(svc.validate_address(ADDRESS));
    assert!(!svc.validate_address("AS12oQPzbLwjkCHHh8gqN6nmPXSA9h3KocX6AHKt4xz1ahorDYUzA"));

    let created = svc.create_wallet().unwrap();
    assert!(svc.validate_address(&created.address));

    assert!(matches!(
        svc.import_wallet_from_mnemonic("abandon abandon"),
        Err(Error::Core(masslet_core::Error::InvalidMnemonic(_)))
    ));
}

// ============================================================================
// Balance
// ============================================================================

#[tokio::test]
async fn test_balance_from_nano_string() {
    let svc = service(ScriptedNode::default().with(
        "get_addresses",
        json!([{"address": ADDRESS, "candidate_balance": "1999000000", "final_balance": "0"}]),
    ));

    let balance = svc.get_wallet_balance(ADDRESS, &CancelToken::new()).await.unwrap();
    assert_eq!(balance, "1.999000");
    assert_eq!(svc.rpc().transport().params_of("get_addresses").unwrap(), json!([[ADDRESS]]));
}

#[tokio::test]
async fn test_balance_decimal_passthrough() {
    let svc = service(ScriptedNode::default().with(
        "get_addresses",
        json!([{"final_balance": "12.3456789"}]),
    ));
    let balance = svc.get_wallet_balance(ADDRESS, &CancelToken::new()).await.unwrap();
    assert_eq!(balance, "12.345679");
}

#[tokio::test]
async fn test_balance_zero_falls_back_to_get_balance() {
    let svc = service(
        ScriptedNode::default()
            .with("get_addresses", json!([{"candidate_balance": "0"}]))
            .with("get_balance", json!("2.5")),
    );
    let balance = svc.get_wallet_balance(ADDRESS, &CancelToken::new()).await.unwrap();
    assert_eq!(balance, "2.500000");
    assert_eq!(svc.rpc().transport().params_of("get_balance").unwrap(), json!([ADDRESS]));
}

#[tokio::test]
async fn test_balance_total_failure_is_zero() {
    let svc = service(ScriptedNode::default());
    let balance = svc.get_wallet_balance(ADDRESS, &CancelToken::new()).await.unwrap();
    assert_eq!(balance, "0.000000");
}

#[tokio::test]
async fn test_balance_invalid_address() {
    let svc = service(ScriptedNode::default());
    assert!(svc
        .get_wallet_balance("not-an-address", &CancelToken::new())
        .await
        .is_err());
    assert!(svc.rpc().transport().methods_called().is_empty());
}

#[tokio::test]
async fn test_balance_cancelled() {
    let svc = service(ScriptedNode::default().with("get_addresses", json!([])));
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(
        svc.get_wallet_balance(ADDRESS, &cancel).await,
        Err(Error::Cancelled)
    ));
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_from_operations() {
    let ids: Vec<String> = (0..15).map(|i| format!("O{i}")).collect();
    let svc = service(
        ScriptedNode::default()
            .with("get_addresses", json!([{"operations": ids}]))
            .with(
                "get_operations",
                json!([{
                    "id": "O0",
                    "is_operation_final": true,
                    "operation": {"content": {
                        "content_creator_address": ADDRESS,
                        "op": {"Transaction": {"recipient_address": "AUdest", "amount": "0.5"}}
                    }}
                }]),
            ),
    );

    let history = svc
        .get_transaction_history(ADDRESS, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "O0");
    assert_eq!(history[0].from, ADDRESS);
    assert_eq!(history[0].to, "AUdest");
    assert_eq!(history[0].amount, "0.500000");
    assert_eq!(history[0].status, TransferStatus::Success);

    // Only the first ten ids are requested.
    let params = svc.rpc().transport().params_of("get_operations").unwrap();
    assert_eq!(params[0].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_history_falls_back_to_block_scan() {
    let svc = service(
        ScriptedNode::default()
            .with("get_addresses", json!([{"operations": []}]))
            .with("get_status", json!({"last_slot": {"period": 50}}))
            .with(
                "get_graph_interval",
                json!([{
                    "timestamp": 1_700_000_000_000i64,
                    "is_final": false,
                    "operations": [{
                        "id": "Oblock",
                        "content_creator_address": "AUsender",
                        "op": {"transaction": {"recipient_address": ADDRESS, "amount": "1000000000"}}
                    }]
                }]),
            ),
    );

    let history = svc
        .get_transaction_history(ADDRESS, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "Oblock");
    assert_eq!(history[0].amount, "1.000000");
    assert_eq!(history[0].status, TransferStatus::Pending);

    // Look-back saturates at zero.
    let params = svc.rpc().transport().params_of("get_graph_interval").unwrap();
    assert_eq!(params, json!([{"start": 0, "end": 50}]));
}

#[tokio::test]
async fn test_history_cancelled() {
    let svc = service(ScriptedNode::default().with("get_addresses", json!([])));
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(
        svc.get_transaction_history(ADDRESS, &cancel).await,
        Err(Error::Cancelled)
    ));
    assert!(svc.rpc().transport().methods_called().is_empty());
}

#[tokio::test]
async fn test_history_total_failure_is_empty() {
    let svc = service(ScriptedNode::default());
    let history = svc
        .get_transaction_history(ADDRESS, &CancelToken::new())
        .await
        .unwrap();
    assert!(history.is_empty());
}

// ============================================================================
// Network info
// ============================================================================

#[tokio::test]
async fn test_network_info() {
    let svc = service(ScriptedNode::default().with(
        "get_status",
        json!({"last_slot": {"period": 321}, "connected_nodes": 12, "version": "DEVN.28.3"}),
    ));
    let info = svc.get_network_info(&CancelToken::new()).await.unwrap();
    let value = serde_json::to_value(&info).unwrap();
    assert_eq!(
        value,
        json!({"network": "Massa Buildnet", "blockHeight": 321, "peers": 12, "version": "DEVN.28.3"})
    );
}

#[tokio::test]
async fn test_network_info_unreachable() {
    let svc = service(ScriptedNode::default());
    let info = svc.get_network_info(&CancelToken::new()).await.unwrap();
    let value = serde_json::to_value(&info).unwrap();
    assert_eq!(value["blockHeight"], "Unknown");
    assert_eq!(value["peers"], 0);
    assert_eq!(value["version"], "1.0.0");
}

#[tokio::test]
async fn test_network_info_cancelled() {
    let svc = service(ScriptedNode::default().with("get_status", json!({"period": 1})));
    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(
        svc.get_network_info(&cancel).await,
        Err(Error::Cancelled)
    ));
}
