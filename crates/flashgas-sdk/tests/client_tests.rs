//! Client integration tests for flashgas-sdk
//!
//! Runs the RPC wrappers against `MockTransport`.

use flashgas_sdk::abi::{encode, Token, ERROR_SELECTOR, PANIC_SELECTOR};
use flashgas_sdk::types::{BlockId, CallRequest};
use flashgas_sdk::{gas_cost, Address, FlashClient, FlashLoanCall, MockTransport, SdkError, U256};
use serde_json::{json, Value};

fn flash_request() -> CallRequest {
    let contract = Address::from_hex("0xcBc57F275dB5fd2F4da20882fCa443B9cd302eCD").unwrap();
    let call = FlashLoanCall::with_route(
        Address::ZERO,
        contract,
        U256::from(17720),
        U256::zero(),
        [Address::ZERO; 3],
    );
    CallRequest {
        from: Some(Address::from_bytes([0x11; 20])),
        to: Some(contract),
        gas_price: Some(U256::from(1_000_000_000u64)),
        value: Some(U256::zero()),
        data: Some(call.encode().unwrap()),
        ..Default::default()
    }
}

// ==================== Client Creation Tests ====================

#[tokio::test]
async fn test_client_with_custom_chain_id() {
    let transport = MockTransport::new();
    transport.set_response("eth_chainId", Value::String("0x7a69".to_string()));
    let client = FlashClient::with_transport(transport);

    assert_eq!(client.chain_id().await.unwrap(), 31337);
}

#[tokio::test]
async fn test_connect_with_caches_chain_id() {
    let transport = MockTransport::new();
    let observer = transport.handle();
    let client = FlashClient::connect_with(transport).await.unwrap();

    assert_eq!(client.chain_id().await.unwrap(), 1);
    assert_eq!(client.chain_id().await.unwrap(), 1);
    let chain_id_calls = observer
        .requests()
        .iter()
        .filter(|(method, _)| method == "eth_chainId")
        .count();
    assert_eq!(chain_id_calls, 1);
}

#[tokio::test]
async fn test_connect_with_unreachable_node() {
    let transport = MockTransport::new();
    transport.set_error("eth_chainId", -32000, "connection refused", None);
    assert!(FlashClient::connect_with(transport).await.is_err());
}

// ==================== Gas Tests ====================

#[tokio::test]
async fn test_gas_price_large_value() {
    let transport = MockTransport::new();
    // 2^128 wei
    transport.set_response(
        "eth_gasPrice",
        Value::String("0x100000000000000000000000000000000".to_string()),
    );
    let client = FlashClient::with_transport(transport);

    let price = client.gas_price().await.unwrap();
    assert_eq!(price, U256::from(u128::MAX) + U256::one());
}

#[tokio::test]
async fn test_estimate_gas_sends_call_request() {
    let transport = MockTransport::new();
    let observer = transport.handle();
    transport.set_response("eth_estimateGas", Value::String("0x1d4c0".to_string()));
    let client = FlashClient::with_transport(transport);

    let request = flash_request();
    let gas = client.estimate_gas(&request).await.unwrap();
    assert_eq!(gas, 120_000);

    let requests = observer.requests();
    let (method, params) = requests.last().unwrap();
    assert_eq!(method, "eth_estimateGas");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["to"], "0xcbc57f275db5fd2f4da20882fca443b9cd302ecd");
    assert_eq!(params[0]["gasPrice"], "0x3b9aca00");
    assert_eq!(params[0]["value"], "0x0");
    assert!(params[0]["data"].as_str().unwrap().starts_with("0x23e30c8b"));
}

#[tokio::test]
async fn test_estimate_gas_reverted() {
    let transport = MockTransport::new();
    let mut payload = ERROR_SELECTOR.to_vec();
    payload.extend(encode(&[Token::String("not owner".to_string())]).unwrap());
    transport.set_error(
        "eth_estimateGas",
        3,
        "execution reverted: not owner",
        Some(Value::String(format!("0x{}", hex::encode(&payload)))),
    );
    let client = FlashClient::with_transport(transport);

    let err = client.estimate_gas(&flash_request()).await.unwrap_err();
    assert_eq!(err.to_string(), "execution reverted: not owner");
}

#[tokio::test]
async fn test_estimate_gas_bare_revert() {
    let transport = MockTransport::new();
    transport.set_error("eth_estimateGas", -32000, "execution reverted", None);
    let client = FlashClient::with_transport(transport);

    let err = client.estimate_gas(&flash_request()).await.unwrap_err();
    assert!(matches!(err, SdkError::ExecutionReverted { reason: None, .. }));
}

#[tokio::test]
async fn test_price_from_rpc_values() {
    let client = FlashClient::with_transport(MockTransport::new());
    let gas_price = client.gas_price().await.unwrap();
    let gas_limit = client.estimate_gas(&flash_request()).await.unwrap();
    assert_eq!(
        gas_cost(gas_price, gas_limit).unwrap(),
        U256::from(21_000u64 * 1_000_000_000)
    );
}

// ==================== Call Tests ====================

#[tokio::test]
async fn test_call_at_block_number() {
    let transport = MockTransport::new();
    let observer = transport.handle();
    transport.set_response(
        "eth_call",
        Value::String(format!("0x{}", "00".repeat(31) + "01")),
    );
    let client = FlashClient::with_transport(transport);

    let block = client.block_number().await.unwrap();
    let result = client
        .call(&flash_request(), BlockId::Number(block))
        .await
        .unwrap();
    assert_eq!(result.len(), 32);
    assert_eq!(result[31], 1);

    let requests = observer.requests();
    let (method, params) = requests.last().unwrap();
    assert_eq!(method, "eth_call");
    assert_eq!(params[1], json!("0x100"));
}

#[tokio::test]
async fn test_call_panic_revert() {
    let transport = MockTransport::new();
    let mut payload = PANIC_SELECTOR.to_vec();
    payload.extend(encode(&[Token::Uint(U256::from(0x11))]).unwrap());
    transport.set_error(
        "eth_call",
        3,
        "execution reverted",
        Some(json!({ "data": format!("0x{}", hex::encode(&payload)) })),
    );
    let client = FlashClient::with_transport(transport);

    let err = client.call(&flash_request(), BlockId::Latest).await.unwrap_err();
    match err {
        SdkError::ExecutionReverted { reason, data } => {
            assert_eq!(
                reason.as_deref(),
                Some("panic: arithmetic underflow or overflow (0x11)")
            );
            assert_eq!(data.len(), 36);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rpc_error_passthrough() {
    let transport = MockTransport::new();
    transport.set_error("eth_call", -32602, "invalid argument 0", None);
    let client = FlashClient::with_transport(transport);

    let err = client.call(&CallRequest::default(), BlockId::Latest).await.unwrap_err();
    assert!(matches!(err, SdkError::Rpc { code: -32602, .. }));
}

#[tokio::test]
async fn test_malformed_result() {
    let transport = MockTransport::new();
    transport.set_response("eth_estimateGas", json!(42));
    let client = FlashClient::with_transport(transport);

    let err = client.estimate_gas(&CallRequest::default()).await.unwrap_err();
    assert!(matches!(err, SdkError::Serialization(_)));
}
