//! FlashClient - JSON-RPC client

use bytes::Bytes;
use flashgas_primitives::{Gas, U256};
use serde_json::Value;

use crate::abi::decode_revert_reason;
use crate::transport::{deserialize_response, Transport};
use crate::types::{BlockId, CallRequest};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// JSON-RPC error code nodes use for reverted execution
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Ethereum node client. Requests are issued one at a time and never retried.
pub struct FlashClient {
    transport: Box<dyn Transport>,
    chain_id: Option<u64>,
}

impl FlashClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        Self::connect_with(HttpTransport::new(url)).await
    }

    /// Create a client over `transport` and verify the node answers
    pub async fn connect_with(transport: impl Transport + 'static) -> Result<Self, SdkError> {
        let mut client = Self::with_transport(transport);

        // Fetch and cache chain ID
        let chain_id = client.fetch_chain_id().await?;
        client.chain_id = Some(chain_id);

        Ok(client)
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            chain_id: None,
        }
    }

    /// Helper method to make RPC request and deserialize
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        tracing::debug!(method, "rpc request");
        let value = self.transport.request_json(method, params).await.map_err(|e| {
            tracing::debug!(method, error = %e, "rpc request failed");
            e
        })?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Get the chain ID
    pub async fn chain_id(&self) -> Result<u64, SdkError> {
        if let Some(id) = self.chain_id {
            return Ok(id);
        }
        self.fetch_chain_id().await
    }

    async fn fetch_chain_id(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_chainId", vec![]).await?;
        parse_hex_u64(&result)
    }

    /// Get the node's suggested gas price in wei
    pub async fn gas_price(&self) -> Result<U256, SdkError> {
        let result: String = self.request("eth_gasPrice", vec![]).await?;
        parse_hex_u256(&result)
    }

    /// Get the current block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_blockNumber", vec![]).await?;
        parse_hex_u64(&result)
    }

    // ==================== Call & Estimation ====================

    /// Execute a call (read-only, does not create transaction)
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_call",
                vec![serde_json::to_value(request)?, serde_json::to_value(block)?],
            )
            .await
            .map_err(classify_revert)?;
        parse_hex_bytes(&result)
    }

    /// Estimate gas for a transaction
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<Gas, SdkError> {
        let result: String = self
            .request("eth_estimateGas", vec![serde_json::to_value(request)?])
            .await
            .map_err(classify_revert)?;
        parse_hex_u64(&result)
    }
}

// ==================== Helper Functions ====================

/// Cost of `gas_limit` units at `gas_price` wei each
pub fn gas_cost(gas_price: U256, gas_limit: Gas) -> Result<U256, SdkError> {
    gas_price
        .checked_mul(U256::from(gas_limit))
        .ok_or_else(|| SdkError::ArithmeticOverflow(format!("{gas_price} * {gas_limit}")))
}

/// Turn a node's revert error into [`SdkError::ExecutionReverted`]
fn classify_revert(err: SdkError) -> SdkError {
    let SdkError::Rpc {
        code,
        message,
        data,
    } = err
    else {
        return err;
    };

    let reverted = code == EXECUTION_REVERTED_CODE
        || message.to_ascii_lowercase().contains("execution reverted");
    if !reverted {
        return SdkError::Rpc {
            code,
            message,
            data,
        };
    }

    let payload = revert_payload(data.as_ref());
    let reason = decode_revert_reason(&payload).or_else(|| {
        message
            .split_once("execution reverted: ")
            .map(|(_, reason)| reason.to_string())
            .filter(|reason| !reason.is_empty())
    });

    SdkError::ExecutionReverted {
        reason,
        data: payload,
    }
}

/// Extract revert bytes from an error `data` field.
///
/// Nodes put the payload either directly as a hex string or under `data.data`.
fn revert_payload(data: Option<&Value>) -> Bytes {
    let hex = match data {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(map)) => map.get("data").and_then(Value::as_str),
        _ => None,
    };
    hex.and_then(|s| parse_hex_bytes(s).ok()).unwrap_or_default()
}

/// Parse hex string to u64
fn parse_hex_u64(s: &str) -> Result<u64, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| SdkError::InvalidHex(e.to_string()))
}

/// Parse hex quantity to U256
fn parse_hex_u256(s: &str) -> Result<U256, SdkError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > 64 {
        return Err(SdkError::InvalidHex(format!("bad quantity: {s}")));
    }
    let bytes = hex::decode(format!("{digits:0>64}"))?;
    Ok(U256::from_big_endian(&bytes))
}

/// Parse hex string to bytes
fn parse_hex_bytes(s: &str) -> Result<Bytes, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    Ok(Bytes::from(bytes))
}
