//! Transport layer for RPC communication

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Results returned by a fresh [`MockTransport`]
const MOCK_DEFAULTS: &[(&str, &str)] = &[
    ("eth_chainId", "0x1"),
    ("eth_gasPrice", "0x3b9aca00"), // 1 gwei
    ("eth_blockNumber", "0x100"),
    ("eth_estimateGas", "0x5208"), // 21000
    ("eth_call", "0x"),
];

/// Error reply injected into a [`MockTransport`]
#[derive(Debug, Clone)]
struct RpcFailure {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl From<RpcFailure> for SdkError {
    fn from(f: RpcFailure) -> Self {
        SdkError::Rpc {
            code: f.code,
            message: f.message,
            data: f.data,
        }
    }
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, Result<Value, RpcFailure>>,
    log: Vec<(String, Vec<Value>)>,
}

/// In-memory transport answering from canned replies.
///
/// Clones made with [`MockTransport::handle`] share replies and the request log.
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a mock that answers the chain, gas and call methods
    pub fn new() -> Self {
        let replies = MOCK_DEFAULTS
            .iter()
            .map(|(method, result)| (method.to_string(), Ok(Value::from(*result))))
            .collect();
        Self {
            state: Arc::new(Mutex::new(MockState {
                replies,
                log: Vec::new(),
            })),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, MockState>, SdkError> {
        self.state
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))
    }

    /// Answer `method` with `response`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: Value) {
        self.state
            .lock()
            .expect("MockTransport mutex poisoned")
            .replies
            .insert(method.to_string(), Ok(response));
    }

    /// Make `method` fail with the given RPC error
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_error(&self, method: &str, code: i64, message: &str, data: Option<Value>) {
        let failure = RpcFailure {
            code,
            message: message.to_string(),
            data,
        };
        self.state
            .lock()
            .expect("MockTransport mutex poisoned")
            .replies
            .insert(method.to_string(), Err(failure));
    }

    /// Requests seen so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<(String, Vec<Value>)> {
        self.state
            .lock()
            .expect("MockTransport mutex poisoned")
            .log
            .clone()
    }

    /// Second handle onto the same replies and request log
    pub fn handle(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let mut state = self.state()?;
        state.log.push((method.to_string(), params));

        match state.replies.get(method) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(failure)) => Err(failure.clone().into()),
            None => Err(SdkError::Rpc {
                code: -32601,
                message: format!("Method not found: {}", method),
                data: None,
            }),
        }
    }
}

/// JSON-RPC 2.0 over HTTP POST
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create an HTTP transport whose requests fail after `timeout`
    pub fn with_timeout(url: &str, timeout: std::time::Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            next_id: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self
                .next_id
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            method,
            params,
        };

        let reply: JsonRpcReply = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        match (reply.result, reply.error) {
            (_, Some(error)) => Err(error.into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(SdkError::Rpc {
                code: -32603,
                message: "No result in response".to_string(),
                data: None,
            }),
        }
    }
}

#[cfg(feature = "http")]
#[derive(serde::Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFailureBody>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct RpcFailureBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[cfg(feature = "http")]
impl From<RpcFailureBody> for SdkError {
    fn from(body: RpcFailureBody) -> Self {
        SdkError::Rpc {
            code: body.code,
            message: body.message,
            data: body.data,
        }
    }
}
