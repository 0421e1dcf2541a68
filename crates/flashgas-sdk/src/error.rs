//! SDK error types

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::abi::{DecodeError, EncodeError};

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Node unreachable or response unreadable
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
        /// Optional error payload
        data: Option<Value>,
    },

    /// Call reverted during execution
    #[error("execution reverted{}", format_reason(.reason))]
    ExecutionReverted {
        /// Decoded revert reason, if any
        reason: Option<String>,
        /// Raw revert payload
        data: Bytes,
    },

    /// ABI encoding error
    #[error("ABI encoding error: {0}")]
    AbiEncode(#[from] EncodeError),

    /// ABI decoding error
    #[error("ABI decoding error: {0}")]
    AbiDecode(#[from] DecodeError),

    /// Function not present in the contract description
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Arithmetic result does not fit in 256 bits
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),
}

fn format_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => String::new(),
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_reverted_display() {
        let err = SdkError::ExecutionReverted {
            reason: Some("not owner".to_string()),
            data: Bytes::new(),
        };
        assert_eq!(err.to_string(), "execution reverted: not owner");

        let err = SdkError::ExecutionReverted {
            reason: None,
            data: Bytes::new(),
        };
        assert_eq!(err.to_string(), "execution reverted");
    }

    #[test]
    fn test_encode_error_conversion() {
        let err: SdkError = EncodeError::ArityMismatch { expected: 5, got: 4 }.into();
        assert!(matches!(
            err,
            SdkError::AbiEncode(EncodeError::ArityMismatch { expected: 5, got: 4 })
        ));
    }
}
