//! ABI error types

use thiserror::Error;

/// Failure while building an ABI payload. No partial payload is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Parameter and value counts disagree
    #[error("arity mismatch: expected {expected} values, got {got}")]
    ArityMismatch {
        /// Number of declared parameters
        expected: usize,
        /// Number of supplied values
        got: usize,
    },

    /// Value is not a 20-byte address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Negative value supplied for an unsigned integer
    #[error("negative value for unsigned integer: {0}")]
    NegativeInteger(String),

    /// Value does not fit the declared integer width
    #[error("integer overflow: {value} does not fit in uint{bits}")]
    IntegerOverflow {
        /// Rendered value
        value: String,
        /// Declared bit width
        bits: usize,
    },

    /// Value kind does not match the declared parameter type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Supplied value kind
        got: String,
    },

    /// Value could not be parsed for the declared type
    #[error("invalid {ty} value: {value}")]
    InvalidValue {
        /// Declared type
        ty: String,
        /// Offending input
        value: String,
    },

    /// Unknown or malformed type name
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Malformed or non-canonical function signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Declared parameter types differ from the signature's
    #[error("signature {signature} does not match parameter types ({types})")]
    SignatureMismatch {
        /// Function signature
        signature: String,
        /// Rendered parameter types
        types: String,
    },
}

/// Failure while reading an ABI payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer ends before the value does
    #[error("insufficient data: need {need} bytes, have {have}")]
    InsufficientData {
        /// Bytes required
        need: usize,
        /// Bytes available
        have: usize,
    },

    /// Offset or length word points outside the buffer
    #[error("offset out of range: {0}")]
    OffsetOutOfRange(String),

    /// Bool word is neither 0 nor 1
    #[error("invalid bool encoding")]
    InvalidBool,

    /// String payload is not UTF-8
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(String),
}
