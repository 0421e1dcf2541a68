//! CLI error types

use flashgas_sdk::abi::EncodeError;
use flashgas_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Required setting absent (e.g. the Infura key for mainnet)
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Invalid address format or checksum
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Call data could not be built
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Node unreachable, RPC failure or reverted execution
    #[error("{0}")]
    Sdk(#[from] SdkError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
