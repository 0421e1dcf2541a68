//! # flashgas-sdk
//!
//! ABI encoding and JSON-RPC access for estimating flash-loan callback gas.
//!
//! ## Features
//!
//! - **ABI**: Solidity ABI encoding and decoding, selectors, revert reasons
//! - **Contract**: Function tables built by hand or from a JSON ABI
//! - **FlashLoanCall**: `onFlashLoan` payload construction
//! - **FlashClient**: RPC client for gas price, gas estimation and `eth_call`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flashgas_sdk::{gas_cost, Address, FlashClient, FlashLoanCall, U256};
//! use flashgas_sdk::types::CallRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FlashClient::connect("http://127.0.0.1:8545").await?;
//!
//!     let receiver = Address::from_hex("0xcBc57F275dB5fd2F4da20882fCa443B9cd302eCD")?;
//!     let call = FlashLoanCall::with_route(
//!         Address::from_hex("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?,
//!         receiver,
//!         U256::from(17720),
//!         U256::zero(),
//!         [Address::ZERO; 3],
//!     );
//!
//!     let gas_price = client.gas_price().await?;
//!     let request = CallRequest {
//!         to: Some(receiver),
//!         gas_price: Some(gas_price),
//!         value: Some(U256::zero()),
//!         data: Some(call.encode()?),
//!         ..Default::default()
//!     };
//!     let gas_limit = client.estimate_gas(&request).await?;
//!     println!("price {}", gas_cost(gas_price, gas_limit)?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
pub mod contract;
mod error;
mod flash_loan;
mod transport;
pub mod types;

// Re-export main types
pub use client::{gas_cost, FlashClient};
pub use error::SdkError;
pub use flash_loan::{
    decode_callback_return, flash_loan_receiver, FlashLoanCall, FLASH_LOAN_RECEIVER_ABI, ON_FLASH_LOAN_SIGNATURE,
};
pub use transport::MockTransport;

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use flashgas_primitives::{Address, Gas, H256, U256};
