//! ABI encoding and decoding for Solidity contracts
//!
//! This module provides functionality for:
//! - Computing function selectors
//! - Encoding function calls (selector, static head words, dynamic tail)
//! - Parsing textual arguments into typed tokens
//! - Decoding return values and revert payloads
//!
//! # Example
//!
//! ```rust
//! use flashgas_sdk::abi::{encode_call, decode, pack_addresses, ParamType, Token};
//! use flashgas_sdk::{Address, U256};
//!
//! let route = pack_addresses(&[Address::ZERO, Address::ZERO, Address::ZERO]);
//! assert_eq!(route.len(), 96);
//!
//! let data = encode_call(
//!     "onFlashLoan(address,address,uint256,uint256,bytes)",
//!     &[
//!         ParamType::Address,
//!         ParamType::Address,
//!         ParamType::Uint(256),
//!         ParamType::Uint(256),
//!         ParamType::Bytes,
//!     ],
//!     &[
//!         Token::Address(Address::ZERO),
//!         Token::Address(Address::ZERO),
//!         Token::Uint(U256::from(17720)),
//!         Token::Uint(U256::zero()),
//!         Token::Bytes(route),
//!     ],
//! )?;
//! assert_eq!(&data[..4], &[0x23, 0xe3, 0x0c, 0x8b]);
//!
//! let return_data = [0u8; 32]; // From eth_call
//! let tokens = decode(&[ParamType::FixedBytes(32)], &return_data)?;
//! assert_eq!(tokens, vec![Token::FixedBytes(vec![0u8; 32])]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decode;
mod encode;
mod error;
mod tokenize;
mod types;

pub use decode::{decode, decode_output, decode_revert_reason, ERROR_SELECTOR, PANIC_SELECTOR};
pub use encode::{
    encode, encode_call, encode_function_call, encode_params, function_selector, pack_addresses,
};
pub use error::{DecodeError, EncodeError};
pub use tokenize::{encode_call_from_strs, tokenize, tokenize_address, tokenize_uint};
pub use types::{join_types, parse_signature, parse_type, ParamType, Token};
