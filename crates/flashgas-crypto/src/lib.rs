//! # flashgas-crypto
//!
//! Hashing helpers for flashgas.
//!
//! - Keccak-256 hashing
//! - EIP-55 checksummed address rendering

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod hash;

pub use checksum::{is_valid_checksum, to_checksum};
pub use hash::keccak256;
