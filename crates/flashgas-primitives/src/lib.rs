//! # flashgas-primitives
//!
//! Primitive types shared by the flashgas crates.
//!
//! This crate provides the fixed-size byte types used on the wire and
//! re-exports `U256` from `primitive-types` for 256-bit quantities.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Gas type
pub type Gas = u64;
