//! Keccak-256 hashing

use flashgas_primitives::H256;
use sha3::{Digest, Keccak256};

/// Keccak-256 digest of `data` (the pre-standard padding Ethereum uses, not SHA3-256)
pub fn keccak256(data: impl AsRef<[u8]>) -> H256 {
    H256::from_bytes(Keccak256::digest(data.as_ref()).into())
}
