//! Ethereum account address (20 bytes)

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Address parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; 20] = slice
            .try_into()
            .map_err(|_| AddressError::InvalidLength(slice.len()))?;
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix, any case)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to lower-case hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Left-pad the address into a 32-byte word
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Address {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Address {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Address::from_hex(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert_eq!(addr.as_bytes()[0], 0x70);
        assert_eq!(addr.as_bytes()[19], 0xc8);

        let addr2 = Address::from_hex("70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_zero_address() {
        let zero = Address::ZERO;
        assert_eq!(zero, Address::default());
        assert_eq!(zero.to_hex(), "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_address_display_is_lowercase() {
        let addr = Address::from_hex("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC").unwrap();
        assert_eq!(
            format!("{}", addr),
            "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc"
        );
    }

    #[test]
    fn test_address_case_insensitive() {
        let lower = Address::from_hex("0x46101fbe580940c7dd2d2879662bc98954b5edd1").unwrap();
        let upper = Address::from_hex("0X46101FBE580940C7DD2D2879662BC98954B5EDD1").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_address_from_hex_invalid_chars() {
        let result = Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc7GGG");
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn test_address_from_hex_empty() {
        assert_eq!(Address::from_hex(""), Err(AddressError::InvalidLength(0)));
        assert_eq!(Address::from_hex("0x"), Err(AddressError::InvalidLength(0)));
    }

    #[test]
    fn test_address_length_boundaries() {
        // 19 bytes
        assert_eq!(
            Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79"),
            Err(AddressError::InvalidLength(19))
        );
        // 21 bytes
        assert_eq!(
            Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C800"),
            Err(AddressError::InvalidLength(21))
        );
        // odd number of hex chars
        assert!(Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C").is_err());
    }

    #[test]
    fn test_address_from_slice() {
        assert_eq!(Address::from_slice(&[0u8; 19]), Err(AddressError::InvalidLength(19)));
        let addr = Address::from_slice(&[0xab; 20]).unwrap();
        assert_eq!(addr.as_bytes(), &[0xab; 20]);
    }

    #[test]
    fn test_address_from_str() {
        let addr: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(addr.to_hex(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }

    #[test]
    fn test_address_to_word() {
        let addr = Address::from_bytes([0x11; 20]);
        let word = addr.to_word();
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &[0x11; 20]);
    }

    #[test]
    fn test_address_debug() {
        let addr = Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert_eq!(
            format!("{:?}", addr),
            "Address(0x70997970c51812dc3a010c7d01b50e0d17dc79c8)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_address_serde_roundtrip() {
        let addr = Address::from_hex("0xcBc57F275dB5fd2F4da20882fCa443B9cd302eCD").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xcbc57f275db5fd2f4da20882fca443b9cd302ecd\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
