//! Request types for `eth_call` and `eth_estimateGas`

use std::fmt;

use bytes::Bytes;
use flashgas_primitives::{Address, U256};
use serde::{Serialize, Serializer};

/// Block a call executes against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Number(n) => write!(f, "{n:#x}"),
            BlockId::Latest => f.write_str("latest"),
            BlockId::Pending => f.write_str("pending"),
            BlockId::Earliest => f.write_str("earliest"),
        }
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Message of a simulated transaction; unset fields are omitted on the wire.
///
/// Quantities go out as minimal `0x` hex, addresses and data as `0x` hex.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Sender address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Recipient address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "quantity")]
    pub gas: Option<u64>,
    /// Gas price in wei
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Value to transfer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Input data
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "hex_data")]
    pub data: Option<Bytes>,
}

fn quantity<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(&format_args!("{v:#x}")),
        None => serializer.serialize_none(),
    }
}

fn hex_data<S: Serializer>(data: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
    match data {
        Some(d) => serializer.collect_str(&format_args!("0x{}", hex::encode(d))),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_serialize() {
        assert_eq!(serde_json::to_string(&BlockId::Latest).unwrap(), "\"latest\"");
        assert_eq!(serde_json::to_string(&BlockId::Number(100)).unwrap(), "\"0x64\"");
        assert_eq!(serde_json::to_string(&BlockId::Number(0)).unwrap(), "\"0x0\"");
        assert_eq!(serde_json::to_string(&BlockId::Earliest).unwrap(), "\"earliest\"");
    }

    #[test]
    fn test_call_request_skips_none() {
        let req = CallRequest {
            to: Some(Address::ZERO),
            data: Some(Bytes::from(vec![0x01, 0x02])),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["data"], "0x0102");
        assert!(json.get("from").is_none());
        assert!(json.get("gasPrice").is_none());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_call_request_quantities_are_minimal_hex() {
        let req = CallRequest {
            gas_price: Some(U256::from(1_000_000_000u64)),
            value: Some(U256::zero()),
            gas: Some(21000),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gasPrice"], "0x3b9aca00");
        assert_eq!(json["value"], "0x0");
        assert_eq!(json["gas"], "0x5208");
    }
}
