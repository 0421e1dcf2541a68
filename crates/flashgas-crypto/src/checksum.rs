//! EIP-55 mixed-case address checksums

use flashgas_primitives::Address;

use crate::keccak256;

/// Render an address with EIP-55 checksum casing.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let hash = hash.as_bytes();

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Check the casing of a hex address string against EIP-55.
///
/// All-lowercase and all-uppercase inputs carry no checksum and are accepted.
/// Returns `false` for strings that are not a 20-byte hex address.
pub fn is_valid_checksum(s: &str) -> bool {
    let Ok(address) = Address::from_hex(s) else {
        return false;
    };
    let body = s.trim();
    let body = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
        .unwrap_or(body);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    to_checksum(&address)[2..] == *body
}
