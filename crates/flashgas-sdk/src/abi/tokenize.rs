//! Parsing of textual argument values into tokens

use flashgas_primitives::{Address, U256};

use super::encode::encode_call;
use super::error::EncodeError;
use super::types::{parse_signature, split_top_level, ParamType, Token};

/// Parse a textual value for the given parameter type.
///
/// - addresses: `0x`-prefixed hex, any case; mixed case must carry a valid EIP-55 checksum
/// - integers: decimal or `0x` hex
/// - bytes: `0x` hex
/// - arrays: `[a,b,c]`, tuples: `(a,b)`
pub fn tokenize(param_type: &ParamType, value: &str) -> Result<Token, EncodeError> {
    let value = value.trim();
    let invalid = || EncodeError::InvalidValue {
        ty: param_type.to_string(),
        value: value.to_string(),
    };

    match param_type {
        ParamType::Address => tokenize_address(value).map(Token::Address),
        ParamType::Uint(bits) => tokenize_uint(value, *bits).map(Token::Uint),
        ParamType::Bool => match value {
            "true" => Ok(Token::Bool(true)),
            "false" => Ok(Token::Bool(false)),
            _ => Err(invalid()),
        },
        ParamType::Bytes => decode_hex(value).map(Token::Bytes).ok_or_else(invalid),
        ParamType::FixedBytes(size) => {
            let mut bytes = decode_hex(value).ok_or_else(invalid)?;
            if bytes.len() > *size {
                return Err(invalid());
            }
            bytes.resize(*size, 0);
            Ok(Token::FixedBytes(bytes))
        }
        ParamType::String => Ok(Token::String(value.to_string())),
        ParamType::Array(inner) => {
            let items = split_delimited(value, '[', ']').ok_or_else(invalid)?;
            let tokens = items
                .into_iter()
                .map(|item| tokenize(inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Array(tokens))
        }
        ParamType::FixedArray(inner, size) => {
            let items = split_delimited(value, '[', ']').ok_or_else(invalid)?;
            if items.len() != *size {
                return Err(EncodeError::ArityMismatch {
                    expected: *size,
                    got: items.len(),
                });
            }
            let tokens = items
                .into_iter()
                .map(|item| tokenize(inner, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::FixedArray(tokens))
        }
        ParamType::Tuple(types) => {
            let items = split_delimited(value, '(', ')').ok_or_else(invalid)?;
            if items.len() != types.len() {
                return Err(EncodeError::ArityMismatch {
                    expected: types.len(),
                    got: items.len(),
                });
            }
            let tokens = types
                .iter()
                .zip(items)
                .map(|(ty, item)| tokenize(ty, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Tuple(tokens))
        }
    }
}

/// Parse every value against the signature's parameter list and encode the call.
pub fn encode_call_from_strs(signature: &str, values: &[&str]) -> Result<Vec<u8>, EncodeError> {
    let (_, types) = parse_signature(signature)?;
    if types.len() != values.len() {
        return Err(EncodeError::ArityMismatch {
            expected: types.len(),
            got: values.len(),
        });
    }

    let tokens = types
        .iter()
        .zip(values)
        .map(|(ty, value)| tokenize(ty, value))
        .collect::<Result<Vec<_>, _>>()?;

    encode_call(signature, &types, &tokens)
}

/// Parse a hex address, rejecting malformed input and bad checksums.
pub fn tokenize_address(value: &str) -> Result<Address, EncodeError> {
    let address =
        Address::from_hex(value).map_err(|e| EncodeError::InvalidAddress(format!("{value}: {e}")))?;
    if !flashgas_crypto::is_valid_checksum(value) {
        return Err(EncodeError::InvalidAddress(format!("{value}: bad checksum")));
    }
    Ok(address)
}

/// Parse a non-negative integer that must fit in `bits` bits.
pub fn tokenize_uint(value: &str, bits: usize) -> Result<U256, EncodeError> {
    if value.starts_with('-') {
        return Err(EncodeError::NegativeInteger(value.to_string()));
    }
    let overflow = || EncodeError::IntegerOverflow {
        value: value.to_string(),
        bits,
    };
    let invalid = || EncodeError::InvalidValue {
        ty: format!("uint{bits}"),
        value: value.to_string(),
    };

    let parsed = match value.strip_prefix("0x") {
        Some("") => return Err(invalid()),
        Some(digits) => {
            let digits = digits.trim_start_matches('0');
            if digits.len() > 64 {
                return Err(overflow());
            }
            let padded = format!("{digits:0>64}");
            let bytes = hex::decode(padded).map_err(|_| invalid())?;
            U256::from_big_endian(&bytes)
        }
        None => {
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            U256::from_dec_str(value).map_err(|_| overflow())?
        }
    };

    if parsed.bits() > bits {
        return Err(overflow());
    }
    Ok(parsed)
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value)).ok()
}

fn split_delimited(value: &str, open: char, close: char) -> Option<Vec<&str>> {
    let body = value.strip_prefix(open)?.strip_suffix(close)?.trim();
    let parts = split_top_level(body)?;
    Some(parts.into_iter().map(str::trim).collect())
}
