//! ABI decoding

use flashgas_primitives::{Address, U256};

use super::error::DecodeError;
use super::types::{ParamType, Token};

/// Selector of `Error(string)`
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, DecodeError> {
    decode_tuple(types, data, 0)
}

/// Decode function return data
pub fn decode_output(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, DecodeError> {
    decode(types, data)
}

/// Decode a tuple whose head starts at `base`; dynamic offsets are relative to `base`.
fn decode_tuple(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut head = base;

    for param_type in types {
        if param_type.is_dynamic() {
            let offset = read_usize(data, head)?;
            let start = base
                .checked_add(offset)
                .ok_or_else(|| DecodeError::OffsetOutOfRange(offset.to_string()))?;
            tokens.push(decode_at(param_type, data, start)?);
            head += 32;
        } else {
            tokens.push(decode_at(param_type, data, head)?);
            head += param_type.head_len();
        }
    }

    Ok(tokens)
}

/// Decode a single value whose encoding starts at `pos`
fn decode_at(param_type: &ParamType, data: &[u8], pos: usize) -> Result<Token, DecodeError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(data, pos)?;
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr)))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(read_word(data, pos)?))),
        ParamType::Bool => {
            let word = read_word(data, pos)?;
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(DecodeError::InvalidBool);
            }
            Ok(Token::Bool(word[31] == 1))
        }
        ParamType::FixedBytes(size) => {
            let word = read_word(data, pos)?;
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(read_bytes(data, pos)?.to_vec())),
        ParamType::String => {
            let bytes = read_bytes(data, pos)?.to_vec();
            let s = String::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, pos)?;
            // each element needs at least one head word
            if len.saturating_mul(32) > data.len() {
                return Err(DecodeError::OffsetOutOfRange(format!("array length {len}")));
            }
            let inner_types = vec![(**inner).clone(); len];
            Ok(Token::Array(decode_tuple(&inner_types, data, pos + 32)?))
        }
        ParamType::FixedArray(inner, size) => {
            let inner_types = vec![(**inner).clone(); *size];
            Ok(Token::FixedArray(decode_tuple(&inner_types, data, pos)?))
        }
        ParamType::Tuple(types) => Ok(Token::Tuple(decode_tuple(types, data, pos)?)),
    }
}

/// Decode a revert payload into a human-readable reason.
///
/// Understands `Error(string)` and `Panic(uint256)`; returns `None` for
/// anything else (custom errors, empty data).
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (selector, body) = data.split_at(4);

    if selector == ERROR_SELECTOR {
        return match decode(&[ParamType::String], body).ok()?.pop()? {
            Token::String(reason) => Some(reason),
            _ => None,
        };
    }

    if selector == PANIC_SELECTOR {
        let code = match decode(&[ParamType::Uint(256)], body).ok()?.pop()? {
            Token::Uint(code) => code,
            _ => return None,
        };
        return Some(match panic_description(&code) {
            Some(desc) => format!("panic: {desc} ({code:#x})"),
            None => format!("panic: unknown code ({code:#x})"),
        });
    }

    None
}

fn panic_description(code: &U256) -> Option<&'static str> {
    if code.bits() > 8 {
        return None;
    }
    Some(match code.low_u32() {
        0x00 => "generic compiler panic",
        0x01 => "assertion failed",
        0x11 => "arithmetic underflow or overflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "invalid storage byte array encoding",
        0x31 => "pop on empty array",
        0x32 => "array out-of-bounds access",
        0x41 => "out of memory",
        0x51 => "call to uninitialized function",
        _ => return None,
    })
}

/// Read length-prefixed bytes starting at `pos`
fn read_bytes(data: &[u8], pos: usize) -> Result<&[u8], DecodeError> {
    let len = read_usize(data, pos)?;
    let start = pos + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| DecodeError::OffsetOutOfRange(format!("length {len}")))?;
    check_length(data, end)?;
    Ok(&data[start..end])
}

/// Read a word that must hold an offset or length inside `data`
fn read_usize(data: &[u8], pos: usize) -> Result<usize, DecodeError> {
    let value = U256::from_big_endian(read_word(data, pos)?);
    if value > U256::from(data.len()) {
        return Err(DecodeError::OffsetOutOfRange(value.to_string()));
    }
    Ok(value.as_usize())
}

fn read_word(data: &[u8], pos: usize) -> Result<&[u8], DecodeError> {
    let end = pos
        .checked_add(32)
        .ok_or_else(|| DecodeError::OffsetOutOfRange(pos.to_string()))?;
    check_length(data, end)?;
    Ok(&data[pos..end])
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), DecodeError> {
    if data.len() < required {
        return Err(DecodeError::InsufficientData {
            need: required,
            have: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode;

    #[test]
    fn test_decode_address() {
        let addr = Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        let tokens = decode(&[ParamType::Address], &addr.to_word()).unwrap();
        assert_eq!(tokens, vec![Token::Address(addr)]);
    }

    #[test]
    fn test_decode_uint() {
        let mut encoded = [0u8; 32];
        encoded[31] = 100;

        let tokens = decode(&[ParamType::Uint(256)], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(100))]);
    }

    #[test]
    fn test_decode_bool() {
        let mut word = [0u8; 32];
        word[31] = 1;
        assert_eq!(decode(&[ParamType::Bool], &word).unwrap()[0], Token::Bool(true));

        word[31] = 2;
        assert_eq!(decode(&[ParamType::Bool], &word), Err(DecodeError::InvalidBool));
    }

    #[test]
    fn test_decode_bytes32() {
        let data = [0x42u8; 32];
        let tokens = decode(&[ParamType::FixedBytes(32)], &data).unwrap();
        assert_eq!(tokens[0], Token::FixedBytes(data.to_vec()));
    }

    #[test]
    fn test_decode_dynamic_bytes() {
        let payload = vec![0xab; 40];
        let encoded = encode(&[Token::Uint(U256::from(7)), Token::Bytes(payload.clone())]).unwrap();
        let tokens = decode(&[ParamType::Uint(256), ParamType::Bytes], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(7)), Token::Bytes(payload)]);
    }

    #[test]
    fn test_decode_nested_dynamic_tuple() {
        let tokens = vec![Token::Tuple(vec![
            Token::String("flash".to_string()),
            Token::Array(vec![Token::Bytes(vec![1]), Token::Bytes(vec![2, 3])]),
        ])];
        let types = vec![ParamType::Tuple(vec![
            ParamType::String,
            ParamType::Array(Box::new(ParamType::Bytes)),
        ])];
        let encoded = crate::abi::encode_params(&types, &tokens).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), tokens);
    }

    #[test]
    fn test_decode_insufficient_data() {
        let err = decode(&[ParamType::Uint(256)], &[0u8; 31]);
        assert_eq!(err, Err(DecodeError::InsufficientData { need: 32, have: 31 }));
    }

    #[test]
    fn test_decode_offset_out_of_range() {
        let mut data = [0u8; 64];
        data[31] = 0xff;
        assert!(matches!(
            decode(&[ParamType::Bytes], &data),
            Err(DecodeError::OffsetOutOfRange(_))
        ));
    }

    #[test]
    fn test_decode_huge_array_length() {
        let mut data = vec![0u8; 64];
        data[31] = 32;
        data[32..64].copy_from_slice(&[0xff; 32]);
        assert!(decode(&[ParamType::Array(Box::new(ParamType::Address))], &data).is_err());
    }

    #[test]
    fn test_decode_revert_error_string() {
        let mut data = ERROR_SELECTOR.to_vec();
        data.extend(encode(&[Token::String("not owner".to_string())]).unwrap());
        assert_eq!(decode_revert_reason(&data).as_deref(), Some("not owner"));
    }

    #[test]
    fn test_decode_revert_panic() {
        let mut data = PANIC_SELECTOR.to_vec();
        data.extend(encode(&[Token::Uint(U256::from(0x11))]).unwrap());
        assert_eq!(
            decode_revert_reason(&data).as_deref(),
            Some("panic: arithmetic underflow or overflow (0x11)")
        );
    }

    #[test]
    fn test_decode_revert_unknown() {
        assert_eq!(decode_revert_reason(&[]), None);
        assert_eq!(decode_revert_reason(&[0xde, 0xad, 0xbe, 0xef]), None);
        // truncated Error(string)
        assert_eq!(decode_revert_reason(&ERROR_SELECTOR), None);
    }
}
