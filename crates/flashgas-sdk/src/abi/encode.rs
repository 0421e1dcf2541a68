//! ABI encoding

use flashgas_primitives::{Address, U256};

use super::error::EncodeError;
use super::types::{join_types, parse_signature, ParamType, Token};

/// Encode tokens as a tuple, deriving each parameter type from its token.
///
/// Uint tokens are treated as `uint256`.
pub fn encode(tokens: &[Token]) -> Result<Vec<u8>, EncodeError> {
    let types = tokens.iter().map(type_of).collect::<Result<Vec<_>, _>>()?;
    encode_params(&types, tokens)
}

/// Encode a function call: selector of `signature` followed by the argument tuple.
///
/// `types` must have one entry per value in `tokens` and must equal the
/// parameter list of `signature`.
pub fn encode_call(
    signature: &str,
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, EncodeError> {
    check_arity(types.len(), tokens.len())?;

    let (_, declared) = parse_signature(signature)?;
    if declared != types {
        return Err(EncodeError::SignatureMismatch {
            signature: signature.to_string(),
            types: join_types(types),
        });
    }

    encode_function_call(function_selector(signature), types, tokens)
}

/// Encode function call (selector + params)
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, EncodeError> {
    let params = encode_params(types, tokens)?;
    let mut result = Vec::with_capacity(4 + params.len());
    result.extend_from_slice(&selector);
    result.extend(params);
    Ok(result)
}

/// Encode addresses as a bare head-only tuple, one 32-byte word each.
pub fn pack_addresses(addresses: &[Address]) -> Vec<u8> {
    addresses.iter().flat_map(Address::to_word).collect()
}

/// Encode parameters as a tuple: head words in declared order, then the tail
/// holding dynamic values. Offsets count from the start of the tuple.
pub fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, EncodeError> {
    check_arity(types.len(), tokens.len())?;

    let head_size = types.iter().map(ParamType::head_len).sum::<usize>();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend_from_slice(&u256_to_word(&U256::from(offset)));
            tail.extend(encode_token(param_type, token)?);
        } else {
            head.extend(encode_token(param_type, token)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn check_arity(expected: usize, got: usize) -> Result<(), EncodeError> {
    if expected != got {
        return Err(EncodeError::ArityMismatch { expected, got });
    }
    Ok(())
}

/// Encode a single token
fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, EncodeError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => Ok(addr.to_word().to_vec()),
        (ParamType::Uint(bits), Token::Uint(value)) => {
            check_uint_width(value, *bits)?;
            Ok(u256_to_word(value).to_vec())
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*b);
            Ok(word.to_vec())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size {
                return Err(EncodeError::TypeMismatch {
                    expected: param_type.to_string(),
                    got: format!("bytes{}", data.len()),
                });
            }
            let mut word = [0u8; 32];
            word[..data.len()].copy_from_slice(data);
            Ok(word.to_vec())
        }
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = u256_to_word(&U256::from(tokens.len())).to_vec();
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            let inner_types = vec![(**inner).clone(); *size];
            encode_params(&inner_types, tokens)
        }
        (ParamType::Tuple(types), Token::Tuple(tokens)) => encode_params(types, tokens),
        _ => Err(EncodeError::TypeMismatch {
            expected: param_type.to_string(),
            got: token.kind().to_string(),
        }),
    }
}

fn check_uint_width(value: &U256, bits: usize) -> Result<(), EncodeError> {
    if value.bits() > bits {
        return Err(EncodeError::IntegerOverflow {
            value: value.to_string(),
            bits,
        });
    }
    Ok(())
}

/// Infer the parameter type of a token
fn type_of(token: &Token) -> Result<ParamType, EncodeError> {
    Ok(match token {
        Token::Address(_) => ParamType::Address,
        Token::Uint(_) => ParamType::Uint(256),
        Token::Bool(_) => ParamType::Bool,
        Token::Bytes(_) => ParamType::Bytes,
        Token::FixedBytes(data) => {
            if data.is_empty() || data.len() > 32 {
                return Err(EncodeError::InvalidType(format!("bytes{}", data.len())));
            }
            ParamType::FixedBytes(data.len())
        }
        Token::String(_) => ParamType::String,
        Token::Array(tokens) => {
            // element type comes from the first element; empty arrays encode the same for any type
            let inner = match tokens.first() {
                Some(first) => type_of(first)?,
                None => ParamType::Uint(256),
            };
            ParamType::Array(Box::new(inner))
        }
        Token::FixedArray(tokens) => {
            let first = tokens
                .first()
                .ok_or_else(|| EncodeError::InvalidType("empty fixed array".to_string()))?;
            ParamType::FixedArray(Box::new(type_of(first)?), tokens.len())
        }
        Token::Tuple(tokens) => {
            ParamType::Tuple(tokens.iter().map(type_of).collect::<Result<_, _>>()?)
        }
    })
}

/// Convert U256 to 32-byte big-endian array
pub(crate) fn u256_to_word(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Encode dynamic bytes: length word, then data right-padded to a multiple of 32
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(32) * 32;
    let mut result = Vec::with_capacity(32 + padded_len);
    result.extend_from_slice(&u256_to_word(&U256::from(data.len())));
    result.extend_from_slice(data);
    result.resize(32 + padded_len, 0);
    result
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = flashgas_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
