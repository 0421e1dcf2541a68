//! ABI type definitions

use std::fmt;

use flashgas_primitives::{Address, U256};

use super::error::EncodeError;

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of an enclosing tuple
    pub fn head_len(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !inner.is_dynamic() => inner.head_len() * size,
            ParamType::Tuple(types) if !self.is_dynamic() => {
                types.iter().map(ParamType::head_len).sum()
            }
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    /// Canonical form used in function signatures
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{size}"),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{inner}[]"),
            ParamType::FixedArray(inner, size) => write!(f, "{inner}[{size}]"),
            ParamType::Tuple(types) => write!(f, "({})", join_types(types)),
        }
    }
}

/// Comma-join types in canonical form
pub fn join_types(types: &[ParamType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Token {
    /// Create a uint256 from a signed value, rejecting negatives
    pub fn uint_from_i128(value: i128) -> Result<Self, EncodeError> {
        let unsigned =
            u128::try_from(value).map_err(|_| EncodeError::NegativeInteger(value.to_string()))?;
        Ok(Token::Uint(U256::from(unsigned)))
    }

    /// Short name of the value kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(addr) => write!(f, "{}", flashgas_crypto::to_checksum(addr)),
            Token::Uint(value) => write!(f, "{value}"),
            Token::Bool(b) => write!(f, "{b}"),
            Token::Bytes(data) | Token::FixedBytes(data) => {
                write!(f, "0x{}", hex::encode(data))
            }
            Token::String(s) => write!(f, "{s:?}"),
            Token::Array(tokens) | Token::FixedArray(tokens) => {
                write!(f, "[{}]", join_tokens(tokens))
            }
            Token::Tuple(tokens) => write!(f, "({})", join_tokens(tokens)),
        }
    }
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a type string (e.g. "uint256", "address[]", "(address,bytes)")
pub fn parse_type(s: &str) -> Result<ParamType, EncodeError> {
    let invalid = || EncodeError::InvalidType(s.to_string());

    if let Some(body) = s.strip_suffix(']') {
        let open = body.rfind('[').ok_or_else(invalid)?;
        let inner = Box::new(parse_type(&body[..open])?);
        let size = &body[open + 1..];
        if size.is_empty() {
            return Ok(ParamType::Array(inner));
        }
        let size: usize = size.parse().map_err(|_| invalid())?;
        if size == 0 {
            return Err(invalid());
        }
        return Ok(ParamType::FixedArray(inner, size));
    }

    if let Some(body) = s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        let types = split_top_level(body)
            .ok_or_else(invalid)?
            .into_iter()
            .map(parse_type)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ParamType::Tuple(types));
    }

    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "uint" => return Ok(ParamType::Uint(256)),
        _ => {}
    }

    // uint<N>
    if let Some(rest) = s.strip_prefix("uint") {
        let bits: usize = rest.parse().map_err(|_| invalid())?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(invalid());
        }
        return Ok(ParamType::Uint(bits));
    }

    // bytes<N>
    if let Some(rest) = s.strip_prefix("bytes") {
        let size: usize = rest.parse().map_err(|_| invalid())?;
        if size == 0 || size > 32 {
            return Err(invalid());
        }
        return Ok(ParamType::FixedBytes(size));
    }

    Err(invalid())
}

/// Parse a canonical function signature into its name and parameter types.
///
/// The signature must already be in canonical form (`transfer(address,uint256)`):
/// no whitespace, no parameter names, no type aliases.
pub fn parse_signature(signature: &str) -> Result<(String, Vec<ParamType>), EncodeError> {
    let invalid = |why: &str| EncodeError::InvalidSignature(format!("{signature}: {why}"));

    let open = signature.find('(').ok_or_else(|| invalid("missing '('"))?;
    let name = &signature[..open];
    if !is_identifier(name) {
        return Err(invalid("invalid function name"));
    }
    let params = signature[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| invalid("missing ')'"))?;

    let types = split_top_level(params)
        .ok_or_else(|| invalid("unbalanced brackets"))?
        .into_iter()
        .map(parse_type)
        .collect::<Result<Vec<_>, _>>()?;

    let canonical = format!("{name}({})", join_types(&types));
    if canonical != signature {
        return Err(invalid(&format!("not canonical, expected {canonical}")));
    }

    Ok((name.to_string(), types))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Split on commas that are not nested inside brackets or parentheses.
///
/// Returns `None` when brackets are unbalanced. An empty input yields no parts.
pub(crate) fn split_top_level(s: &str) -> Option<Vec<&str>> {
    if s.is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}
