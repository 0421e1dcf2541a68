//! Contract interaction helpers

use bytes::Bytes;
use flashgas_primitives::Address;
use serde::Deserialize;

use crate::abi::{
    decode, encode_function_call, function_selector, join_types, parse_type, EncodeError,
    ParamType, Token,
};
use crate::SdkError;

/// Contract helper for encoding/decoding function calls
#[derive(Debug, Clone)]
pub struct Contract {
    /// Contract address
    address: Address,
    /// Function definitions
    functions: Vec<FunctionDef>,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Function selector (4 bytes)
    pub selector: [u8; 4],
    /// Input parameter types
    pub inputs: Vec<ParamType>,
    /// Output parameter types
    pub outputs: Vec<ParamType>,
}

impl FunctionDef {
    /// Create a function definition; the signature is derived from `name` and `inputs`
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        let name = name.into();
        let signature = format!("{name}({})", join_types(&inputs));
        let selector = function_selector(&signature);
        Self {
            name,
            signature,
            selector,
            inputs,
            outputs,
        }
    }
}

impl Contract {
    /// Create a new contract helper
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: Vec::new(),
        }
    }

    /// Build a contract helper from a Solidity JSON ABI.
    ///
    /// Every `"type": "function"` entry is registered; constructors, events
    /// and errors are skipped.
    pub fn from_json_abi(address: Address, json: &str) -> Result<Self, SdkError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)?;

        let mut contract = Self::new(address);
        for entry in entries.into_iter().filter(|e| e.kind == "function") {
            let inputs = entry
                .inputs
                .iter()
                .map(AbiParam::param_type)
                .collect::<Result<Vec<_>, _>>()?;
            let outputs = entry
                .outputs
                .iter()
                .map(AbiParam::param_type)
                .collect::<Result<Vec<_>, _>>()?;
            contract.add_function(FunctionDef::new(entry.name, inputs, outputs));
        }
        Ok(contract)
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add a function definition
    pub fn add_function(&mut self, function: FunctionDef) {
        self.functions.push(function);
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Encode a function call
    pub fn encode_call(&self, function_name: &str, args: &[Token]) -> Result<Bytes, SdkError> {
        let function = self.lookup(function_name)?;

        if args.len() != function.inputs.len() {
            return Err(EncodeError::ArityMismatch {
                expected: function.inputs.len(),
                got: args.len(),
            }
            .into());
        }

        let data = encode_function_call(function.selector, &function.inputs, args)?;
        Ok(Bytes::from(data))
    }

    /// Decode function output
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        let function = self.lookup(function_name)?;
        Ok(decode(&function.outputs, data)?)
    }

    fn lookup(&self, function_name: &str) -> Result<&FunctionDef, SdkError> {
        self.function(function_name)
            .ok_or_else(|| SdkError::UnknownFunction(function_name.to_string()))
    }
}

#[derive(Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
}

#[derive(Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<AbiParam>,
}

impl AbiParam {
    /// Canonical type string, expanding `tuple` into its components
    fn canonical(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let inner = self
                    .components
                    .iter()
                    .map(AbiParam::canonical)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("({inner}){suffix}")
            }
            None => self.ty.clone(),
        }
    }

    fn param_type(&self) -> Result<ParamType, EncodeError> {
        parse_type(&self.canonical())
    }
}
