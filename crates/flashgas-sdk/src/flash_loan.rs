//! Flash-loan receiver interface and `onFlashLoan` call building

use bytes::Bytes;
use flashgas_primitives::{Address, H256, U256};

use crate::abi::{encode_call, pack_addresses, EncodeError, ParamType, Token};
use crate::contract::Contract;
use crate::SdkError;

/// Canonical signature of the receiver callback
pub const ON_FLASH_LOAN_SIGNATURE: &str = "onFlashLoan(address,address,uint256,uint256,bytes)";

/// JSON ABI of the deployed flash-loan receiver
pub const FLASH_LOAN_RECEIVER_ABI: &str = r#"[{"inputs":[{"internalType":"address","name":"_owner","type":"address"}],"stateMutability":"nonpayable","type":"constructor"},{"inputs":[{"internalType":"address","name":"initiator","type":"address"},{"internalType":"address","name":"baseTokenAddress","type":"address"},{"internalType":"uint256","name":"amount","type":"uint256"},{"internalType":"uint256","name":"fee","type":"uint256"},{"internalType":"bytes","name":"data","type":"bytes"}],"name":"onFlashLoan","outputs":[{"internalType":"bytes32","name":"","type":"bytes32"}],"stateMutability":"nonpayable","type":"function"},{"inputs":[],"name":"owner","outputs":[{"internalType":"address","name":"","type":"address"}],"stateMutability":"view","type":"function"},{"inputs":[{"internalType":"address","name":"newOwner","type":"address"}],"name":"updateOwner","outputs":[],"stateMutability":"nonpayable","type":"function"}]"#;

/// Receiver contract helper at `address`, built from [`FLASH_LOAN_RECEIVER_ABI`]
pub fn flash_loan_receiver(address: Address) -> Result<Contract, SdkError> {
    Contract::from_json_abi(address, FLASH_LOAN_RECEIVER_ABI)
}

/// Decode the `bytes32` returned by `onFlashLoan` on `receiver`
pub fn decode_callback_return(receiver: &Contract, data: &[u8]) -> Result<H256, SdkError> {
    match receiver.decode_output("onFlashLoan", data)?.as_slice() {
        [Token::FixedBytes(word)] => {
            H256::from_slice(word).map_err(|e| SdkError::Serialization(e.to_string()))
        }
        other => Err(SdkError::Serialization(format!(
            "unexpected onFlashLoan output: {other:?}"
        ))),
    }
}

/// Arguments of an `onFlashLoan` callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashLoanCall {
    /// Account that initiated the loan
    pub initiator: Address,
    /// Token (or contract) the loan is denominated in
    pub token: Address,
    /// Borrowed amount
    pub amount: U256,
    /// Fee owed on top of `amount`
    pub fee: U256,
    /// Opaque callback payload
    pub data: Vec<u8>,
}

impl FlashLoanCall {
    /// Callback whose payload is the three-address route `from`, `to`, `token`
    pub fn with_route(
        initiator: Address,
        token: Address,
        amount: U256,
        fee: U256,
        route: [Address; 3],
    ) -> Self {
        Self {
            initiator,
            token,
            amount,
            fee,
            data: pack_addresses(&route),
        }
    }

    /// Parameter list of the callback
    pub fn param_types() -> [ParamType; 5] {
        [
            ParamType::Address,
            ParamType::Address,
            ParamType::Uint(256),
            ParamType::Uint(256),
            ParamType::Bytes,
        ]
    }

    /// Arguments as ABI tokens, in declared order
    pub fn tokens(&self) -> Vec<Token> {
        vec![
            Token::Address(self.initiator),
            Token::Address(self.token),
            Token::Uint(self.amount),
            Token::Uint(self.fee),
            Token::Bytes(self.data.clone()),
        ]
    }

    /// Encoded call data: selector followed by the argument tuple
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let data = encode_call(ON_FLASH_LOAN_SIGNATURE, &Self::param_types(), &self.tokens())?;
        Ok(Bytes::from(data))
    }
}
