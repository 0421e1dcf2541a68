//! CLI configuration management

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use flashgas_sdk::abi::{tokenize_address, tokenize_uint};
use flashgas_sdk::types::CallRequest;
use flashgas_sdk::{Address, FlashLoanCall, U256};
use serde::{Deserialize, Serialize};

use crate::CliError;

const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
const INFURA_MAINNET_URL: &str = "https://mainnet.infura.io/v3/";

/// Environment variable holding the Infura project key
pub const INFURA_API_KEY: &str = "INFURA_API_KEY";

/// Target chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Local development node (anvil accounts)
    Local,
    /// Ethereum mainnet through Infura
    #[default]
    Mainnet,
}

impl Network {
    fn default_accounts(self) -> [&'static str; 3] {
        match self {
            Network::Local => [
                "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
            ],
            Network::Mainnet => [
                "0x478d21c5167CB66AdEDAFA8D72D1f3757F6e6206",
                "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
                "0xd9e1cE17f2641f24aE83637ab66a2cca9C378B9F",
            ],
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Local => write!(f, "local"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Per-network overrides; unset fields fall back to the network's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// RPC endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Flash-loan initiator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    /// First hop of the route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Second hop of the route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Network used when `--network` is not given
    #[serde(default)]
    pub network: Network,
    /// Flash-loan receiver contract
    #[serde(default = "default_contract")]
    pub contract: String,
    /// Token routed through the loan
    #[serde(default = "default_token")]
    pub token: String,
    /// Loan amount (decimal or `0x` hex)
    #[serde(default = "default_amount")]
    pub amount: String,
    /// Loan fee (decimal or `0x` hex)
    #[serde(default = "default_fee")]
    pub fee: String,
    /// Local node overrides
    #[serde(default)]
    pub local: NetworkConfig,
    /// Mainnet overrides
    #[serde(default)]
    pub mainnet: NetworkConfig,
}

fn default_contract() -> String {
    "0xcBc57F275dB5fd2F4da20882fCa443B9cd302eCD".to_string()
}

fn default_token() -> String {
    "0x46101fbe580940c7dd2d2879662bc98954b5edd1".to_string()
}

fn default_amount() -> String {
    "17720".to_string()
}

fn default_fee() -> String {
    "0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            contract: default_contract(),
            token: default_token(),
            amount: default_amount(),
            fee: default_fee(),
            local: NetworkConfig::default(),
            mainnet: NetworkConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".flashgas"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the built-in defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// Overrides for `network`
    pub fn network(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::Local => &self.local,
            Network::Mainnet => &self.mainnet,
        }
    }

    /// Mutable overrides for `network`
    pub fn network_mut(&mut self, network: Network) -> &mut NetworkConfig {
        match network {
            Network::Local => &mut self.local,
            Network::Mainnet => &mut self.mainnet,
        }
    }

    /// RPC endpoint for `network`.
    ///
    /// Mainnet without an explicit URL is built from the Infura key.
    pub fn rpc_url(&self, network: Network, infura_key: Option<&str>) -> Result<String, CliError> {
        if let Some(url) = &self.network(network).rpc_url {
            return Ok(url.clone());
        }
        match network {
            Network::Local => Ok(LOCAL_RPC_URL.to_string()),
            Network::Mainnet => match infura_key {
                Some(key) if !key.is_empty() => Ok(format!("{INFURA_MAINNET_URL}{key}")),
                _ => Err(CliError::MissingConfiguration(format!(
                    "{INFURA_API_KEY} is required for mainnet (or pass --rpc-url)"
                ))),
            },
        }
    }

    /// Parse addresses and amounts for `network`
    pub fn settings(&self, network: Network) -> Result<Settings, CliError> {
        let overrides = self.network(network);
        let [wallet, from, to] = network.default_accounts();

        Ok(Settings {
            network,
            wallet: parse_address("wallet", overrides.wallet.as_deref().unwrap_or(wallet))?,
            from: parse_address("from", overrides.from.as_deref().unwrap_or(from))?,
            to: parse_address("to", overrides.to.as_deref().unwrap_or(to))?,
            contract: parse_address("contract", &self.contract)?,
            token: parse_address("token", &self.token)?,
            amount: tokenize_uint(self.amount.trim(), 256)?,
            fee: tokenize_uint(self.fee.trim(), 256)?,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, CliError> {
    tokenize_address(value).map_err(|e| CliError::InvalidAddress(format!("{field}: {e}")))
}

/// Typed inputs of one estimation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Selected network
    pub network: Network,
    /// Flash-loan initiator
    pub wallet: Address,
    /// Transaction sender and first route hop
    pub from: Address,
    /// Second route hop
    pub to: Address,
    /// Receiver contract
    pub contract: Address,
    /// Routed token
    pub token: Address,
    /// Loan amount
    pub amount: U256,
    /// Loan fee
    pub fee: U256,
}

impl Settings {
    /// `onFlashLoan(wallet, contract, amount, fee, pack(from, to, token))`
    pub fn flash_loan_call(&self) -> FlashLoanCall {
        FlashLoanCall::with_route(
            self.wallet,
            self.contract,
            self.amount,
            self.fee,
            [self.from, self.to, self.token],
        )
    }

    /// Call from `from` to the receiver contract carrying `data`
    pub fn call_request(&self, gas_price: U256, data: Bytes) -> CallRequest {
        CallRequest {
            from: Some(self.from),
            to: Some(self.contract),
            gas_price: Some(gas_price),
            value: Some(U256::zero()),
            data: Some(data),
            ..Default::default()
        }
    }
}
