//! Subcommands

pub mod encode;
pub mod estimate;

use clap::Args;

use crate::config::Config;

/// Loan parameters that override the configuration file
#[derive(Debug, Default, Args)]
pub struct LoanArgs {
    /// Receiver contract address
    #[arg(long)]
    pub contract: Option<String>,
    /// Token address placed in the route
    #[arg(long)]
    pub token: Option<String>,
    /// Loan amount (decimal or 0x hex)
    #[arg(long)]
    pub amount: Option<String>,
    /// Loan fee (decimal or 0x hex)
    #[arg(long)]
    pub fee: Option<String>,
}

impl LoanArgs {
    /// Copy every given override into `config`
    pub fn apply(self, config: &mut Config) {
        if let Some(contract) = self.contract {
            config.contract = contract;
        }
        if let Some(token) = self.token {
            config.token = token;
        }
        if let Some(amount) = self.amount {
            config.amount = amount;
        }
        if let Some(fee) = self.fee {
            config.fee = fee;
        }
    }
}
