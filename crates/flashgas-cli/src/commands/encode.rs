//! `encode`: build the callback payload without touching the network

use clap::Args;
use flashgas_sdk::ON_FLASH_LOAN_SIGNATURE;

use super::LoanArgs;
use crate::config::{Config, Network};
use crate::{output::Output, CliError};

/// Arguments of `flashgas encode`
#[derive(Debug, Args)]
pub struct EncodeArgs {
    #[command(flatten)]
    loan: LoanArgs,
}

impl EncodeArgs {
    pub fn execute(self, mut config: Config, network: Network, json: bool) -> Result<(), CliError> {
        self.loan.apply(&mut config);
        render(&config, network, json)?.print();
        Ok(())
    }
}

fn render(config: &Config, network: Network, json: bool) -> Result<Output, CliError> {
    let settings = config.settings(network)?;
    let data = settings.flash_loan_call().encode()?;

    Ok(Output::new(json)
        .field("signature", ON_FLASH_LOAN_SIGNATURE)
        .field("selector", format!("0x{}", hex::encode(&data[..4])))
        .field_u64("length", data.len() as u64)
        .field("data", format!("0x{}", hex::encode(&data))))
}
