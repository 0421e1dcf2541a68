//! `estimate`: gas estimation and dry run of the flash-loan callback

use std::time::Duration;

use bytes::Bytes;
use clap::Args;
use flashgas_crypto::to_checksum;
use flashgas_sdk::types::BlockId;
use flashgas_sdk::{
    decode_callback_return, flash_loan_receiver, gas_cost, FlashClient, Gas, HttpTransport, H256,
    U256,
};

use super::LoanArgs;
use crate::config::{Config, Network, Settings};
use crate::{output::Output, CliError};

/// Arguments of `flashgas estimate`
#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

impl EstimateArgs {
    pub async fn execute(
        self,
        mut config: Config,
        network: Network,
        infura_key: Option<&str>,
        json: bool,
    ) -> Result<(), CliError> {
        self.loan.apply(&mut config);
        let settings = config.settings(network)?;
        let url = config.rpc_url(network, infura_key)?;

        // Human output streams as it goes; JSON is one object on success.
        let live = !json;
        if live {
            render_inputs(&settings, Output::new(false)).print();
        }

        tracing::info!(%network, "connecting");
        let transport = HttpTransport::with_timeout(&url, Duration::from_secs(self.timeout))?;
        let client = FlashClient::connect_with(transport).await?;
        let chain_id = client.chain_id().await?;
        tracing::info!(chain_id, "connected");

        let mut report = EstimateReport::default();
        run(&client, &settings, &mut report, live).await?;
        if json {
            render(&settings, &report, true).print();
        }
        Ok(())
    }
}

/// Results of one estimation run, filled in step by step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateReport {
    /// Suggested gas price in wei
    pub gas_price: Option<U256>,
    /// Estimated gas limit
    pub gas_limit: Option<Gas>,
    /// gas_price * gas_limit
    pub price: Option<U256>,
    /// Block the dry run executed against
    pub block_number: Option<u64>,
    /// Raw return data of the dry run
    pub result: Option<Bytes>,
    /// `bytes32` returned by the callback, when the result decodes as one
    pub returned: Option<H256>,
}

/// Encode the callback, price it and dry-run it at the latest block.
///
/// Each completed step is recorded in `report` (and printed when `live`), so a
/// failure leaves the steps before it in place. Stops at the first failing request.
pub async fn run(
    client: &FlashClient,
    settings: &Settings,
    report: &mut EstimateReport,
    live: bool,
) -> Result<(), CliError> {
    let receiver = flash_loan_receiver(settings.contract)?;
    let data = settings.flash_loan_call().encode()?;
    tracing::info!(bytes = data.len(), "encoded onFlashLoan call");

    let gas_price = client.gas_price().await?;
    tracing::info!(%gas_price, "gas price");
    report.gas_price = Some(gas_price);
    emit(live, Output::new(false).field("gasPrice", gas_price));

    let request = settings.call_request(gas_price, data);
    let gas_limit = client.estimate_gas(&request).await?;
    let price = gas_cost(gas_price, gas_limit)?;
    tracing::info!(gas_limit, %price, "gas estimated");
    report.gas_limit = Some(gas_limit);
    report.price = Some(price);
    emit(
        live,
        Output::new(false)
            .field_u64("gasLimit", gas_limit)
            .field("price", price),
    );

    let block_number = client.block_number().await?;
    report.block_number = Some(block_number);
    emit(live, Output::new(false).field_u64("blockNumber", block_number));

    let result = client.call(&request, BlockId::Number(block_number)).await?;
    tracing::info!(block_number, bytes = result.len(), "call executed");
    let returned = match decode_callback_return(&receiver, &result) {
        Ok(word) => Some(word),
        Err(e) => {
            tracing::debug!(error = %e, "call result is not a bytes32");
            None
        }
    };

    let mut out = Output::new(false).field("result", format!("0x{}", hex::encode(&result)));
    if let Some(word) = returned {
        out = out.field("returned", word);
    }
    emit(live, out);

    report.result = Some(result);
    report.returned = returned;
    Ok(())
}

fn emit(live: bool, output: Output) {
    if live {
        output.print();
    }
}

fn render_inputs(settings: &Settings, out: Output) -> Output {
    out.field("wallet", to_checksum(&settings.wallet))
        .field("from", to_checksum(&settings.from))
        .field("to", to_checksum(&settings.to))
        .field("contract", to_checksum(&settings.contract))
        .field("token", to_checksum(&settings.token))
        .field("amount", settings.amount)
}

/// Inputs followed by every step `report` has reached
fn render(settings: &Settings, report: &EstimateReport, json: bool) -> Output {
    let mut out = render_inputs(settings, Output::new(json));
    if let Some(gas_price) = report.gas_price {
        out = out.field("gasPrice", gas_price);
    }
    if let (Some(gas_limit), Some(price)) = (report.gas_limit, report.price) {
        out = out.field_u64("gasLimit", gas_limit).field("price", price);
    }
    if let Some(block_number) = report.block_number {
        out = out.field_u64("blockNumber", block_number);
    }
    if let Some(result) = &report.result {
        out = out.field("result", format!("0x{}", hex::encode(result)));
    }
    if let Some(word) = report.returned {
        out = out.field("returned", word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgas_sdk::{MockTransport, SdkError};
    use serde_json::Value;

    fn local_settings() -> Settings {
        Config::default().settings(Network::Local).unwrap()
    }

    #[tokio::test]
    async fn test_run_against_mock() {
        let transport = MockTransport::new();
        let observer = transport.handle();
        transport.set_response("eth_gasPrice", Value::String("0x3b9aca00".to_string()));
        transport.set_response("eth_estimateGas", Value::String("0x1d4c0".to_string()));
        transport.set_response("eth_call", Value::String(format!("0x{}", "ab".repeat(32))));
        let client = FlashClient::with_transport(transport);
        let settings = local_settings();

        let mut report = EstimateReport::default();
        run(&client, &settings, &mut report, false).await.unwrap();
        assert_eq!(report.gas_price, Some(U256::from(1_000_000_000u64)));
        assert_eq!(report.gas_limit, Some(120_000));
        assert_eq!(report.price, Some(U256::from(120_000_000_000_000u64)));
        assert_eq!(report.block_number, Some(256));
        assert_eq!(report.result.as_deref(), Some(&[0xab; 32][..]));
        assert_eq!(report.returned, Some(H256::from_bytes([0xab; 32])));

        let methods: Vec<_> = observer.requests().into_iter().map(|(m, _)| m).collect();
        assert_eq!(
            methods,
            ["eth_gasPrice", "eth_estimateGas", "eth_blockNumber", "eth_call"]
        );

        let requests = observer.requests();
        let estimate = &requests[1].1[0];
        assert_eq!(estimate["from"], settings.from.to_hex());
        assert_eq!(estimate["to"], settings.contract.to_hex());
        assert!(estimate["data"].as_str().unwrap().starts_with("0x23e30c8b"));
        assert_eq!(requests[3].1[1], "0x100");
    }

    #[tokio::test]
    async fn test_run_empty_result_has_no_return_word() {
        let client = FlashClient::with_transport(MockTransport::new());
        let mut report = EstimateReport::default();
        run(&client, &local_settings(), &mut report, false).await.unwrap();

        assert_eq!(report.result.as_deref(), Some(&[][..]));
        assert_eq!(report.returned, None);
    }

    #[tokio::test]
    async fn test_run_stops_on_revert() {
        let transport = MockTransport::new();
        let observer = transport.handle();
        transport.set_error("eth_estimateGas", 3, "execution reverted", None);
        let client = FlashClient::with_transport(transport);

        let mut report = EstimateReport::default();
        let err = run(&client, &local_settings(), &mut report, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Sdk(SdkError::ExecutionReverted { .. })
        ));
        assert_eq!(err.to_string(), "execution reverted");
        assert!(observer
            .requests()
            .iter()
            .all(|(method, _)| method != "eth_call"));
    }

    #[tokio::test]
    async fn test_revert_keeps_inputs_and_gas_price() {
        let transport = MockTransport::new();
        transport.set_error("eth_estimateGas", 3, "execution reverted", None);
        let client = FlashClient::with_transport(transport);
        let settings = local_settings();

        let mut report = EstimateReport::default();
        assert!(run(&client, &settings, &mut report, false).await.is_err());
        assert_eq!(report.gas_price, Some(U256::from(1_000_000_000u64)));
        assert_eq!(report.gas_limit, None);

        let text = render(&settings, &report, false).render();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "wallet 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
                "from 0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "to 0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
                "contract 0xcBc57F275dB5fd2F4da20882fCa443B9cd302eCD",
                "token 0x46101FBe580940C7DD2D2879662bC98954B5edd1",
                "amount 17720",
                "gasPrice 1000000000",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_reports_transport_failure() {
        let transport = MockTransport::new();
        transport.set_error("eth_gasPrice", -32000, "header not found", None);
        let client = FlashClient::with_transport(transport);

        let mut report = EstimateReport::default();
        let err = run(&client, &local_settings(), &mut report, false)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Sdk(SdkError::Rpc { .. })));
        assert_eq!(report, EstimateReport::default());
    }

    #[test]
    fn test_render_lines() {
        let settings = local_settings();
        let report = EstimateReport {
            gas_price: Some(U256::from(2)),
            gas_limit: Some(50_000),
            price: Some(U256::from(100_000)),
            block_number: Some(7),
            result: Some(Bytes::from_static(&[0x01])),
            returned: None,
        };
        let text = render(&settings, &report, false).render();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "wallet 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(lines[5], "amount 17720");
        assert_eq!(lines[6], "gasPrice 2");
        assert_eq!(lines[7], "gasLimit 50000");
        assert_eq!(lines[8], "price 100000");
        assert_eq!(lines[9], "blockNumber 7");
        assert_eq!(lines[10], "result 0x01");
        assert_eq!(lines.len(), 11);
    }
}
