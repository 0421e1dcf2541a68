//! # flashgas
//!
//! Gas estimation for a flash-loan receiver's `onFlashLoan` callback.
//!
//! ## Usage
//!
//! ```bash
//! # Estimate against a local anvil node
//! flashgas --network local estimate
//!
//! # Estimate on mainnet (INFURA_API_KEY from the environment or .env)
//! flashgas estimate --amount 17720
//!
//! # Print the call data only
//! flashgas encode --fee 9
//!
//! # Show the effective configuration
//! flashgas config --show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::{Config, Network};
pub use error::CliError;
pub use output::Output;

/// Flash-loan gas estimator
#[derive(Parser, Debug)]
#[command(name = "flashgas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Target network (defaults to the configured one)
    #[arg(long, global = true, value_enum)]
    network: Option<Network>,

    /// RPC endpoint URL, overriding the network default
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Configuration file (default: ~/.flashgas/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Estimate gas for the onFlashLoan callback and dry-run it
    Estimate(commands::estimate::EstimateArgs),
    /// Print the onFlashLoan call data without contacting a node
    Encode(commands::encode::EncodeArgs),
    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // .env is optional
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    let network = cli.network.unwrap_or(config.network);

    // Override RPC URL if provided
    if let Some(rpc_url) = cli.rpc_url {
        config.network_mut(network).rpc_url = Some(rpc_url);
    }

    let infura_key = std::env::var(config::INFURA_API_KEY)
        .ok()
        .filter(|key| !key.is_empty());

    match cli.command {
        Commands::Estimate(args) => {
            args.execute(config, network, infura_key.as_deref(), cli.json)
                .await
        }
        Commands::Encode(args) => args.execute(config, network, cli.json),
        Commands::Config { show } => {
            let path = cli.config.or_else(Config::config_path);
            handle_config(&config, network, infura_key.as_deref(), path, show, cli.json)
        }
    }
}

fn handle_config(
    config: &Config,
    network: Network,
    infura_key: Option<&str>,
    path: Option<PathBuf>,
    show: bool,
    json: bool,
) -> Result<(), CliError> {
    if !show {
        Output::new(json)
            .line("Use --show to display config")
            .print();
        return Ok(());
    }

    let settings = config.settings(network)?;
    let rpc_url = match config.rpc_url(network, infura_key) {
        Ok(url) => redact_key(&url, infura_key),
        Err(e) => format!("<{e}>"),
    };
    let path = path.map(|p| p.display().to_string()).unwrap_or_default();

    Output::new(json)
        .field("network", network)
        .field("rpc_url", rpc_url)
        .field("wallet", flashgas_crypto::to_checksum(&settings.wallet))
        .field("from", flashgas_crypto::to_checksum(&settings.from))
        .field("to", flashgas_crypto::to_checksum(&settings.to))
        .field("contract", flashgas_crypto::to_checksum(&settings.contract))
        .field("token", flashgas_crypto::to_checksum(&settings.token))
        .field("amount", settings.amount)
        .field("fee", settings.fee)
        .field("config_path", path)
        .print();

    Ok(())
}

/// Hide the API key embedded in an RPC URL
fn redact_key(url: &str, key: Option<&str>) -> String {
    match key {
        Some(key) if !key.is_empty() => url.replace(key, "***"),
        _ => url.to_string(),
    }
}
