use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dxswap_fixtures::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use dxswap_fixtures::config::{load_config, validation::validate_config, ConfigError, FixtureConfig};
use dxswap_fixtures::observability::init_logging;
use dxswap_fixtures::{factory_fixture, pair_fixture, FactoryFixture, FixtureEnv, Wallet};

#[derive(Parser)]
#[command(name = "dxswap-fixture")]
#[command(about = "Deploy DXswap test fixtures to a local EVM node", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint (overrides the config file)
    #[arg(short, long)]
    rpc_url: Option<String>,

    /// Chain id the node must report (overrides the config file)
    #[arg(long)]
    chain_id: Option<u64>,

    /// Directory holding the compiled contract artifacts
    #[arg(short, long)]
    artifacts: Option<String>,

    /// Legacy gas price in wei for the deployer funding transfer; use 0 on
    /// nodes without a base fee
    #[arg(long)]
    funding_gas_price: Option<u64>,

    /// Deployer private key; the first Anvil dev account when unset
    #[arg(long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy factory, fee-setter and fee-receiver
    Factory,
    /// Deploy two tokens and a pair on top of a new factory
    Pair,
}

#[derive(Serialize)]
struct FactoryAddresses {
    factory: String,
    fee_setter: String,
    fee_receiver: String,
}

impl From<&FactoryFixture> for FactoryAddresses {
    fn from(fixture: &FactoryFixture) -> Self {
        Self {
            factory: fixture.factory.address().to_string(),
            fee_setter: fixture.fee_setter.address().to_string(),
            fee_receiver: fixture.fee_receiver.address().to_string(),
        }
    }
}

#[derive(Serialize)]
struct PairAddresses {
    #[serde(flatten)]
    protocol: FactoryAddresses,
    token0: String,
    token1: String,
    pair: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FixtureConfig::default(),
    };
    if let Some(rpc_url) = cli.rpc_url {
        config.chain.rpc_url = rpc_url;
    }
    if let Some(chain_id) = cli.chain_id {
        config.chain.chain_id = chain_id;
    }
    if let Some(dir) = cli.artifacts {
        config.artifacts.dir = dir;
    }
    if let Some(gas_price) = cli.funding_gas_price {
        config.deployment.funding_gas_price_wei = Some(gas_price);
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.logging);

    let wallet = match &cli.private_key {
        Some(key) => Wallet::from_private_key(key, config.chain.chain_id)?,
        None => Wallet::dev(config.chain.chain_id)?,
    };
    let env = FixtureEnv::connect(&config, wallet).await?;

    let output = match cli.command {
        Commands::Factory => {
            let fixture = factory_fixture(&env).await?;
            serde_json::to_string_pretty(&FactoryAddresses::from(&fixture))?
        }
        Commands::Pair => {
            let fixture = pair_fixture(&env).await?;
            serde_json::to_string_pretty(&PairAddresses {
                protocol: FactoryAddresses::from(&fixture.protocol),
                token0: fixture.token0.address().to_string(),
                token1: fixture.token1.address().to_string(),
                pair: fixture.pair.address().to_string(),
            })?
        }
    };

    println!("{}", output);
    Ok(())
}
