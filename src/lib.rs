//! Deployment fixtures for DXswap test suites.
//!
//! Deploys the factory, fee-setter, fee-receiver and token pairs from
//! compiled artifacts onto a local EVM node and hands back typed contract
//! handles that sign with the fixture wallet.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use dxswap_fixtures::{pair_fixture, FixtureConfig, FixtureEnv, Wallet};
//!
//! let config = FixtureConfig::default();
//! let wallet = Wallet::dev(config.chain.chain_id)?;
//! let env = FixtureEnv::connect(&config, wallet).await?;
//!
//! let fixture = pair_fixture(&env).await?;
//! let balance = fixture.token0.balanceOf(env.owner()).call().await?;
//! assert_eq!(balance, dxswap_fixtures::expand_to_18_decimals(10_000));
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod deploy;
pub mod error;
pub mod fixtures;
pub mod observability;
pub mod units;

pub use artifacts::{Artifact, ArtifactStore, ContractKind};
pub use blockchain::{BlockchainClient, Wallet};
pub use config::FixtureConfig;
pub use error::{FixtureError, FixtureResult};
pub use fixtures::{
    deploy_protocol, factory_fixture, pair_fixture, FactoryFixture, FixtureEnv, PairFixture, PairSpec,
};
pub use units::expand_to_18_decimals;
