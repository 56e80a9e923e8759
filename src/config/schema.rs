//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fixtures.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a fixture run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Chain connection settings.
    pub chain: BlockchainConfig,

    /// Location of the compiled contract artifacts.
    pub artifacts: ArtifactsConfig,

    /// Deployment parameters (gas overrides, funding, token supply).
    pub deployment: DeploymentConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (31337 for local Anvil/Hardhat, 1337 for Ganache).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a transaction receipt, in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 30,
        }
    }
}

/// Compiled artifact location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding `<ContractName>.json` build outputs.
    pub dir: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: "build".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Gas limit applied to the deployer and token deployments.
    pub gas_limit: u64,

    /// Value sent to the deployer before `deploy()` is called, in wei.
    pub funding_value_wei: u64,

    /// Gas price for the funding transfer. Unset lets the provider estimate.
    pub funding_gas_price_wei: Option<u64>,

    /// Initial supply of each test token, in whole tokens (18 decimals).
    pub token_supply: u64,

    /// Swap fee assigned to the fixture pair.
    pub swap_fee: u32,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            gas_limit: 9_999_999,
            funding_value_wei: 1,
            funding_gas_price_wei: None,
            token_supply: 10_000,
            swap_fee: 15,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
