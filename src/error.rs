//! Fixture error type.

use std::path::PathBuf;

use alloy::primitives::Address;
use thiserror::Error;

use crate::artifacts::ContractKind;
use crate::blockchain::BlockchainError;

/// Errors raised while deploying or wiring up a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// RPC, wallet or confirmation failure.
    #[error(transparent)]
    Chain(#[from] BlockchainError),

    /// A read call on a deployed contract failed.
    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("Cannot read artifact {}: {source}", .path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {reason}", .path.display())]
    ArtifactFormat { path: PathBuf, reason: String },

    /// Interface-only artifact (abstract contract or interface).
    #[error("Artifact for {0} has no creation bytecode")]
    MissingBytecode(ContractKind),

    #[error("{contract} constructor takes {expected} arguments, got {actual}")]
    ConstructorArity {
        contract: ContractKind,
        expected: usize,
        actual: usize,
    },

    /// Creation receipt carried no contract address.
    #[error("Deployment of {0} produced no contract address")]
    MissingContractAddress(ContractKind),

    /// The deployer's `deploy()` receipt had no logs to read the factory from.
    #[error("Deployment receipt contains no logs")]
    MissingDeploymentLog,

    #[error("Cannot decode address from log data: {0}")]
    LogDecode(String),

    /// A contract reported the zero address where a deployed one was expected.
    #[error("{0} resolved to the zero address")]
    ZeroAddress(&'static str),

    /// The pair's `token0()` matches neither deployed token.
    #[error("Pair token0 {token0} is neither {token_a} nor {token_b}")]
    UnknownToken0 {
        token0: Address,
        token_a: Address,
        token_b: Address,
    },
}

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
