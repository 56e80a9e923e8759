//! Compiled contract artifacts.
//!
//! Each contract is read from `<dir>/<Name>.json`. The Waffle, Hardhat and
//! Foundry output layouts are all accepted:
//!
//! ```text
//! { "abi": [...], "bytecode": "0x6080..." }
//! { "abi": [...], "bytecode": { "object": "6080..." } }
//! { "abi": [...], "evm": { "bytecode": { "object": "6080..." } } }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{hex, Bytes};
use serde::Deserialize;

use crate::error::{FixtureError, FixtureResult};

/// The compiled contracts the fixtures consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Erc20,
    Weth9,
    Factory,
    Pair,
    Deployer,
    FeeSetter,
    FeeReceiver,
}

impl ContractKind {
    /// Contract name as emitted by the compiler, which is also the artifact
    /// file stem.
    pub fn artifact_name(self) -> &'static str {
        match self {
            ContractKind::Erc20 => "ERC20",
            ContractKind::Weth9 => "WETH9",
            ContractKind::Factory => "DXswapFactory",
            ContractKind::Pair => "DXswapPair",
            ContractKind::Deployer => "DXswapDeployer",
            ContractKind::FeeSetter => "DXswapFeeSetter",
            ContractKind::FeeReceiver => "DXswapFeeReceiver",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(default)]
    abi: Option<serde_json::Value>,
    #[serde(default)]
    bytecode: Option<RawBytecode>,
    #[serde(default)]
    evm: Option<RawEvm>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn as_hex(&self) -> &str {
        match self {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        }
    }
}

#[derive(Deserialize)]
struct RawEvm {
    #[serde(default)]
    bytecode: Option<RawBytecode>,
}

/// ABI and creation bytecode of one compiled contract.
#[derive(Debug, Clone)]
pub struct Artifact {
    kind: ContractKind,
    abi: Option<JsonAbi>,
    bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact from its JSON text. `path` is only used in errors.
    pub fn from_json(kind: ContractKind, path: &Path, json: &str) -> FixtureResult<Self> {
        let format_err = |reason: String| FixtureError::ArtifactFormat {
            path: path.to_path_buf(),
            reason,
        };

        let raw: RawArtifact = serde_json::from_str(json).map_err(|e| format_err(e.to_string()))?;

        let abi = match raw.abi {
            Some(value) => Some(
                serde_json::from_value::<JsonAbi>(value)
                    .map_err(|e| format_err(format!("invalid abi: {}", e)))?,
            ),
            None => None,
        };

        let code_hex = raw
            .bytecode
            .as_ref()
            .map(RawBytecode::as_hex)
            .filter(|s| !s.trim_start_matches("0x").is_empty())
            .or_else(|| {
                raw.evm
                    .as_ref()
                    .and_then(|evm| evm.bytecode.as_ref())
                    .map(RawBytecode::as_hex)
            })
            .unwrap_or_default();

        let bytecode = hex::decode(code_hex)
            .map_err(|e| format_err(format!("invalid bytecode hex: {}", e)))?;
        if bytecode.is_empty() {
            return Err(FixtureError::MissingBytecode(kind));
        }

        Ok(Self {
            kind,
            abi,
            bytecode: Bytes::from(bytecode),
        })
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn abi(&self) -> Option<&JsonAbi> {
        self.abi.as_ref()
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Number of constructor parameters declared in the ABI, if one is present.
    pub fn constructor_arity(&self) -> Option<usize> {
        self.abi
            .as_ref()
            .map(|abi| abi.constructor.as_ref().map_or(0, |c| c.inputs.len()))
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_code(&self, args: &[DynSolValue]) -> FixtureResult<Bytes> {
        if let Some(expected) = self.constructor_arity() {
            if expected != args.len() {
                return Err(FixtureError::ConstructorArity {
                    contract: self.kind,
                    expected,
                    actual: args.len(),
                });
            }
        }

        let mut code = self.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        Ok(Bytes::from(code))
    }
}

/// Reads artifacts from a build directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ContractKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.artifact_name()))
    }

    /// Read and parse the artifact for `kind`.
    pub fn load(&self, kind: ContractKind) -> FixtureResult<Artifact> {
        let path = self.path_for(kind);
        let json = fs::read_to_string(&path).map_err(|source| FixtureError::ArtifactIo {
            path: path.clone(),
            source,
        })?;

        let artifact = Artifact::from_json(kind, &path, &json)?;
        tracing::debug!(
            contract = %kind,
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            "Artifact loaded"
        );
        Ok(artifact)
    }
}
