//! Contract creation from build artifacts.

use alloy::dyn_abi::DynSolValue;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};

use crate::artifacts::{ArtifactStore, ContractKind};
use crate::blockchain::TxSender;
use crate::error::{FixtureError, FixtureResult};

/// Fail with [`FixtureError::ZeroAddress`] if `address` is zero.
pub fn ensure_deployed(address: Address, what: &'static str) -> FixtureResult<Address> {
    if address.is_zero() {
        return Err(FixtureError::ZeroAddress(what));
    }
    Ok(address)
}

/// Deploys artifacts and sends plain transactions from the fixture wallet.
#[derive(Debug, Clone)]
pub struct ContractDeployer {
    sender: TxSender,
    artifacts: ArtifactStore,
}

impl ContractDeployer {
    pub fn new(sender: TxSender, artifacts: ArtifactStore) -> Self {
        Self { sender, artifacts }
    }

    /// Deploy the artifact for `kind` with the given constructor arguments.
    ///
    /// `gas_limit` overrides the provider's estimate when set.
    pub async fn deploy(
        &self,
        kind: ContractKind,
        args: &[DynSolValue],
        gas_limit: Option<u64>,
    ) -> FixtureResult<Address> {
        let artifact = self.artifacts.load(kind)?;
        let code = artifact.creation_code(args)?;

        let mut tx = TransactionRequest::default().with_deploy_code(code);
        if let Some(gas_limit) = gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }

        let receipt = self.sender.send_and_confirm(tx).await?;
        let address = receipt
            .contract_address
            .ok_or(FixtureError::MissingContractAddress(kind))?;
        let address = ensure_deployed(address, kind.artifact_name())?;

        tracing::info!(
            contract = %kind,
            address = %address,
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "Contract deployed"
        );

        Ok(address)
    }

    /// Send `value` wei to `to`.
    pub async fn fund(
        &self,
        to: Address,
        value: U256,
        gas_price: Option<u128>,
    ) -> FixtureResult<TransactionReceipt> {
        let tx = self.sender.value_transfer(to, value, gas_price);
        let receipt = self.sender.send_and_confirm(tx).await?;

        tracing::info!(to = %to, value = %value, "Account funded");
        Ok(receipt)
    }

    /// Send an already-built call (e.g. from a contract handle).
    pub async fn send(&self, tx: TransactionRequest) -> FixtureResult<TransactionReceipt> {
        Ok(self.sender.send_and_confirm(tx).await?)
    }
}
