//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint of the test node
//! - Sign every outgoing transaction with the fixture wallet
//! - Refuse a node whose chain id differs from the configured one
//! - Query chain state (chain id, code, receipts)
//! - Bound every request by the configured timeout

use std::fmt::Display;
use std::future::{Future, IntoFuture};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;

/// Signing RPC client shared by the deployment steps and the contract
/// handles they return.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Provider with nonce, gas and signing fillers installed.
    provider: DynProvider,
    wallet: Wallet,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client over HTTP.
    ///
    /// # Arguments
    /// * `config` - Chain connection settings
    /// * `wallet` - Account that signs and pays for every transaction
    pub async fn new(config: BlockchainConfig, wallet: Wallet) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        Self::with_provider(config, wallet, provider).await
    }

    /// Create a client around an existing signing provider.
    ///
    /// Fails with [`BlockchainError::ChainMismatch`] when the node reports a
    /// chain id other than the configured one, since the wallet signs for the
    /// configured id only. An unreachable node is logged and tolerated; the
    /// first real request reports it.
    pub async fn with_provider(
        config: BlockchainConfig,
        wallet: Wallet,
        provider: DynProvider,
    ) -> BlockchainResult<Self> {
        let client = Self {
            provider,
            wallet,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id = client.config.chain_id,
                    deployer = %client.address(),
                    "Blockchain client initialized"
                );
            }
            Err(e @ BlockchainError::ChainMismatch { .. }) => {
                tracing::error!(error = %e, "Connected node runs a different chain");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Run an RPC future under the request timeout.
    async fn call<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the runtime code deployed at an address.
    pub async fn get_code(&self, address: Address) -> BlockchainResult<Bytes> {
        self.call("eth_getCode", self.provider.get_code_at(address).into_future())
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// The signing provider. Contract handles are bound to a clone of it.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Address of the signing account.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// How long to wait for a receipt after broadcasting.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.confirmation_timeout_secs)
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("address", &self.wallet.address())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
