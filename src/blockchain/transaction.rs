//! Transaction broadcasting and confirmation.
//!
//! # Responsibilities
//! - Broadcast signed transactions through the client's provider
//! - Poll for the receipt within the confirmation timeout
//! - Turn reverted receipts into errors
//!
//! Nonce, gas and chain id are filled in by the provider unless the caller
//! sets them explicitly.

use alloy::network::TransactionBuilder;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Dev nodes mine on submission, so receipts show up almost immediately.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Sends transactions from the client's wallet and waits for them to land.
#[derive(Debug, Clone)]
pub struct TxSender {
    client: BlockchainClient,
}

impl TxSender {
    /// Create a new sender.
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }

    /// Build a plain value transfer.
    ///
    /// # Arguments
    /// * `to` - Destination address
    /// * `value` - Amount of native token to send
    /// * `gas_price` - Legacy gas price; `None` lets the provider estimate
    pub fn value_transfer(&self, to: Address, value: U256, gas_price: Option<u128>) -> TransactionRequest {
        let tx = TransactionRequest::default()
            .with_from(self.client.address())
            .with_to(to)
            .with_value(value);

        match gas_price {
            Some(price) => tx.with_gas_price(price),
            None => tx,
        }
    }

    /// Broadcast a transaction and wait for a successful receipt.
    pub async fn send_and_confirm(&self, tx: TransactionRequest) -> BlockchainResult<TransactionReceipt> {
        let tx = tx.with_from(self.client.address());
        let rpc_timeout_secs = self.client.config().rpc_timeout_secs;

        let pending = match timeout(
            Duration::from_secs(rpc_timeout_secs),
            self.client.provider().send_transaction(tx),
        )
        .await
        {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => {
                return Err(BlockchainError::Rpc(format!("eth_sendTransaction failed: {}", e)))
            }
            Err(_) => return Err(BlockchainError::Timeout(rpc_timeout_secs)),
        };

        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction broadcast");

        let receipt = self.wait_for_receipt(tx_hash).await?;

        if !receipt.status() {
            tracing::warn!(tx_hash = %tx_hash, "Transaction reverted");
            return Err(BlockchainError::Reverted(tx_hash));
        }

        tracing::debug!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            logs = receipt.inner.logs().len(),
            "Transaction confirmed"
        );

        Ok(receipt)
    }

    /// Poll for the receipt of `tx_hash` until it appears or the
    /// confirmation timeout passes.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let confirmation_timeout = self.client.confirmation_timeout();

        let result = timeout(confirmation_timeout, async {
            let mut ticker = interval(RECEIPT_POLL_INTERVAL);

            loop {
                ticker.tick().await;

                match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok::<_, BlockchainError>(receipt),
                    None => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: confirmation_timeout.as_secs(),
            }),
        }
    }

    /// Get the sending address.
    pub fn address(&self) -> Address {
        self.client.address()
    }
}
