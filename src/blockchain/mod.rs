//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables / CLI (private key, RPC URL)
//!     → wallet.rs (key loading)
//!     → client.rs (signing provider with timeouts)
//!     → transaction.rs (broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::TxSender;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
