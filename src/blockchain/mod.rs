//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! wallet.json (private key)
//!     → wallet.rs (key derivation, signing)
//! wallet.toml (chains)
//!     → registry.rs (descriptor + client per chain)
//!     → client.rs (RPC connection with timeouts and failover)
//! send:
//!     → transaction.rs (build, sign, broadcast once)
//!     → confirmation.rs (poll receipt, classify)
//!     → transfer.rs (submit + confirm as one step)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Broadcasts are at-most-once; reads fail over between providers

pub mod client;
pub mod confirmation;
pub mod registry;
pub mod token;
pub mod transaction;
pub mod transfer;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::{BlockchainClient, ChainEndpoint};
pub use confirmation::ConfirmationWaiter;
pub use registry::{ChainDescriptor, ChainHandle, ChainRegistry};
pub use token::TokenContract;
pub use transaction::TransactionSubmitter;
pub use transfer::{CompletedTransfer, Transfers};
pub use types::{BlockchainError, BlockchainResult, ChainId, ReceiptInfo, SubmittedTransaction};
pub use wallet::Wallet;
