//! Single-keypair wallet for several EVM chains.
//!
//! One private key, one address, the same on every configured chain.
//! Balances are read concurrently from all chains, faucets are asked
//! concurrently, and transfers are signed locally and confirmed by
//! polling for receipts.

pub mod balance;
pub mod blockchain;
pub mod commands;
pub mod config;
pub mod faucet;
pub mod keystore;
pub mod observability;
pub mod sweep;

pub use blockchain::{ChainRegistry, Wallet};
pub use commands::{CommandError, WalletCommands};
pub use config::WalletConfig;
