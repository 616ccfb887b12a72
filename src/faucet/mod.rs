//! Faucet subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConfig.faucets
//!     → source.rs (HttpFaucet / ManualFaucet per entry)
//!     → aggregator.rs (filter by kind + chain, concurrent requests)
//!     → FaucetResult (one response per source, failures in-band)
//! ```

pub mod aggregator;
pub mod source;

pub use aggregator::{FaucetAggregator, FaucetResponse, FaucetResult};
pub use source::{FaucetError, FaucetSource, HttpFaucet, ManualFaucet};
