//! Balance aggregation.
//!
//! # Data Flow
//! ```text
//! address + [ChainHandle; N]
//!     → N native queries ┐ concurrently, each bounded by a timeout
//!     → K token queries  ┘ (K = chains with a token contract)
//!     → pre-indexed slots joined in input order
//!     → BalanceReport (N entries, failures recorded, never an error)
//! ```

pub mod aggregator;

pub use aggregator::{
    native_balance, token_balance, Asset, BalanceAggregator, BalanceEntry, BalanceReport,
    QueryFailure,
};
