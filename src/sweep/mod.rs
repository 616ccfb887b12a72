//! Wallet sweep.
//!
//! # Data Flow
//! ```text
//! sweep(chain, destination)
//!     → token balance > 0 ? transfer all tokens, wait for receipt
//!     → native balance - reserve > 0 ? transfer the rest, wait for receipt
//!     → SweepReport
//! ```
//!
//! # Design Decisions
//! - Token first: its fee is paid in native coin
//! - Fail fast: an error in step 1 means step 2 never runs
//! - No rollback of steps already mined

pub mod orchestrator;

pub use orchestrator::{SweepOrchestrator, SweepReport};
