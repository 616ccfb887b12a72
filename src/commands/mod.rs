//! Command layer: one operation per CLI subcommand.
//!
//! # Data Flow
//! ```text
//! main.rs (clap)
//!     → wallet.rs (load wallet, resolve chain + destination, confirm)
//!     → balance / faucet / blockchain / sweep
//!     → render.rs (text for stdout)
//! ```

pub mod error;
pub mod render;
pub mod wallet;

pub use error::{CommandError, CommandResult};
pub use wallet::{Destination, WalletCommands, WalletOverview};
