//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! wallet.toml (optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → registry / faucets / commands built once from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded for the duration of a command
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ChainConfig;
pub use schema::FaucetConfig;
pub use schema::{FaucetKind, FaucetMethod};
pub use schema::{TokenConfig, TransactionConfig};
pub use schema::WalletConfig;
