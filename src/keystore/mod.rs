//! Wallet persistence and interactive confirmation.
//!
//! # Data Flow
//! ```text
//! load:   wallet.json → store.rs (parse, re-derive) → Wallet
//!         missing → prompt.rs ("create one?") → generate + save
//! create: generate → save (create-new, or prompt before overwrite)
//! ```

pub mod prompt;
pub mod store;

pub use prompt::{AutoConfirm, Confirm, TerminalConfirm};
pub use store::{Keystore, KeystoreError, SaveOutcome};
