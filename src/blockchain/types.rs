//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error on {chain}: {message}")]
    Rpc { chain: String, message: String },

    /// RPC request timed out.
    #[error("RPC timeout on {chain} after {secs} seconds")]
    Timeout { chain: String, secs: u64 },

    /// Missing chain, contract mapping or destination.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The transaction could not be signed for the target chain.
    #[error("Signing error on {chain}: {message}")]
    Signing { chain: String, message: String },

    /// The endpoint rejected the signed transaction.
    #[error("Broadcast rejected by {chain}: {message}")]
    Broadcast { chain: String, message: String },

    /// No receipt appeared within the polling budget.
    #[error("Transaction {tx_hash} not mined on {chain} after {attempts} attempts")]
    ConfirmationTimeout {
        chain: String,
        tx_hash: TxHash,
        attempts: u32,
    },

    /// A receipt was found but the execution failed.
    #[error("Transaction {tx_hash} failed on {chain}: {reason}")]
    TransactionFailed {
        chain: String,
        tx_hash: TxHash,
        reason: String,
    },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Endpoint reports a different chain than configured.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Amount could not be parsed or converted.
    #[error("Invalid amount '{amount}': {message}")]
    InvalidAmount { amount: String, message: String },
}

impl BlockchainError {
    /// Chain the error originated from, when known.
    pub fn chain(&self) -> Option<&str> {
        match self {
            BlockchainError::Rpc { chain, .. }
            | BlockchainError::Timeout { chain, .. }
            | BlockchainError::Signing { chain, .. }
            | BlockchainError::Broadcast { chain, .. }
            | BlockchainError::ConfirmationTimeout { chain, .. }
            | BlockchainError::TransactionFailed { chain, .. } => Some(chain),
            _ => None,
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A transaction accepted by an endpoint, not yet mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub tx_hash: TxHash,
    /// Gas limit the transaction was signed with.
    pub gas_limit: u64,
    pub to: Address,
}

/// The parts of a transaction receipt the wallet relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptInfo {
    pub transaction_hash: TxHash,
    pub gas_used: u64,
    pub block_number: Option<u64>,
    /// Explicit execution status (EIP-658). `None` for pre-Byzantium receipts.
    pub status: Option<bool>,
}
