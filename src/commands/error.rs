//! Command-level error taxonomy.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::faucet::FaucetError;
use crate::keystore::KeystoreError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Keystore(KeystoreError),

    #[error("{0}")]
    Faucet(#[from] FaucetError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    /// A confirmation was declined. Not a failure of the system.
    #[error("{0}")]
    UserAborted(String),
}

impl CommandError {
    pub fn is_user_aborted(&self) -> bool {
        matches!(self, CommandError::UserAborted(_))
    }
}

impl From<KeystoreError> for CommandError {
    fn from(err: KeystoreError) -> Self {
        match err {
            KeystoreError::Aborted => CommandError::UserAborted(err.to_string()),
            other => CommandError::Keystore(other),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
