//! JSON wallet file persistence.
//!
//! The file holds `{privateKey, publicKey, address}`; only `privateKey` is
//! read back; the other fields are re-derived on every load.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::blockchain::{BlockchainError, Wallet};
use crate::keystore::prompt::Confirm;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Wallet file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed wallet file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid key in wallet file: {0}")]
    Key(#[from] BlockchainError),

    /// The user declined to create a missing wallet.
    #[error("Aborting. You need a wallet to continue")]
    Aborted,
}

pub type KeystoreResult<T> = Result<T, KeystoreError>;

/// On-disk representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletFile {
    private_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl From<&Wallet> for WalletFile {
    fn from(wallet: &Wallet) -> Self {
        Self {
            private_key: wallet.private_key().to_string(),
            public_key: Some(wallet.public_key().to_string()),
            address: Some(wallet.address().to_string()),
        }
    }
}

/// Result of [`Keystore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Overwritten,
    /// An existing file was kept because overwrite was declined.
    KeptExisting,
}

/// Wallet persistence bound to a single file.
#[derive(Debug, Clone)]
pub struct Keystore {
    path: PathBuf,
}

impl Keystore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and re-derive the stored wallet. `Ok(None)` when no file exists.
    pub fn read(&self) -> KeystoreResult<Option<Wallet>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let file: WalletFile = serde_json::from_str(&content).map_err(|source| KeystoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let wallet = Wallet::from_private_key(&file.private_key)?;
        if let Some(stored) = &file.address {
            if !address_matches(stored, wallet.address()) {
                tracing::warn!(path = %self.path.display(), stored = %stored, derived = %wallet.address(), "Stored address does not match private key, using derived address");
            }
        }

        Ok(Some(wallet))
    }

    /// Write the wallet, asking before replacing an existing file.
    pub async fn save(&self, wallet: &Wallet, confirm: &dyn Confirm) -> KeystoreResult<SaveOutcome> {
        let json = self.serialize(wallet)?;

        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path);

        match created {
            Ok(mut file) => {
                file.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
                tracing::info!(path = %self.path.display(), address = %wallet.address(), "Wallet saved");
                Ok(SaveOutcome::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let message = format!(
                    "{} already exists, replace it with new wallet?",
                    self.path.display()
                );
                if confirm.confirm(&message).await.map_err(|e| self.io_error(e))? {
                    fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
                    tracing::info!(path = %self.path.display(), address = %wallet.address(), "Wallet overwritten");
                    Ok(SaveOutcome::Overwritten)
                } else {
                    tracing::info!(path = %self.path.display(), "Keeping old wallet");
                    Ok(SaveOutcome::KeptExisting)
                }
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Generate and save a new wallet. Returns the wallet that ends up on disk.
    pub async fn create(&self, confirm: &dyn Confirm) -> KeystoreResult<Wallet> {
        let wallet = Wallet::generate();
        match self.save(&wallet, confirm).await? {
            SaveOutcome::Created | SaveOutcome::Overwritten => Ok(wallet),
            SaveOutcome::KeptExisting => self.read()?.ok_or_else(|| {
                self.io_error(std::io::Error::new(
                    ErrorKind::NotFound,
                    "wallet file disappeared",
                ))
            }),
        }
    }

    /// Load the wallet, offering to create one when the file is missing.
    pub async fn load(&self, confirm: &dyn Confirm) -> KeystoreResult<Wallet> {
        if let Some(wallet) = self.read()? {
            return Ok(wallet);
        }

        let message = format!("You don't have a {} yet, create one?", self.path.display());
        if confirm.confirm(&message).await.map_err(|e| self.io_error(e))? {
            self.create(confirm).await
        } else {
            Err(KeystoreError::Aborted)
        }
    }

    fn serialize(&self, wallet: &Wallet) -> KeystoreResult<String> {
        serde_json::to_string_pretty(&WalletFile::from(wallet)).map_err(|source| KeystoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> KeystoreError {
        KeystoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Compare a stored address with the derived one, with or without `0x`, any case.
fn address_matches(stored: &str, derived: Address) -> bool {
    let hex = stored.trim();
    let hex = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X")).unwrap_or(hex);
    format!("0x{}", hex)
        .parse::<Address>()
        .map(|stored| stored == derived)
        .unwrap_or(false)
}
