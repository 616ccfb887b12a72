//! Wallet key material and transaction signing.
//!
//! # Security
//! - The public key and address are always re-derived from the private key
//! - Keys are never logged
//! - The wallet is immutable once constructed

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Single-keypair wallet: private key, derived public key, derived address.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Uncompressed secp256k1 public key without the 0x04 prefix.
    public_key: Bytes,
    address: Address,
}

impl Wallet {
    /// Generate a wallet from a fresh random key.
    pub fn generate() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let point = signer.credential().verifying_key().to_encoded_point(false);
        // Skip the SEC1 0x04 tag
        let public_key = Bytes::copy_from_slice(&point.as_bytes()[1..]);
        let address = Address::from_raw_public_key(&public_key);

        Self {
            signer,
            public_key,
            address,
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key(&self) -> &Bytes {
        &self.public_key
    }

    /// The raw 32-byte private key.
    pub fn private_key(&self) -> B256 {
        self.signer.to_bytes()
    }

    /// Sign a legacy transaction for `chain_id` and return the envelope.
    ///
    /// The chain ID is written into the transaction before signing
    /// (EIP-155 replay protection).
    pub fn sign_legacy(&self, mut tx: TxLegacy, chain_id: u64) -> BlockchainResult<TxEnvelope> {
        tx.chain_id = Some(chain_id);
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;
        Ok(TxEnvelope::Legacy(tx.into_signed(signature)))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
