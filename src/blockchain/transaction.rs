//! Transaction building, signing and broadcasting.
//!
//! # Responsibilities
//! - Build value transfers and token `transfer` calls
//! - Sign locally with the chain ID as replay protection domain
//! - Broadcast the raw bytes once (no retry, no nonce reuse handling)

use alloy::consensus::TxLegacy;
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxKind, U256};

use crate::blockchain::registry::ChainHandle;
use crate::blockchain::types::{BlockchainError, BlockchainResult, SubmittedTransaction};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Gas for a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Signs and broadcasts transactions from one wallet on one chain.
pub struct TransactionSubmitter<'a> {
    chain: &'a ChainHandle,
    wallet: &'a Wallet,
}

impl<'a> TransactionSubmitter<'a> {
    pub fn new(chain: &'a ChainHandle, wallet: &'a Wallet) -> Self {
        Self { chain, wallet }
    }

    /// Send `value` wei to `to`.
    pub async fn submit_native(&self, to: Address, value: U256) -> BlockchainResult<SubmittedTransaction> {
        self.submit(to, value, Bytes::new(), NATIVE_TRANSFER_GAS).await
    }

    /// Transfer `amount` token base units to `to` through the chain's token contract.
    pub async fn submit_token_transfer(
        &self,
        to: Address,
        amount: U256,
        gas_limit: u64,
    ) -> BlockchainResult<SubmittedTransaction> {
        let token = self.chain.descriptor.require_token()?;
        let data = token.encode_transfer(to, amount);
        self.submit(token.address(), U256::ZERO, data, gas_limit).await
    }

    /// Build, sign and broadcast a transaction.
    ///
    /// # Arguments
    /// * `to` - Destination address (recipient or contract)
    /// * `value` - Amount of native coin to send, in wei
    /// * `data` - Call data (empty for simple transfers)
    /// * `gas_limit` - Gas limit the transaction is signed with
    pub async fn submit(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        gas_limit: u64,
    ) -> BlockchainResult<SubmittedTransaction> {
        let descriptor = &self.chain.descriptor;
        let endpoint = self.chain.endpoint.as_ref();

        // Sign only for the chain the endpoint actually serves
        let remote_id = endpoint.chain_id().await?;
        if remote_id != descriptor.id {
            return Err(BlockchainError::Signing {
                chain: descriptor.name.clone(),
                message: format!(
                    "endpoint reports chain id {}, configured {}",
                    remote_id, descriptor.id
                ),
            });
        }

        let nonce = endpoint.transaction_count(self.wallet.address()).await?;

        // Get gas price
        let gas_price = endpoint.gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        // Check against max gas price
        if gas_price_gwei > descriptor.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: descriptor.max_gas_price_gwei,
            });
        }

        let adjusted_gas_price = (gas_price as f64 * descriptor.gas_price_multiplier) as u128;

        let tx = TxLegacy {
            chain_id: None,
            nonce,
            gas_price: adjusted_gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input: data,
        };

        let envelope = self
            .wallet
            .sign_legacy(tx, descriptor.id.0)
            .map_err(|e| BlockchainError::Signing {
                chain: descriptor.name.clone(),
                message: e.to_string(),
            })?;
        let tx_hash = *envelope.tx_hash();
        let raw = envelope.encoded_2718();

        let remote_hash = endpoint.send_raw_transaction(&raw).await?;
        if remote_hash != tx_hash {
            tracing::warn!(chain = %descriptor.name, local = %tx_hash, remote = %remote_hash, "Endpoint returned a different transaction hash");
        }

        metrics::record_transaction(&descriptor.name, "submitted");
        tracing::info!(
            chain = %descriptor.name,
            tx_hash = %tx_hash,
            to = %to,
            nonce,
            gas_limit,
            "Transaction broadcast"
        );

        Ok(SubmittedTransaction {
            tx_hash,
            gas_limit,
            to,
        })
    }
}
