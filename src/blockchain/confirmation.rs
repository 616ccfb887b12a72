//! Receipt polling and success classification.

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::registry::ChainHandle;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ReceiptInfo, SubmittedTransaction};
use crate::config::schema::TransactionConfig;
use crate::observability::metrics;

/// Polls for a transaction receipt at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationWaiter {
    poll_interval: Duration,
    max_attempts: u32,
}

impl ConfirmationWaiter {
    pub fn new(poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &TransactionConfig) -> Self {
        Self::new(
            Duration::from_millis(config.poll_interval_ms),
            config.max_poll_attempts,
        )
    }

    /// Wait until `submitted` is mined and check that it succeeded.
    ///
    /// An RPC error while polling consumes an attempt but does not abort the
    /// wait; only the attempt budget does.
    pub async fn wait_for_receipt(
        &self,
        chain: &ChainHandle,
        submitted: &SubmittedTransaction,
    ) -> BlockchainResult<ReceiptInfo> {
        let tx_hash = submitted.tx_hash;
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for attempt in 1..=self.max_attempts {
            ticker.tick().await;

            match chain.endpoint.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    tracing::debug!(
                        chain = %chain.name(),
                        tx_hash = %tx_hash,
                        gas_used = receipt.gas_used,
                        block_number = ?receipt.block_number,
                        attempt,
                        "Receipt found"
                    );
                    return match check_receipt(&receipt, submitted.gas_limit) {
                        Ok(()) => {
                            metrics::record_transaction(chain.name(), "confirmed");
                            Ok(receipt)
                        }
                        Err(reason) => {
                            metrics::record_transaction(chain.name(), "failed");
                            Err(BlockchainError::TransactionFailed {
                                chain: chain.name().to_string(),
                                tx_hash,
                                reason,
                            })
                        }
                    };
                }
                Ok(None) => {
                    tracing::debug!(chain = %chain.name(), tx_hash = %tx_hash, attempt, "Transaction pending");
                }
                Err(e) => {
                    tracing::warn!(chain = %chain.name(), tx_hash = %tx_hash, attempt, error = %e, "Receipt query failed");
                }
            }
        }

        metrics::record_transaction(chain.name(), "timeout");
        Err(BlockchainError::ConfirmationTimeout {
            chain: chain.name().to_string(),
            tx_hash,
            attempts: self.max_attempts,
        })
    }
}

/// Classify a mined receipt.
///
/// An explicit EIP-658 status wins. Receipts without one are failed when the
/// whole gas limit was consumed.
pub fn check_receipt(receipt: &ReceiptInfo, gas_limit: u64) -> Result<(), String> {
    match receipt.status {
        Some(true) => Ok(()),
        Some(false) => Err("execution reverted".to_string()),
        None if receipt.gas_used >= gas_limit => Err(format!(
            "all {} gas consumed, execution assumed reverted",
            gas_limit
        )),
        None => Ok(()),
    }
}
