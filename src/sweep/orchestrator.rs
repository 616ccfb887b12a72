//! Token-then-native sweep of a wallet on one chain.

use alloy::primitives::{Address, U256};

use crate::balance::{native_balance, token_balance};
use crate::blockchain::{BlockchainResult, CompletedTransfer, Transfers};

/// What a sweep actually moved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub token_transfer: Option<CompletedTransfer>,
    pub native_transfer: Option<CompletedTransfer>,
}

impl SweepReport {
    pub fn transfer_count(&self) -> usize {
        self.token_transfer.is_some() as usize + self.native_transfer.is_some() as usize
    }
}

/// Drains token balance, then native balance minus a fee reserve.
///
/// Steps run strictly in order: the token transfer is paid for in native
/// coin, so the native balance is only read once the token step is done.
pub struct SweepOrchestrator<'a> {
    transfers: Transfers<'a>,
    /// Native amount (wei) left behind for a future fee.
    reserve: U256,
}

impl<'a> SweepOrchestrator<'a> {
    pub fn new(transfers: Transfers<'a>, reserve: U256) -> Self {
        Self { transfers, reserve }
    }

    /// Sweep everything to `destination`, stopping at the first failure.
    ///
    /// A failure in the native step leaves an already mined token transfer in
    /// place; nothing is rolled back.
    pub async fn sweep(&self, destination: Address) -> BlockchainResult<SweepReport> {
        let chain = self.transfers.chain();
        let owner = self.transfers.wallet().address();
        let mut report = SweepReport::default();

        // 1. Token balance, all of it
        let tokens = token_balance(chain, owner).await?;
        tracing::debug!(chain = %chain.name(), balance = %tokens, "Token balance");
        if tokens > U256::ZERO {
            let transfer = self.transfers.send_token(destination, tokens).await?;
            tracing::info!(chain = %chain.name(), amount = %tokens, tx_hash = %transfer.receipt.transaction_hash, "Token balance swept");
            report.token_transfer = Some(transfer);
        }

        // 2. Native balance above the reserve
        let native = native_balance(chain, owner).await?;
        tracing::debug!(chain = %chain.name(), balance = %native, reserve = %self.reserve, "Native balance");
        if native > self.reserve {
            let sweepable = native - self.reserve;
            let transfer = self.transfers.send_native(destination, sweepable).await?;
            tracing::info!(chain = %chain.name(), amount = %sweepable, tx_hash = %transfer.receipt.transaction_hash, "Native balance swept");
            report.native_transfer = Some(transfer);
        }

        Ok(report)
    }
}
