//! Submit-then-confirm transfers.

use alloy::primitives::{Address, U256};

use crate::blockchain::confirmation::ConfirmationWaiter;
use crate::blockchain::registry::ChainHandle;
use crate::blockchain::transaction::TransactionSubmitter;
use crate::blockchain::types::{BlockchainResult, ReceiptInfo};
use crate::blockchain::wallet::Wallet;

/// A transfer that was mined successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTransfer {
    pub to: Address,
    pub amount: U256,
    pub receipt: ReceiptInfo,
}

/// Sends native coin or tokens and waits for the receipt.
pub struct Transfers<'a> {
    chain: &'a ChainHandle,
    wallet: &'a Wallet,
    waiter: ConfirmationWaiter,
    token_gas_limit: u64,
}

impl<'a> Transfers<'a> {
    pub fn new(
        chain: &'a ChainHandle,
        wallet: &'a Wallet,
        waiter: ConfirmationWaiter,
        token_gas_limit: u64,
    ) -> Self {
        Self {
            chain,
            wallet,
            waiter,
            token_gas_limit,
        }
    }

    pub fn chain(&self) -> &ChainHandle {
        self.chain
    }

    pub fn wallet(&self) -> &Wallet {
        self.wallet
    }

    /// Send `value` wei to `to` and wait until it is mined.
    pub async fn send_native(&self, to: Address, value: U256) -> BlockchainResult<CompletedTransfer> {
        let submitted = TransactionSubmitter::new(self.chain, self.wallet)
            .submit_native(to, value)
            .await?;
        let receipt = self.waiter.wait_for_receipt(self.chain, &submitted).await?;
        Ok(CompletedTransfer {
            to,
            amount: value,
            receipt,
        })
    }

    /// Transfer `amount` token base units to `to` and wait until it is mined.
    pub async fn send_token(&self, to: Address, amount: U256) -> BlockchainResult<CompletedTransfer> {
        let submitted = TransactionSubmitter::new(self.chain, self.wallet)
            .submit_token_transfer(to, amount, self.token_gas_limit)
            .await?;
        let receipt = self.waiter.wait_for_receipt(self.chain, &submitted).await?;
        Ok(CompletedTransfer {
            to,
            amount,
            receipt,
        })
    }
}
