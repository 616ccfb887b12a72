//! Typed binding to the per-chain token contract.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::ChainEndpoint;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Subset of the ERC-20 interface used by the wallet.
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Token contract deployed at a fixed address on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContract {
    address: Address,
}

impl TokenContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Call data for `transfer(to, amount)`.
    pub fn encode_transfer(&self, to: Address, amount: U256) -> Bytes {
        IERC20::transferCall { to, amount }.abi_encode().into()
    }

    /// Query `balanceOf(holder)` through an `eth_call`.
    pub async fn balance_of(
        &self,
        endpoint: &dyn ChainEndpoint,
        holder: Address,
    ) -> BlockchainResult<U256> {
        let data: Bytes = IERC20::balanceOfCall { account: holder }.abi_encode().into();
        let raw = endpoint.call(self.address, data).await?;

        IERC20::balanceOfCall::abi_decode_returns(&raw).map_err(|e| BlockchainError::Rpc {
            chain: endpoint.name().to_string(),
            message: format!("Malformed balanceOf response from {}: {}", self.address, e),
        })
    }
}
