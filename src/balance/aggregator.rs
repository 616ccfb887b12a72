//! Concurrent balance queries across all configured chains.

use alloy::primitives::{Address, U256};
use futures_util::future::join_all;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::{BlockchainError, BlockchainResult, ChainHandle, ChainId};

/// Upper bound on any single balance query, on top of the client's own RPC timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Which balance a query was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Native,
    Token,
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token => write!(f, "token"),
        }
    }
}

/// Balances of one chain. Failed queries are reported as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub chain_name: String,
    pub chain_id: ChainId,
    /// Native balance in wei.
    pub native: U256,
    /// Token balance in base units; `None` when the chain has no token contract.
    pub token: Option<U256>,
}

/// A single failed query inside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub chain_name: String,
    pub asset: Asset,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceReport {
    /// One entry per chain, in the order the chains were given.
    pub entries: Vec<BalanceEntry>,
    pub failures: Vec<QueryFailure>,
}

impl BalanceReport {
    /// Entries of chains with a token contract.
    pub fn token_entries(&self) -> impl Iterator<Item = &BalanceEntry> {
        self.entries.iter().filter(|e| e.token.is_some())
    }
}

/// Scatter/gather balance queries over a fixed set of chains.
pub struct BalanceAggregator<'a> {
    chains: &'a [ChainHandle],
    query_timeout: Duration,
}

impl<'a> BalanceAggregator<'a> {
    pub fn new(chains: &'a [ChainHandle]) -> Self {
        Self {
            chains,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Query native and token balances of `address` on every chain.
    ///
    /// Never fails: each failed query contributes a zero balance and a
    /// [`QueryFailure`].
    pub async fn aggregate(&self, address: Address) -> BalanceReport {
        let native_queries = self.chains.iter().map(|chain| {
            self.bounded(chain, chain.endpoint.native_balance(address))
        });
        let token_queries = self.chains.iter().map(|chain| async move {
            match chain.descriptor.token {
                Some(token) => Some(
                    self.bounded(chain, token.balance_of(chain.endpoint.as_ref(), address))
                        .await,
                ),
                None => None,
            }
        });

        // join_all keeps input order, so slot i always belongs to chain i
        let (native_results, token_results) =
            tokio::join!(join_all(native_queries), join_all(token_queries));

        let mut report = BalanceReport::default();
        for ((chain, native), token) in self
            .chains
            .iter()
            .zip(native_results)
            .zip(token_results)
        {
            let native = match native {
                Ok(balance) => balance,
                Err(e) => {
                    report.record_failure(chain, Asset::Native, &e);
                    U256::ZERO
                }
            };
            let token = token.map(|result| match result {
                Ok(balance) => balance,
                Err(e) => {
                    report.record_failure(chain, Asset::Token, &e);
                    U256::ZERO
                }
            });

            report.entries.push(BalanceEntry {
                chain_name: chain.name().to_string(),
                chain_id: chain.descriptor.id,
                native,
                token,
            });
        }

        report
    }

    async fn bounded<F>(&self, chain: &ChainHandle, query: F) -> BlockchainResult<U256>
    where
        F: Future<Output = BlockchainResult<U256>>,
    {
        match timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(BlockchainError::Timeout {
                chain: chain.name().to_string(),
                secs: self.query_timeout.as_secs(),
            }),
        }
    }
}

impl BalanceReport {
    fn record_failure(&mut self, chain: &ChainHandle, asset: Asset, error: &BlockchainError) {
        tracing::debug!(chain = %chain.name(), %asset, error = %error, "Balance query failed");
        self.failures.push(QueryFailure {
            chain_name: chain.name().to_string(),
            asset,
            error: error.to_string(),
        });
    }
}

/// Native balance of `address` on one chain.
pub async fn native_balance(chain: &ChainHandle, address: Address) -> BlockchainResult<U256> {
    chain.endpoint.native_balance(address).await
}

/// Token balance of `address` on one chain; configuration error without a token contract.
pub async fn token_balance(chain: &ChainHandle, address: Address) -> BlockchainResult<U256> {
    let token = chain.descriptor.require_token()?;
    token.balance_of(chain.endpoint.as_ref(), address).await
}
