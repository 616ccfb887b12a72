//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain state (balances, nonces, gas price, receipts, eth_call)
//! - Broadcast signed raw transactions (primary only, never retried)
//! - Handle timeouts and network errors gracefully

use alloy::consensus::{Eip658Value, TxReceipt};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, ReceiptInfo};
use crate::config::ChainConfig;
use crate::observability::metrics;

/// The operations the wallet needs from a chain endpoint.
///
/// Implemented over JSON-RPC by [`BlockchainClient`]; tests substitute an
/// in-memory chain.
#[async_trait]
pub trait ChainEndpoint: Send + Sync {
    /// Chain name, used to label errors and logs.
    fn name(&self) -> &str;

    async fn chain_id(&self) -> BlockchainResult<ChainId>;

    async fn native_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Pending transaction count (next nonce).
    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Read-only contract call.
    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes>;

    /// Submit signed raw transaction bytes.
    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash>;

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptInfo>>;
}

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; an unreachable endpoint only surfaces when
    /// it is first queried.
    pub fn new(config: ChainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Configuration(format!(
                "Invalid RPC URL '{}' for chain {}: {}",
                config.rpc_url, config.name, e
            ))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(chain = %config.name, url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::debug!(
            chain = %config.name,
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Run a read request against each provider in turn until one answers.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, request: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let start = Instant::now();
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, request(provider.clone())).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_call(&self.config.name, method, true, start);
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    tracing::warn!(chain = %self.config.name, method, provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(chain = %self.config.name, method, provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        metrics::record_rpc_call(&self.config.name, method, false, start);
        Err(BlockchainError::Rpc {
            chain: self.config.name.clone(),
            message: format!("All RPC providers failed for {}", method),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

#[async_trait]
impl ChainEndpoint for BlockchainClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    async fn native_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.with_failover("eth_getBalance", |p| async move { p.get_balance(address).await })
            .await
    }

    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.with_failover("eth_getTransactionCount", |p| async move {
            p.get_transaction_count(address).pending().await
        })
        .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.with_failover("eth_gasPrice", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let request = TransactionRequest::default()
                .with_to(to)
                .with_input(data.clone());
            async move { p.call(request).await }
        })
        .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        let start = Instant::now();
        let provider = &self.providers[0];

        let result = timeout(self.timeout_duration, provider.send_raw_transaction(raw)).await;
        let outcome = match result {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(BlockchainError::Broadcast {
                chain: self.config.name.clone(),
                message: e.to_string(),
            }),
            // The node may still have accepted it; never resend here
            Err(_) => Err(BlockchainError::Broadcast {
                chain: self.config.name.clone(),
                message: format!(
                    "no answer within {}s, transaction state unknown",
                    self.config.rpc_timeout_secs
                ),
            }),
        };
        metrics::record_rpc_call(
            &self.config.name,
            "eth_sendRawTransaction",
            outcome.is_ok(),
            start,
        );
        outcome
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptInfo>> {
        let receipt = self
            .with_failover("eth_getTransactionReceipt", |p| async move {
                p.get_transaction_receipt(tx_hash).await
            })
            .await?;
        Ok(receipt.map(|r| receipt_info(&r)))
    }
}

fn receipt_info(receipt: &TransactionReceipt) -> ReceiptInfo {
    let status = match receipt.inner.status_or_post_state() {
        Eip658Value::Eip658(success) => Some(success),
        Eip658Value::PostState(_) => None,
    };

    ReceiptInfo {
        transaction_hash: receipt.transaction_hash,
        gas_used: receipt.gas_used,
        block_number: receipt.block_number,
        status,
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("chain", &self.config.name)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
