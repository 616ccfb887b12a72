//! Concurrent faucet requests with per-source failure isolation.

use alloy::primitives::Address;
use futures_util::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::{FaucetConfig, FaucetKind, FaucetMethod};
use crate::faucet::source::{FaucetError, FaucetSource, HttpFaucet, ManualFaucet};
use crate::observability::metrics;

/// Upper bound on a single source, on top of the source's own timeout.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Answer of one faucet source.
#[derive(Debug, Clone, PartialEq)]
pub struct FaucetResponse {
    pub source: String,
    pub outcome: Result<Value, String>,
}

impl FaucetResponse {
    /// The answer as JSON; failures become `{"error": "..."}`.
    pub fn payload(&self) -> Value {
        match &self.outcome {
            Ok(value) => value.clone(),
            Err(message) => serde_json::json!({ "error": message }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Answers of every matching source, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaucetResult {
    pub responses: Vec<FaucetResponse>,
}

/// Faucet catalogue built once from configuration.
pub struct FaucetAggregator {
    sources: Vec<Arc<dyn FaucetSource>>,
    source_timeout: Duration,
}

impl FaucetAggregator {
    pub fn new(sources: Vec<Arc<dyn FaucetSource>>) -> Self {
        Self {
            sources,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, source_timeout: Duration) -> Self {
        self.source_timeout = source_timeout;
        self
    }

    pub fn from_config(faucets: &[FaucetConfig]) -> Self {
        let client = reqwest::Client::new();
        let sources = faucets
            .iter()
            .map(|faucet| -> Arc<dyn FaucetSource> {
                match faucet.method {
                    FaucetMethod::Manual => Arc::new(ManualFaucet::new(
                        &faucet.name,
                        faucet.kind,
                        faucet.chain.clone(),
                        faucet.message.as_deref().unwrap_or_default(),
                    )),
                    FaucetMethod::Get | FaucetMethod::Post => {
                        Arc::new(HttpFaucet::new(faucet.clone(), client.clone()))
                    }
                }
            })
            .collect();
        Self::new(sources)
    }

    /// Sources serving `kind` on `chain`. Token faucets serve every chain.
    fn matching(&self, kind: FaucetKind, chain: &str) -> Vec<&Arc<dyn FaucetSource>> {
        self.sources
            .iter()
            .filter(|s| s.kind() == kind)
            .filter(|s| kind == FaucetKind::Token || s.chain() == Some(chain))
            .collect()
    }

    /// Ask every matching source for funds concurrently.
    ///
    /// Fails only when no source matches; individual source failures are
    /// returned in-band.
    pub async fn request_funds(
        &self,
        kind: FaucetKind,
        chain: &str,
        address: Address,
    ) -> Result<FaucetResult, FaucetError> {
        let sources = self.matching(kind, chain);
        if sources.is_empty() {
            return Err(FaucetError::NoSources {
                kind,
                chain: Some(chain.to_string()),
            });
        }

        tracing::info!(%kind, chain, sources = sources.len(), "Requesting faucets");

        let requests = sources.iter().map(|source| async move {
            let outcome = match timeout(self.source_timeout, source.request(chain, address)).await {
                Ok(result) => result,
                Err(_) => Err(FaucetError::Timeout(self.source_timeout.as_secs())),
            };

            metrics::record_faucet_response(source.name(), outcome.is_ok());
            if let Err(e) = &outcome {
                tracing::warn!(source = %source.name(), error = %e, "Faucet request failed");
            }

            FaucetResponse {
                source: source.name().to_string(),
                outcome: outcome.map_err(|e| e.to_string()),
            }
        });

        Ok(FaucetResult {
            responses: join_all(requests).await,
        })
    }
}

impl std::fmt::Debug for FaucetAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("FaucetAggregator")
            .field("sources", &names)
            .field("source_timeout", &self.source_timeout)
            .finish()
    }
}
