//! Chain registry: name/id → descriptor + endpoint handle.

use alloy::primitives::{Address, TxHash};
use std::sync::Arc;

use crate::blockchain::client::{BlockchainClient, ChainEndpoint};
use crate::blockchain::token::TokenContract;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::config::{ChainConfig, WalletConfig};

/// Static description of one configured chain.
#[derive(Debug, Clone)]
pub struct ChainDescriptor {
    pub id: ChainId,
    pub name: String,
    pub token: Option<TokenContract>,
    pub explorer_url: Option<String>,
    pub gas_price_multiplier: f64,
    pub max_gas_price_gwei: u64,
}

impl ChainDescriptor {
    pub fn from_config(config: &ChainConfig) -> BlockchainResult<Self> {
        let token = match &config.token_address {
            Some(addr) => {
                let address: Address = addr.parse().map_err(|e| {
                    BlockchainError::Configuration(format!(
                        "Invalid token address '{}' for chain {}: {}",
                        addr, config.name, e
                    ))
                })?;
                Some(TokenContract::new(address))
            }
            None => None,
        };

        Ok(Self {
            id: ChainId(config.chain_id),
            name: config.name.clone(),
            token,
            explorer_url: config.explorer_url.clone(),
            gas_price_multiplier: config.gas_price_multiplier,
            max_gas_price_gwei: config.max_gas_price_gwei,
        })
    }

    /// The token contract, or a configuration error naming the chain.
    pub fn require_token(&self) -> BlockchainResult<TokenContract> {
        self.token.ok_or_else(|| {
            BlockchainError::Configuration(format!(
                "No token contract configured for chain {}",
                self.name
            ))
        })
    }

    pub fn address_url(&self, address: Address) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/address/{}", base.trim_end_matches('/'), address))
    }

    pub fn tx_url(&self, tx_hash: TxHash) -> Option<String> {
        self.explorer_url
            .as_ref()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}

/// A configured chain ready for queries.
#[derive(Clone)]
pub struct ChainHandle {
    pub descriptor: ChainDescriptor,
    pub endpoint: Arc<dyn ChainEndpoint>,
}

impl ChainHandle {
    pub fn new(descriptor: ChainDescriptor, endpoint: Arc<dyn ChainEndpoint>) -> Self {
        Self {
            descriptor,
            endpoint,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

impl std::fmt::Debug for ChainHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered set of configured chains.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: Vec<ChainHandle>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainHandle>) -> Self {
        Self { chains }
    }

    /// Build one JSON-RPC client per configured chain, preserving config order.
    pub fn from_config(config: &WalletConfig) -> BlockchainResult<Self> {
        let chains = config
            .chains
            .iter()
            .map(|chain| {
                let descriptor = ChainDescriptor::from_config(chain)?;
                let client = BlockchainClient::new(chain.clone())?;
                Ok(ChainHandle::new(descriptor, Arc::new(client)))
            })
            .collect::<BlockchainResult<Vec<_>>>()?;

        Ok(Self { chains })
    }

    /// All chains in configuration order.
    pub fn chains(&self) -> &[ChainHandle] {
        &self.chains
    }

    /// Look up a chain by name, or by numeric id given as a string.
    pub fn get(&self, name_or_id: &str) -> BlockchainResult<&ChainHandle> {
        let by_id = name_or_id.parse::<u64>().ok();
        self.chains
            .iter()
            .find(|c| c.descriptor.name == name_or_id || Some(c.descriptor.id.0) == by_id)
            .ok_or_else(|| {
                BlockchainError::Configuration(format!("Unknown chain '{}'", name_or_id))
            })
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_from_default_config() {
        let registry = ChainRegistry::from_config(&WalletConfig::default()).unwrap();
        let names: Vec<&str> = registry.chains().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["mainnet", "ropsten", "rinkeby", "kovan"]);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let registry = ChainRegistry::from_config(&WalletConfig::default()).unwrap();
        assert_eq!(registry.get("kovan").unwrap().descriptor.id, ChainId(42));
        assert_eq!(registry.get("3").unwrap().name(), "ropsten");
        assert!(matches!(
            registry.get("goerli"),
            Err(BlockchainError::Configuration(_))
        ));
    }

    #[test]
    fn test_require_token() {
        let registry = ChainRegistry::from_config(&WalletConfig::default()).unwrap();
        assert!(registry.get("mainnet").unwrap().descriptor.require_token().is_ok());

        let err = registry
            .get("kovan")
            .unwrap()
            .descriptor
            .require_token()
            .unwrap_err();
        assert!(err.to_string().contains("No token contract configured for chain kovan"));
    }

    #[test]
    fn test_explorer_links() {
        let mut config = ChainConfig::new("kovan", 42, "http://localhost:8545");
        config.explorer_url = Some("https://kovan.etherscan.io/".to_string());
        let descriptor = ChainDescriptor::from_config(&config).unwrap();

        let url = descriptor.address_url(Address::ZERO).unwrap();
        assert_eq!(
            url,
            "https://kovan.etherscan.io/address/0x0000000000000000000000000000000000000000"
        );
        assert!(descriptor.tx_url(TxHash::ZERO).unwrap().contains("/tx/0x"));
    }
}
