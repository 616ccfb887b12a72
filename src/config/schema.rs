//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the wallet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path of the persisted wallet document.
    pub wallet_file: String,

    /// Chain definitions, in display order.
    pub chains: Vec<ChainConfig>,

    /// Token contract settings shared by every chain.
    pub token: TokenConfig,

    /// Known faucet sources.
    pub faucets: Vec<FaucetConfig>,

    /// Named destinations (name -> hex address).
    ///
    /// Empty by default: commands run without an explicit `to` resolve
    /// `transactions.default_destination` ("iexec") here and fail until it is added.
    pub destinations: BTreeMap<String, String>,

    /// Transaction submission and confirmation settings.
    pub transactions: TransactionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            wallet_file: "wallet.json".to_string(),
            chains: default_chains(),
            token: TokenConfig::default(),
            faucets: default_faucets(),
            destinations: BTreeMap::new(),
            transactions: TransactionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl WalletConfig {
    /// Look up a chain by name.
    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    /// Drop native faucets whose chain is not configured. Returns the dropped names.
    ///
    /// Applied to the built-in catalogue when a file declares its own chains
    /// but no faucets.
    pub fn retain_reachable_faucets(&mut self) -> Vec<String> {
        let known: Vec<String> = self.chains.iter().map(|c| c.name.clone()).collect();
        let mut dropped = Vec::new();
        self.faucets.retain(|faucet| {
            let reachable = match (&faucet.kind, &faucet.chain) {
                (FaucetKind::Native, Some(chain)) => known.contains(chain),
                _ => true,
            };
            if !reachable {
                dropped.push(faucet.name.clone());
            }
            reachable
        });
        dropped
    }
}

/// A single EVM network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Chain name used on the command line (e.g. "kovan").
    pub name: String,

    /// Chain ID (EIP-155 replay protection domain).
    pub chain_id: u64,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Address of the token contract deployed on this chain.
    ///
    /// Only mainnet ships with one. Token sends and sweeps on any other chain
    /// need it set here.
    #[serde(default)]
    pub token_address: Option<String>,

    /// Block explorer base URL (e.g. "https://kovan.etherscan.io").
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// RPC request timeout in seconds.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Gas price multiplier (1.0 = node price, 1.2 = 20% buffer).
    #[serde(default = "default_gas_price_multiplier")]
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    #[serde(default = "default_max_gas_price_gwei")]
    pub max_gas_price_gwei: u64,
}

fn default_rpc_timeout_secs() -> u64 {
    10
}

fn default_gas_price_multiplier() -> f64 {
    1.0
}

fn default_max_gas_price_gwei() -> u64 {
    500
}

impl ChainConfig {
    /// Minimal chain definition with default RPC policy.
    pub fn new(name: &str, chain_id: u64, rpc_url: &str) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            rpc_url: rpc_url.to_string(),
            failover_urls: Vec::new(),
            token_address: None,
            explorer_url: None,
            rpc_timeout_secs: default_rpc_timeout_secs(),
            gas_price_multiplier: default_gas_price_multiplier(),
            max_gas_price_gwei: default_max_gas_price_gwei(),
        }
    }
}

fn default_chains() -> Vec<ChainConfig> {
    let mut mainnet = ChainConfig::new("mainnet", 1, "https://mainnet.infura.io");
    mainnet.token_address = Some("0x607F4C5BB672230e8672085532f7e901544a7375".to_string());
    mainnet.explorer_url = Some("https://etherscan.io".to_string());

    let mut ropsten = ChainConfig::new("ropsten", 3, "https://ropsten.infura.io");
    ropsten.explorer_url = Some("https://ropsten.etherscan.io".to_string());

    let mut rinkeby = ChainConfig::new("rinkeby", 4, "https://rinkeby.infura.io");
    rinkeby.explorer_url = Some("https://rinkeby.etherscan.io".to_string());

    let mut kovan = ChainConfig::new("kovan", 42, "https://kovan.infura.io");
    kovan.explorer_url = Some("https://kovan.etherscan.io".to_string());

    vec![mainnet, ropsten, rinkeby, kovan]
}

/// Token contract settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Display symbol.
    pub symbol: String,

    /// Number of decimals between the display unit and the smallest unit.
    pub decimals: u8,

    /// Gas limit used for `transfer` calls.
    pub transfer_gas_limit: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: "RLC".to_string(),
            decimals: 9,
            transfer_gas_limit: 100_000,
        }
    }
}

/// What a faucet hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaucetKind {
    Native,
    Token,
}

impl std::fmt::Display for FaucetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaucetKind::Native => write!(f, "native"),
            FaucetKind::Token => write!(f, "token"),
        }
    }
}

/// How a faucet is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaucetMethod {
    /// HTTP GET on the templated URL.
    Get,
    /// HTTP POST of the templated JSON body.
    Post,
    /// No request; the configured message is returned as is.
    Manual,
}

/// A faucet source.
///
/// `url` and `body` may contain `{address}` and `{chain}` placeholders.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FaucetConfig {
    /// Source name shown in results.
    pub name: String,

    pub kind: FaucetKind,

    /// Chain served by a native faucet. Token faucets take the chain as a parameter.
    #[serde(default)]
    pub chain: Option<String>,

    pub method: FaucetMethod,

    #[serde(default)]
    pub url: Option<String>,

    /// JSON body template for POST faucets.
    #[serde(default)]
    pub body: Option<String>,

    /// Message returned by manual faucets.
    #[serde(default)]
    pub message: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_faucet_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_faucet_timeout_secs() -> u64 {
    15
}

fn default_faucets() -> Vec<FaucetConfig> {
    vec![
        FaucetConfig {
            name: "faucet.ropsten.be".to_string(),
            kind: FaucetKind::Native,
            chain: Some("ropsten".to_string()),
            method: FaucetMethod::Get,
            url: Some("http://faucet.ropsten.be:3001/donate/{address}".to_string()),
            body: None,
            message: None,
            timeout_secs: default_faucet_timeout_secs(),
        },
        FaucetConfig {
            name: "ropsten.faucet.b9lab.com".to_string(),
            kind: FaucetKind::Native,
            chain: Some("ropsten".to_string()),
            method: FaucetMethod::Post,
            url: Some("https://ropsten.faucet.b9lab.com/tap".to_string()),
            body: Some(r#"{"toWhom":"{address}"}"#.to_string()),
            message: None,
            timeout_secs: default_faucet_timeout_secs(),
        },
        FaucetConfig {
            name: "faucet.rinkeby.io".to_string(),
            kind: FaucetKind::Native,
            chain: Some("rinkeby".to_string()),
            method: FaucetMethod::Manual,
            url: None,
            body: None,
            message: Some("Go to https://faucet.rinkeby.io/ to manually ask for ETH".to_string()),
            timeout_secs: default_faucet_timeout_secs(),
        },
        FaucetConfig {
            name: "gitter.im/kovan-testnet/faucet".to_string(),
            kind: FaucetKind::Native,
            chain: Some("kovan".to_string()),
            method: FaucetMethod::Manual,
            url: None,
            body: None,
            message: Some(
                "Go to https://gitter.im/kovan-testnet/faucet to manually ask for ETH".to_string(),
            ),
            timeout_secs: default_faucet_timeout_secs(),
        },
        FaucetConfig {
            name: "faucet.iex.ec".to_string(),
            kind: FaucetKind::Token,
            chain: None,
            method: FaucetMethod::Get,
            url: Some(
                "https://api.faucet.iex.ec/getRLC?chainName={chain}&address={address}".to_string(),
            ),
            body: None,
            message: None,
            timeout_secs: default_faucet_timeout_secs(),
        },
    ]
}

/// Transaction submission and confirmation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum number of receipt polls before giving up.
    pub max_poll_attempts: u32,

    /// Native amount (display units) kept back by a sweep to pay a later fee.
    pub sweep_reserve: String,

    /// Name of the destination used when none is given.
    pub default_destination: String,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            max_poll_attempts: 150,
            sweep_reserve: "0.01".to_string(),
            default_destination: "iexec".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
