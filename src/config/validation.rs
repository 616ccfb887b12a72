//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (native faucets reference existing chains)
//! - Validate value ranges (timeouts > 0, poll attempts > 0)
//! - Detect duplicate chain names and ids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use alloy::primitives::Address;

use crate::blockchain::units::parse_native;
use crate::config::schema::{FaucetKind, FaucetMethod, WalletConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `chains[kovan].rpc_url`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.wallet_file.trim().is_empty() {
        errors.push(ValidationError::new("wallet_file", "must not be empty"));
    }

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for chain in &config.chains {
        let field = format!("chains[{}]", chain.name);

        if chain.name.trim().is_empty() {
            errors.push(ValidationError::new("chains", "chain name must not be empty"));
        }
        if !names.insert(chain.name.as_str()) {
            errors.push(ValidationError::new(&field, "duplicate chain name"));
        }
        if !ids.insert(chain.chain_id) {
            errors.push(ValidationError::new(
                format!("{}.chain_id", field),
                format!("duplicate chain id {}", chain.chain_id),
            ));
        }
        for url in std::iter::once(&chain.rpc_url).chain(chain.failover_urls.iter()) {
            if url.parse::<url::Url>().is_err() {
                errors.push(ValidationError::new(
                    format!("{}.rpc_url", field),
                    format!("invalid URL '{}'", url),
                ));
            }
        }
        if let Some(token) = &chain.token_address {
            if token.parse::<Address>().is_err() {
                errors.push(ValidationError::new(
                    format!("{}.token_address", field),
                    format!("invalid address '{}'", token),
                ));
            }
        }
        if chain.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new(
                format!("{}.rpc_timeout_secs", field),
                "must be greater than 0",
            ));
        }
        if !(chain.gas_price_multiplier.is_finite() && chain.gas_price_multiplier > 0.0) {
            errors.push(ValidationError::new(
                format!("{}.gas_price_multiplier", field),
                "must be a positive number",
            ));
        }
    }

    for faucet in &config.faucets {
        let field = format!("faucets[{}]", faucet.name);

        match faucet.method {
            FaucetMethod::Manual => {
                if faucet.message.is_none() {
                    errors.push(ValidationError::new(&field, "manual faucet requires a message"));
                }
            }
            FaucetMethod::Get | FaucetMethod::Post => match &faucet.url {
                Some(url) => {
                    // Placeholders are not valid URL characters in every position
                    let rendered = url.replace("{address}", "0x0").replace("{chain}", "chain");
                    if rendered.parse::<url::Url>().is_err() {
                        errors.push(ValidationError::new(
                            format!("{}.url", field),
                            format!("invalid URL '{}'", url),
                        ));
                    }
                }
                None => errors.push(ValidationError::new(&field, "HTTP faucet requires a url")),
            },
        }

        if faucet.kind == FaucetKind::Native {
            match &faucet.chain {
                Some(chain) if config.chain(chain).is_none() => {
                    errors.push(ValidationError::new(
                        format!("{}.chain", field),
                        format!("unknown chain '{}'", chain),
                    ));
                }
                Some(_) => {}
                None => errors.push(ValidationError::new(
                    &field,
                    "native faucet requires a chain",
                )),
            }
        }

        if faucet.timeout_secs == 0 {
            errors.push(ValidationError::new(
                format!("{}.timeout_secs", field),
                "must be greater than 0",
            ));
        }
    }

    for (name, address) in &config.destinations {
        if address.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                format!("destinations.{}", name),
                format!("invalid address '{}'", address),
            ));
        }
    }

    let tx = &config.transactions;
    if tx.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "transactions.poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if tx.max_poll_attempts == 0 {
        errors.push(ValidationError::new(
            "transactions.max_poll_attempts",
            "must be greater than 0",
        ));
    }
    if let Err(e) = parse_native(&tx.sweep_reserve) {
        errors.push(ValidationError::new("transactions.sweep_reserve", e.to_string()));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
