//! Faucet sources: HTTP endpoints and manual instructions.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::{FaucetConfig, FaucetKind, FaucetMethod};

#[derive(Debug, Error)]
pub enum FaucetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("faucet answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid faucet configuration: {0}")]
    Config(String),

    #[error("faucet did not answer within {0} seconds")]
    Timeout(u64),

    /// Nothing in the catalogue serves this request.
    #[error("no {kind} faucet configured{}", chain_suffix(.chain))]
    NoSources {
        kind: FaucetKind,
        chain: Option<String>,
    },
}

fn chain_suffix(chain: &Option<String>) -> String {
    chain
        .as_ref()
        .map(|c| format!(" for chain {}", c))
        .unwrap_or_default()
}

/// A place that hands out funds.
#[async_trait]
pub trait FaucetSource: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> FaucetKind;

    /// Chain served, for native faucets.
    fn chain(&self) -> Option<&str>;

    /// Ask for funds for `address` on `chain`; returns the faucet's JSON answer.
    async fn request(&self, chain: &str, address: Address) -> Result<Value, FaucetError>;
}

/// Substitute `{address}` and `{chain}` placeholders.
pub fn render_template(template: &str, chain: &str, address: Address) -> String {
    template
        .replace("{address}", &address.to_string())
        .replace("{chain}", chain)
}

/// Faucet reached over HTTP GET or POST.
pub struct HttpFaucet {
    config: FaucetConfig,
    client: reqwest::Client,
}

impl HttpFaucet {
    pub fn new(config: FaucetConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl FaucetSource for HttpFaucet {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> FaucetKind {
        self.config.kind
    }

    fn chain(&self) -> Option<&str> {
        self.config.chain.as_deref()
    }

    async fn request(&self, chain: &str, address: Address) -> Result<Value, FaucetError> {
        let url_template = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| FaucetError::Config(format!("{} has no url", self.config.name)))?;
        let url = render_template(url_template, chain, address);
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let request = match self.config.method {
            FaucetMethod::Get => self.client.get(&url),
            FaucetMethod::Post => {
                let body = match &self.config.body {
                    Some(template) => serde_json::from_str::<Value>(&render_template(
                        template, chain, address,
                    ))
                    .map_err(|e| FaucetError::Config(format!("body is not JSON: {}", e)))?,
                    None => Value::Object(Default::default()),
                };
                self.client.post(&url).json(&body)
            }
            FaucetMethod::Manual => {
                return Err(FaucetError::Config(format!(
                    "{} is a manual faucet",
                    self.config.name
                )))
            }
        };

        tracing::debug!(source = %self.config.name, url = %url, "Requesting faucet");
        let response = request
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FaucetError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Faucet that cannot be called; answers with instructions.
pub struct ManualFaucet {
    name: String,
    kind: FaucetKind,
    chain: Option<String>,
    message: String,
}

impl ManualFaucet {
    pub fn new(name: &str, kind: FaucetKind, chain: Option<String>, message: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            chain,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl FaucetSource for ManualFaucet {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FaucetKind {
        self.kind
    }

    fn chain(&self) -> Option<&str> {
        self.chain.as_deref()
    }

    async fn request(&self, _chain: &str, _address: Address) -> Result<Value, FaucetError> {
        Ok(serde_json::json!({ "message": self.message }))
    }
}
