//! The wallet operations behind each CLI subcommand.

use alloy::primitives::{Address, U256};
use std::path::PathBuf;

use crate::balance::{BalanceAggregator, BalanceReport};
use crate::blockchain::units::{format_amount, format_native, parse_amount, parse_native};
use crate::blockchain::{
    BlockchainError, ChainHandle, ChainRegistry, CompletedTransfer, ConfirmationWaiter, Transfers,
    Wallet,
};
use crate::commands::error::{CommandError, CommandResult};
use crate::config::{FaucetKind, WalletConfig};
use crate::faucet::{FaucetAggregator, FaucetResult};
use crate::keystore::{Confirm, Keystore};
use crate::sweep::{SweepOrchestrator, SweepReport};

/// A destination as given by the user and as resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub label: String,
    pub address: Address,
}

/// Wallet identity plus balances on every chain.
#[derive(Debug, Clone)]
pub struct WalletOverview {
    pub wallet: Wallet,
    pub balances: BalanceReport,
}

/// Application service: one method per command.
pub struct WalletCommands {
    config: WalletConfig,
    registry: ChainRegistry,
    keystore: Keystore,
    faucets: FaucetAggregator,
    confirm: Box<dyn Confirm>,
}

impl WalletCommands {
    pub fn new(
        config: WalletConfig,
        registry: ChainRegistry,
        keystore: Keystore,
        faucets: FaucetAggregator,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Self {
            config,
            registry,
            keystore,
            faucets,
            confirm,
        }
    }

    /// Wire JSON-RPC clients, the wallet file and the faucet catalogue from config.
    pub fn from_config(config: WalletConfig, confirm: Box<dyn Confirm>) -> CommandResult<Self> {
        let registry = ChainRegistry::from_config(&config)?;
        let keystore = Keystore::new(PathBuf::from(&config.wallet_file));
        let faucets = FaucetAggregator::from_config(&config.faucets);
        Ok(Self::new(config, registry, keystore, faucets, confirm))
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Generate a new wallet and persist it.
    pub async fn create(&self) -> CommandResult<Wallet> {
        Ok(self.keystore.create(self.confirm.as_ref()).await?)
    }

    async fn load_wallet(&self) -> CommandResult<Wallet> {
        Ok(self.keystore.load(self.confirm.as_ref()).await?)
    }

    /// Wallet identity and balances across every configured chain.
    pub async fn show(&self) -> CommandResult<WalletOverview> {
        let wallet = self.load_wallet().await?;
        let balances = BalanceAggregator::new(self.registry.chains())
            .aggregate(wallet.address())
            .await;
        Ok(WalletOverview { wallet, balances })
    }

    /// Ask the native-coin faucets of `chain` for funds.
    pub async fn get_native(&self, chain: &str) -> CommandResult<FaucetResult> {
        self.request_faucets(FaucetKind::Native, chain).await
    }

    /// Ask the token faucets for funds on `chain`.
    pub async fn get_token(&self, chain: &str) -> CommandResult<FaucetResult> {
        self.request_faucets(FaucetKind::Token, chain).await
    }

    async fn request_faucets(&self, kind: FaucetKind, chain: &str) -> CommandResult<FaucetResult> {
        let wallet = self.load_wallet().await?;
        let chain = self.registry.get(chain)?;
        Ok(self
            .faucets
            .request_funds(kind, chain.name(), wallet.address())
            .await?)
    }

    /// Send `amount` native coin (display units) and wait for the receipt.
    pub async fn send_native(
        &self,
        chain: &str,
        amount: &str,
        to: Option<&str>,
    ) -> CommandResult<CompletedTransfer> {
        let wallet = self.load_wallet().await?;
        let chain = self.registry.get(chain)?;
        let destination = self.resolve_destination(to)?;
        let value = parse_native(amount)?;

        self.ask(&format!(
            "Do you want to send {} {} ETH to {}",
            format_native(value),
            chain.name(),
            destination.label
        ))
        .await?;

        Ok(self
            .transfers(chain, &wallet)
            .send_native(destination.address, value)
            .await?)
    }

    /// Send `amount` tokens (display units) and wait for the receipt.
    pub async fn send_token(
        &self,
        chain: &str,
        amount: &str,
        to: Option<&str>,
    ) -> CommandResult<CompletedTransfer> {
        let wallet = self.load_wallet().await?;
        let chain = self.registry.get(chain)?;
        chain.descriptor.require_token()?;
        let destination = self.resolve_destination(to)?;
        let value = parse_amount(amount, self.config.token.decimals)?;

        self.ask(&format!(
            "Do you want to send {} {} {} to {}",
            format_amount(value, self.config.token.decimals),
            chain.name(),
            self.config.token.symbol,
            destination.label
        ))
        .await?;

        Ok(self
            .transfers(chain, &wallet)
            .send_token(destination.address, value)
            .await?)
    }

    /// Move all tokens and all native coin above the reserve to `to`.
    pub async fn sweep(&self, chain: &str, to: Option<&str>) -> CommandResult<SweepReport> {
        let wallet = self.load_wallet().await?;
        let chain = self.registry.get(chain)?;
        chain.descriptor.require_token()?;
        let destination = self.resolve_destination(to)?;
        let reserve = self.sweep_reserve()?;

        self.ask(&format!(
            "Do you want to sweep all {} funds to {}",
            chain.name(),
            destination.label
        ))
        .await?;

        let orchestrator = SweepOrchestrator::new(self.transfers(chain, &wallet), reserve);
        Ok(orchestrator.sweep(destination.address).await?)
    }

    /// Resolve a hex address or a named destination; `None` means the default name.
    pub fn resolve_destination(&self, to: Option<&str>) -> CommandResult<Destination> {
        let label = to.unwrap_or(&self.config.transactions.default_destination);

        if let Ok(address) = label.parse::<Address>() {
            return Ok(Destination {
                label: label.to_string(),
                address,
            });
        }

        let configured = self.config.destinations.get(label).ok_or_else(|| {
            BlockchainError::Configuration(format!(
                "Unknown destination '{}': pass an address or add it under [destinations]",
                label
            ))
        })?;
        let address = configured.parse::<Address>().map_err(|e| {
            BlockchainError::Configuration(format!(
                "Invalid address for destination '{}': {}",
                label, e
            ))
        })?;

        Ok(Destination {
            label: label.to_string(),
            address,
        })
    }

    fn sweep_reserve(&self) -> CommandResult<U256> {
        Ok(parse_native(&self.config.transactions.sweep_reserve)?)
    }

    fn transfers<'a>(&'a self, chain: &'a ChainHandle, wallet: &'a Wallet) -> Transfers<'a> {
        Transfers::new(
            chain,
            wallet,
            ConfirmationWaiter::from_config(&self.config.transactions),
            self.config.token.transfer_gas_limit,
        )
    }

    async fn ask(&self, message: &str) -> CommandResult<()> {
        if self.confirm.confirm(message).await? {
            Ok(())
        } else {
            Err(CommandError::UserAborted("Transfer aborted by user.".to_string()))
        }
    }
}
