use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use multichain_wallet::blockchain::units::NATIVE_DECIMALS;
use multichain_wallet::commands::render;
use multichain_wallet::commands::{CommandError, WalletCommands};
use multichain_wallet::config::{load_config, load_or_default, ConfigError, WalletConfig};
use multichain_wallet::keystore::{AutoConfirm, Confirm, TerminalConfirm};
use multichain_wallet::observability::{logging, metrics};

const DEFAULT_CONFIG: &str = "wallet.toml";

#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "One key, many EVM chains: balances, faucets, transfers", long_about = None)]
struct Cli {
    /// Config file; defaults to ./wallet.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new wallet file
    Create,
    /// Show address and balances on every chain
    Show,
    /// Ask ETH faucets for funds
    GetEth { chain: String },
    /// Ask RLC faucets for funds
    GetRlc { chain: String },
    /// Send ETH
    SendEth {
        chain: String,
        amount: String,
        /// Address or configured destination name
        to: Option<String>,
    },
    /// Send RLC
    SendRlc {
        chain: String,
        amount: String,
        to: Option<String>,
    },
    /// Send all RLC, then all ETH above the fee reserve
    Sweep { chain: String, to: Option<String> },
}

fn read_config(path: Option<&Path>) -> Result<WalletConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => load_or_default(Path::new(DEFAULT_CONFIG)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let logs = logging::init_logging(cli.verbose);
    let config = read_config(cli.config.as_deref())?;
    if let Some(logs) = &logs {
        logs.set_level(&config.observability.log_level, cli.verbose);
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AutoConfirm::yes())
    } else {
        Box::new(TerminalConfirm)
    };
    let commands = WalletCommands::from_config(config, confirm)?;

    match run(&commands, cli.command).await {
        Ok(output) => {
            print!("{}", output);
            Ok(())
        }
        Err(CommandError::UserAborted(message)) => {
            println!("{}", message);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(commands: &WalletCommands, command: Commands) -> Result<String, CommandError> {
    let config = commands.config();
    let registry = commands.registry();
    let token = &config.token;

    let output = match command {
        Commands::Create => {
            let wallet = commands.create().await?;
            render::render_created(&wallet, &config.wallet_file)
        }
        Commands::Show => render::render_overview(&commands.show().await?, registry, token),
        Commands::GetEth { chain } => render::render_faucets(&commands.get_native(&chain).await?),
        Commands::GetRlc { chain } => render::render_faucets(&commands.get_token(&chain).await?),
        Commands::SendEth { chain, amount, to } => {
            let transfer = commands.send_native(&chain, &amount, to.as_deref()).await?;
            render::render_transfer(&transfer, registry, &chain, "ETH", NATIVE_DECIMALS)
        }
        Commands::SendRlc { chain, amount, to } => {
            let transfer = commands.send_token(&chain, &amount, to.as_deref()).await?;
            render::render_transfer(&transfer, registry, &chain, &token.symbol, token.decimals)
        }
        Commands::Sweep { chain, to } => {
            let report = commands.sweep(&chain, to.as_deref()).await?;
            render::render_sweep(&report, registry, &chain, token)
        }
    };

    Ok(output)
}
