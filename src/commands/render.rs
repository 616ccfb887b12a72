//! Human-readable output for command results.

use std::fmt::Write;

use alloy::primitives::Address;

use crate::blockchain::units::{format_amount, format_native};
use crate::blockchain::{ChainRegistry, CompletedTransfer, Wallet};
use crate::config::TokenConfig;
use crate::commands::wallet::WalletOverview;
use crate::faucet::FaucetResult;
use crate::sweep::SweepReport;

pub fn render_created(wallet: &Wallet, path: &str) -> String {
    format!("Wallet {} saved to {}\n", wallet.address(), path)
}

/// Address, public key, explorer links, then balances per chain.
pub fn render_overview(
    overview: &WalletOverview,
    registry: &ChainRegistry,
    token: &TokenConfig,
) -> String {
    let mut out = String::new();
    let address = overview.wallet.address();

    let _ = writeln!(out, "Wallet:");
    let _ = writeln!(out, "  address:    {}", address);
    let _ = writeln!(out, "  public key: {}", overview.wallet.public_key());
    render_links(&mut out, registry, address);

    let _ = writeln!(out, "\nETH balances:");
    for entry in &overview.balances.entries {
        let _ = writeln!(
            out,
            "  {:<10} {} ETH",
            entry.chain_name,
            format_native(entry.native)
        );
    }

    let _ = writeln!(out, "\n{} balances:", token.symbol);
    for entry in overview.balances.token_entries() {
        let amount = entry.token.unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<10} {} {}",
            entry.chain_name,
            format_amount(amount, token.decimals),
            token.symbol
        );
    }

    if !overview.balances.failures.is_empty() {
        let _ = writeln!(out, "\nUnavailable (shown as 0):");
        for failure in &overview.balances.failures {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                failure.chain_name, failure.asset, failure.error
            );
        }
    }

    out
}

fn render_links(out: &mut String, registry: &ChainRegistry, address: Address) {
    let links: Vec<_> = registry
        .chains()
        .iter()
        .filter_map(|c| c.descriptor.address_url(address).map(|url| (c.name(), url)))
        .collect();
    if links.is_empty() {
        return;
    }
    let _ = writeln!(out, "  explorers:");
    for (name, url) in links {
        let _ = writeln!(out, "    {:<10} {}", name, url);
    }
}

/// One block per faucet: `- name :` followed by the pretty-printed payload.
pub fn render_faucets(result: &FaucetResult) -> String {
    let mut out = String::new();
    for response in &result.responses {
        let payload = response.payload();
        let body = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let _ = writeln!(out, "- {} :\n{}", response.source, body);
    }
    out
}

pub fn render_transfer(
    transfer: &CompletedTransfer,
    registry: &ChainRegistry,
    chain: &str,
    unit: &str,
    decimals: u8,
) -> String {
    let mut out = format!(
        "Sent {} {} to {} (tx {}, block {}, gas used {})\n",
        format_amount(transfer.amount, decimals),
        unit,
        transfer.to,
        transfer.receipt.transaction_hash,
        transfer
            .receipt
            .block_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| "pending".to_string()),
        transfer.receipt.gas_used,
    );
    if let Some(url) = registry
        .get(chain)
        .ok()
        .and_then(|c| c.descriptor.tx_url(transfer.receipt.transaction_hash))
    {
        let _ = writeln!(out, "  {}", url);
    }
    out
}

pub fn render_sweep(
    report: &SweepReport,
    registry: &ChainRegistry,
    chain: &str,
    token: &TokenConfig,
) -> String {
    if report.transfer_count() == 0 {
        return "Nothing to sweep\n".to_string();
    }
    let mut out = String::new();
    if let Some(transfer) = &report.token_transfer {
        out.push_str(&render_transfer(
            transfer,
            registry,
            chain,
            &token.symbol,
            token.decimals,
        ));
    }
    if let Some(transfer) = &report.native_transfer {
        out.push_str(&render_transfer(
            transfer,
            registry,
            chain,
            "ETH",
            crate::blockchain::units::NATIVE_DECIMALS,
        ));
    }
    out
}
