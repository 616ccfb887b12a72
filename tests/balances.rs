mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::U256;

use common::*;
use multichain_wallet::balance::{Asset, BalanceAggregator};
use multichain_wallet::blockchain::ChainId;

#[tokio::test]
async fn test_entries_follow_chain_order_and_failures_read_as_zero() {
    let chains = vec![
        mock_handle(Arc::new(MockChain::new("mainnet", 1).with_native_balance(ether(1)).with_token_balance(U256::from(7))), true),
        mock_handle(Arc::new(MockChain::new("ropsten", 3).failing_native()), false),
        mock_handle(Arc::new(MockChain::new("rinkeby", 4).with_native_balance(ether(3))), false),
        mock_handle(Arc::new(MockChain::new("kovan", 42).with_native_balance(ether(4)).failing_token()), true),
    ];

    let report = BalanceAggregator::new(&chains).aggregate(TEST_ADDRESS).await;

    let names: Vec<_> = report.entries.iter().map(|e| e.chain_name.as_str()).collect();
    assert_eq!(names, vec!["mainnet", "ropsten", "rinkeby", "kovan"]);
    assert_eq!(report.entries[0].chain_id, ChainId(1));

    let native: Vec<_> = report.entries.iter().map(|e| e.native).collect();
    assert_eq!(native, vec![ether(1), U256::ZERO, ether(3), ether(4)]);

    let tokens: Vec<_> = report.entries.iter().map(|e| e.token).collect();
    assert_eq!(tokens, vec![Some(U256::from(7)), None, None, Some(U256::ZERO)]);

    assert_eq!(report.failures.len(), 2);
    assert!(report
        .failures
        .iter()
        .any(|f| f.chain_name == "ropsten" && f.asset == Asset::Native));
    assert!(report
        .failures
        .iter()
        .any(|f| f.chain_name == "kovan" && f.asset == Asset::Token));
}

#[tokio::test]
async fn test_token_entries_exclude_chains_without_contract() {
    let chains = vec![
        mock_handle(Arc::new(MockChain::new("mainnet", 1)), true),
        mock_handle(Arc::new(MockChain::new("ropsten", 3)), false),
        mock_handle(Arc::new(MockChain::new("kovan", 42)), true),
    ];

    let report = BalanceAggregator::new(&chains).aggregate(TEST_ADDRESS).await;

    let names: Vec<_> = report.token_entries().map(|e| e.chain_name.as_str()).collect();
    assert_eq!(names, vec!["mainnet", "kovan"]);
}

#[tokio::test]
async fn test_slow_chain_is_bounded_and_others_still_report() {
    let chains = vec![
        mock_handle(Arc::new(MockChain::new("mainnet", 1).with_native_balance(ether(1))), false),
        mock_handle(
            Arc::new(MockChain::new("kovan", 42).with_delay(Duration::from_secs(5))),
            false,
        ),
    ];

    let start = Instant::now();
    let report = BalanceAggregator::new(&chains)
        .with_timeout(Duration::from_millis(100))
        .aggregate(TEST_ADDRESS)
        .await;

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(report.entries[0].native, ether(1));
    assert_eq!(report.entries[1].native, U256::ZERO);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].chain_name, "kovan");
}

#[tokio::test]
async fn test_queries_run_concurrently() {
    let chains: Vec<_> = (1..=4)
        .map(|id| {
            mock_handle(
                Arc::new(MockChain::new(&format!("chain{id}"), id).with_delay(Duration::from_millis(200))),
                true,
            )
        })
        .collect();

    let start = Instant::now();
    let report = BalanceAggregator::new(&chains).aggregate(TEST_ADDRESS).await;

    assert_eq!(report.entries.len(), 4);
    assert!(report.failures.is_empty());
    // 8 sequential queries would take 1.6s
    assert!(start.elapsed() < Duration::from_millis(1000));
}

#[tokio::test]
async fn test_no_chains_gives_empty_report() {
    let report = BalanceAggregator::new(&[]).aggregate(TEST_ADDRESS).await;
    assert!(report.entries.is_empty());
    assert!(report.failures.is_empty());
}
