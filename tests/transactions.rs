mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::consensus::transaction::SignerRecoverable;
use alloy::primitives::{TxKind, U256};
use alloy::sol_types::SolCall;

use common::*;
use multichain_wallet::blockchain::token::IERC20;
use multichain_wallet::blockchain::transaction::NATIVE_TRANSFER_GAS;
use multichain_wallet::blockchain::{
    BlockchainError, ChainHandle, ConfirmationWaiter, TransactionSubmitter, Transfers,
};

#[tokio::test]
async fn test_native_transfer_signed_for_chain_and_confirmed() {
    let mock = Arc::new(MockChain::new("kovan", 42));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();

    let transfer = Transfers::new(&chain, &wallet, fast_waiter(), 100_000)
        .send_native(DESTINATION, ether(1))
        .await
        .unwrap();

    assert_eq!(transfer.to, DESTINATION);
    assert_eq!(transfer.amount, ether(1));
    assert_eq!(transfer.receipt.block_number, Some(100));

    let sent = mock.decoded_broadcasts();
    assert_eq!(sent.len(), 1);
    let TxEnvelope::Legacy(signed) = &sent[0] else {
        panic!("expected a legacy transaction");
    };
    assert_eq!(signed.tx().chain_id, Some(42));
    assert_eq!(signed.tx().to, TxKind::Call(DESTINATION));
    assert_eq!(signed.tx().value, ether(1));
    assert_eq!(signed.tx().gas_limit, NATIVE_TRANSFER_GAS);
    assert_eq!(signed.tx().nonce, 0);
    assert_eq!(sent[0].recover_signer().unwrap(), TEST_ADDRESS);
    assert_eq!(*signed.hash(), transfer.receipt.transaction_hash);
}

#[tokio::test]
async fn test_token_transfer_targets_contract() {
    let mock = Arc::new(MockChain::new("kovan", 42));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();

    Transfers::new(&chain, &wallet, fast_waiter(), 100_000)
        .send_token(DESTINATION, U256::from(5_000_000_000u64))
        .await
        .unwrap();

    let sent = mock.decoded_broadcasts();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to(), Some(TOKEN_ADDRESS));
    assert_eq!(sent[0].value(), U256::ZERO);
    assert_eq!(sent[0].gas_limit(), 100_000);

    let call = IERC20::transferCall::abi_decode(sent[0].input()).unwrap();
    assert_eq!(call.to, DESTINATION);
    assert_eq!(call.amount, U256::from(5_000_000_000u64));
}

#[tokio::test]
async fn test_token_transfer_without_contract_is_configuration_error() {
    let mock = Arc::new(MockChain::new("kovan", 42));
    let chain = mock_handle(mock.clone(), false);
    let wallet = test_wallet();

    let err = TransactionSubmitter::new(&chain, &wallet)
        .submit_token_transfer(DESTINATION, U256::from(1), 100_000)
        .await
        .unwrap_err();

    assert!(matches!(err, BlockchainError::Configuration(_)));
    assert!(mock.broadcasts().is_empty());
}

#[tokio::test]
async fn test_chain_id_mismatch_refuses_to_sign() {
    let mock = Arc::new(MockChain::new("kovan", 3));
    let chain = ChainHandle::new(descriptor("kovan", 42, true), mock.clone());
    let wallet = test_wallet();

    let err = TransactionSubmitter::new(&chain, &wallet)
        .submit_native(DESTINATION, ether(1))
        .await
        .unwrap_err();

    assert!(matches!(err, BlockchainError::Signing { .. }));
    assert!(mock.broadcasts().is_empty());
}

#[tokio::test]
async fn test_gas_price_above_maximum_is_rejected() {
    let mock = Arc::new(MockChain::new("kovan", 42).with_gas_price(900_000_000_000));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();

    let err = TransactionSubmitter::new(&chain, &wallet)
        .submit_native(DESTINATION, ether(1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BlockchainError::GasPriceTooHigh {
            current_gwei: 900,
            max_gwei: 500
        }
    ));
    assert!(mock.broadcasts().is_empty());
}

#[tokio::test]
async fn test_consecutive_transfers_use_increasing_nonces() {
    let mock = Arc::new(MockChain::new("kovan", 42));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();
    let transfers = Transfers::new(&chain, &wallet, fast_waiter(), 100_000);

    transfers.send_native(DESTINATION, ether(1)).await.unwrap();
    transfers.send_native(DESTINATION, ether(2)).await.unwrap();

    let nonces: Vec<u64> = mock.decoded_broadcasts().iter().map(|tx| tx.nonce()).collect();
    assert_eq!(nonces, vec![0, 1]);
}

#[tokio::test]
async fn test_never_mined_times_out_after_attempt_budget() {
    let mock = Arc::new(MockChain::new("kovan", 42).with_receipts(vec![ReceiptPlan::never_mined()]));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();
    let waiter = ConfirmationWaiter::new(Duration::from_millis(1), 3);

    let err = Transfers::new(&chain, &wallet, waiter, 100_000)
        .send_native(DESTINATION, ether(1))
        .await
        .unwrap_err();

    match err {
        BlockchainError::ConfirmationTimeout { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_all_gas_used_without_status_is_failure() {
    let mock = Arc::new(
        MockChain::new("kovan", 42).with_receipts(vec![ReceiptPlan::out_of_gas_without_status()]),
    );
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();

    let err = Transfers::new(&chain, &wallet, fast_waiter(), 100_000)
        .send_token(DESTINATION, U256::from(1))
        .await
        .unwrap_err();

    assert!(matches!(err, BlockchainError::TransactionFailed { .. }));
}

#[tokio::test]
async fn test_reverted_status_is_failure() {
    let mock = Arc::new(MockChain::new("kovan", 42).with_receipts(vec![ReceiptPlan::reverted()]));
    let chain = mock_handle(mock.clone(), true);
    let wallet = test_wallet();

    let err = Transfers::new(&chain, &wallet, fast_waiter(), 100_000)
        .send_native(DESTINATION, ether(1))
        .await
        .unwrap_err();

    match err {
        BlockchainError::TransactionFailed { reason, .. } => {
            assert_eq!(reason, "execution reverted")
        }
        other => panic!("unexpected error: {other}"),
    }
}
