//! Shared fixtures for integration tests: an in-memory chain and a mock HTTP backend.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use multichain_wallet::blockchain::{
    BlockchainError, BlockchainResult, ChainDescriptor, ChainEndpoint, ChainHandle, ChainId,
    ConfirmationWaiter, ReceiptInfo, TokenContract, Wallet,
};

/// Well-known development key (anvil account 0).
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const TOKEN_ADDRESS: Address = address!("607f4c5bb672230e8672085532f7e901544a7375");
pub const DESTINATION: Address = address!("1111111111111111111111111111111111111111");

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_KEY).unwrap()
}

pub fn fast_waiter() -> ConfirmationWaiter {
    ConfirmationWaiter::new(Duration::from_millis(5), 5)
}

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

/// How the mock chain answers receipt polls for one broadcast.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPlan {
    /// Polls answered with "not mined yet" before the receipt appears.
    pub pending_polls: u32,
    /// Never mined.
    pub never_mined: bool,
    pub status: Option<bool>,
    /// Report the whole gas limit as used.
    pub use_all_gas: bool,
}

impl ReceiptPlan {
    pub fn success() -> Self {
        Self {
            pending_polls: 1,
            never_mined: false,
            status: Some(true),
            use_all_gas: false,
        }
    }

    pub fn reverted() -> Self {
        Self {
            status: Some(false),
            ..Self::success()
        }
    }

    pub fn out_of_gas_without_status() -> Self {
        Self {
            status: None,
            use_all_gas: true,
            ..Self::success()
        }
    }

    pub fn never_mined() -> Self {
        Self {
            never_mined: true,
            ..Self::success()
        }
    }
}

#[derive(Debug)]
struct Broadcast {
    plan: ReceiptPlan,
    gas_limit: u64,
    polls: u32,
}

#[derive(Debug, Default)]
struct MockState {
    native_balance: U256,
    token_balance: U256,
    nonce: u64,
    plans: VecDeque<ReceiptPlan>,
    broadcasts: HashMap<TxHash, Broadcast>,
    raw: Vec<Bytes>,
}

/// In-memory chain endpoint. Balances are fixed; nothing is deducted on send.
pub struct MockChain {
    name: String,
    chain_id: u64,
    gas_price: u128,
    delay: Option<Duration>,
    fail_native: bool,
    fail_token: bool,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new(name: &str, chain_id: u64) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            gas_price: 1_000_000_000,
            delay: None,
            fail_native: false,
            fail_token: false,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_native_balance(self, balance: U256) -> Self {
        self.state.lock().unwrap().native_balance = balance;
        self
    }

    pub fn with_token_balance(self, balance: U256) -> Self {
        self.state.lock().unwrap().token_balance = balance;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_native(mut self) -> Self {
        self.fail_native = true;
        self
    }

    pub fn failing_token(mut self) -> Self {
        self.fail_token = true;
        self
    }

    /// Receipt behaviour for the next broadcasts, in order. Defaults to success.
    pub fn with_receipts(self, plans: Vec<ReceiptPlan>) -> Self {
        self.state.lock().unwrap().plans = plans.into();
        self
    }

    /// Raw bytes of every broadcast, in order.
    pub fn broadcasts(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().raw.clone()
    }

    pub fn decoded_broadcasts(&self) -> Vec<TxEnvelope> {
        self.broadcasts()
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap())
            .collect()
    }

    fn rpc_error(&self, message: &str) -> BlockchainError {
        BlockchainError::Rpc {
            chain: self.name.clone(),
            message: message.to_string(),
        }
    }

    async fn latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChainEndpoint for MockChain {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chain_id(&self) -> BlockchainResult<ChainId> {
        Ok(ChainId(self.chain_id))
    }

    async fn native_balance(&self, _address: Address) -> BlockchainResult<U256> {
        self.latency().await;
        if self.fail_native {
            return Err(self.rpc_error("connection refused"));
        }
        Ok(self.state.lock().unwrap().native_balance)
    }

    async fn transaction_count(&self, _address: Address) -> BlockchainResult<u64> {
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        Ok(self.gas_price)
    }

    async fn call(&self, to: Address, _data: Bytes) -> BlockchainResult<Bytes> {
        self.latency().await;
        if self.fail_token {
            return Err(self.rpc_error("execution reverted"));
        }
        assert_eq!(to, TOKEN_ADDRESS);
        let balance = self.state.lock().unwrap().token_balance;
        Ok(Bytes::from(balance.to_be_bytes::<32>().to_vec()))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        let envelope = TxEnvelope::decode_2718(&mut &raw[..])
            .map_err(|e| self.rpc_error(&format!("invalid raw transaction: {}", e)))?;
        let hash = keccak256(raw);

        let mut state = self.state.lock().unwrap();
        let plan = state.plans.pop_front().unwrap_or_else(ReceiptPlan::success);
        state.nonce += 1;
        state.raw.push(Bytes::copy_from_slice(raw));
        state.broadcasts.insert(
            hash,
            Broadcast {
                plan,
                gas_limit: envelope.gas_limit(),
                polls: 0,
            },
        );
        Ok(hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptInfo>> {
        let mut state = self.state.lock().unwrap();
        let Some(broadcast) = state.broadcasts.get_mut(&tx_hash) else {
            return Ok(None);
        };
        broadcast.polls += 1;
        if broadcast.plan.never_mined || broadcast.polls <= broadcast.plan.pending_polls {
            return Ok(None);
        }
        let gas_used = if broadcast.plan.use_all_gas {
            broadcast.gas_limit
        } else {
            broadcast.gas_limit.min(21_000)
        };
        Ok(Some(ReceiptInfo {
            transaction_hash: tx_hash,
            gas_used,
            block_number: Some(100),
            status: broadcast.plan.status,
        }))
    }
}

pub fn descriptor(name: &str, chain_id: u64, with_token: bool) -> ChainDescriptor {
    ChainDescriptor {
        id: ChainId(chain_id),
        name: name.to_string(),
        token: with_token.then(|| TokenContract::new(TOKEN_ADDRESS)),
        explorer_url: Some(format!("https://{}.etherscan.io", name)),
        gas_price_multiplier: 1.0,
        max_gas_price_gwei: 500,
    }
}

/// A chain handle over `mock`, with or without a token contract.
pub fn mock_handle(mock: Arc<MockChain>, with_token: bool) -> ChainHandle {
    let descriptor = descriptor(mock.name(), mock.chain_id, with_token);
    ChainHandle::new(descriptor, mock)
}

/// Start a mock HTTP backend on an ephemeral port answering every request
/// with `status` and `body`. Returns the address and the raw requests seen.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        seen.lock().unwrap().push(request);

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}

/// Read one request: headers, then `Content-Length` bytes of body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
