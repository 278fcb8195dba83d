//! In-memory collaborators for tests.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use parking_lot::Mutex;

use ensign_core::error::{EnsignError, Result};
use ensign_core::traits::{EnsLookup, EthCall};
use ensign_core::types::Chain;

use crate::abi::{IEnsRegistry, IEnsResolver, IERC20};
use crate::ens::namehash;

fn mock_resolver() -> Address {
    Address::repeat_byte(0xee)
}

/// How a mocked contract answers `decimals()`.
#[derive(Clone, Copy, Debug)]
pub enum TokenBehavior {
    Decimals(u8),
    Revert,
    /// Fails with a transport error this many times, then answers.
    Flaky { failures: usize, decimals: u8 },
}

/// Fake chain answering registry, resolver and ERC-20 calls.
#[derive(Default)]
pub struct MockChain {
    nodes: HashMap<B256, Option<Address>>,
    texts: HashMap<(B256, String), String>,
    tokens: HashMap<Address, TokenBehavior>,
    token_calls: Mutex<HashMap<Address, usize>>,
    token_chains: Mutex<Vec<Chain>>,
    calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with the mock resolver and an optional address.
    pub fn with_name(mut self, name: &str, address: Option<Address>) -> Self {
        self.nodes.insert(namehash(name), address);
        self
    }

    pub fn with_text(mut self, name: &str, key: &str, value: &str) -> Self {
        let node = namehash(name);
        self.nodes.entry(node).or_insert(None);
        self.texts.insert((node, key.to_string()), value.to_string());
        self
    }

    pub fn with_token(mut self, address: Address, behavior: TokenBehavior) -> Self {
        self.tokens.insert(address, behavior);
        self
    }

    /// Total `eth_call`s received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `decimals()` calls received by `token`.
    pub fn token_calls(&self, token: Address) -> usize {
        self.token_calls.lock().get(&token).copied().unwrap_or(0)
    }

    /// Chain of every `decimals()` call, in call order.
    pub fn chains(&self) -> Vec<Chain> {
        self.token_chains.lock().clone()
    }

    fn registry() -> Address {
        Address::from_str(ensign_core::constants::ENS_REGISTRY_ADDRESS).unwrap()
    }
}

#[async_trait]
impl EthCall for MockChain {
    async fn call(&self, to: Address, calldata: Bytes, chain: Chain) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if to == Self::registry() {
            let call = IEnsRegistry::resolverCall::abi_decode(&calldata, true).unwrap();
            let resolver = if self.nodes.contains_key(&call.node) {
                mock_resolver()
            } else {
                Address::ZERO
            };
            return Ok(IEnsRegistry::resolverCall::abi_encode_returns(&(resolver,)).into());
        }

        if to == mock_resolver() {
            if let Ok(call) = IEnsResolver::addrCall::abi_decode(&calldata, true) {
                let address = self.nodes.get(&call.node).copied().flatten().unwrap_or(Address::ZERO);
                return Ok(IEnsResolver::addrCall::abi_encode_returns(&(address,)).into());
            }
            let call = IEnsResolver::textCall::abi_decode(&calldata, true).unwrap();
            let text = self
                .texts
                .get(&(call.node, call.key))
                .cloned()
                .unwrap_or_default();
            return Ok(IEnsResolver::textCall::abi_encode_returns(&(text,)).into());
        }

        self.token_chains.lock().push(chain);
        let attempt = {
            let mut counts = self.token_calls.lock();
            let count = counts.entry(to).or_insert(0);
            *count += 1;
            *count
        };
        match self.tokens.get(&to) {
            Some(TokenBehavior::Decimals(d)) => {
                Ok(IERC20::decimalsCall::abi_encode_returns(&(*d,)).into())
            }
            Some(TokenBehavior::Flaky { failures, decimals }) if attempt > *failures => {
                Ok(IERC20::decimalsCall::abi_encode_returns(&(*decimals,)).into())
            }
            Some(TokenBehavior::Flaky { .. }) => Err(EnsignError::HttpError("flaky".into())),
            Some(TokenBehavior::Revert) => Err(EnsignError::ContractCallFailed {
                to: to.to_string(),
                reason: "execution reverted".into(),
            }),
            // No code at the address: the node returns empty data.
            None => Ok(Bytes::new()),
        }
    }
}

/// Fake ENS lookup layer that records every call.
#[derive(Default)]
pub struct MockEns {
    names: HashMap<String, Address>,
    avatars: HashMap<String, String>,
    texts: HashMap<(String, String), String>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    text_delay: Option<Duration>,
    log: Mutex<Vec<(String, Chain)>>,
}

impl MockEns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, name: &str, address: Address) -> Self {
        self.names.insert(name.into(), address);
        self
    }

    pub fn with_avatar(mut self, name: &str, url: &str) -> Self {
        self.avatars.insert(name.into(), url.into());
        self
    }

    pub fn with_text(mut self, name: &str, key: &str, value: &str) -> Self {
        self.texts.insert((name.into(), key.into()), value.into());
        self
    }

    /// Makes the lookup logged as `entry` (e.g. `"avatar:alice.eth"`) fail.
    pub fn failing(mut self, entry: &str) -> Self {
        self.failing.insert(entry.into());
        self
    }

    /// Delays every lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delays every text-record lookup on top of [`MockEns::with_delay`].
    pub fn with_text_delay(mut self, delay: Duration) -> Self {
        self.text_delay = Some(delay);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().iter().map(|(entry, _)| entry.clone()).collect()
    }

    /// Chain each lookup was issued on, in call order.
    pub fn chains(&self) -> Vec<Chain> {
        self.log.lock().iter().map(|(_, chain)| *chain).collect()
    }

    pub fn calls(&self) -> usize {
        self.log.lock().len()
    }

    async fn record(&self, entry: String, chain: Chain) -> Result<()> {
        let fails = self.failing.contains(&entry);
        self.log.lock().push((entry.clone(), chain));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(EnsignError::RpcError(format!("mock failure: {entry}")));
        }
        Ok(())
    }
}

#[async_trait]
impl EnsLookup for MockEns {
    async fn resolve_name(&self, name: &str, chain: Chain) -> Result<Option<Address>> {
        self.record(format!("addr:{name}"), chain).await?;
        Ok(self.names.get(name).copied())
    }

    async fn resolve_avatar(&self, name: &str, chain: Chain) -> Result<Option<String>> {
        self.record(format!("avatar:{name}"), chain).await?;
        Ok(self.avatars.get(name).cloned())
    }

    async fn resolve_text(&self, name: &str, key: &str, chain: Chain) -> Result<Option<String>> {
        self.record(format!("text:{name}:{key}"), chain).await?;
        if let Some(delay) = self.text_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.texts.get(&(name.to_string(), key.to_string())).cloned())
    }
}
