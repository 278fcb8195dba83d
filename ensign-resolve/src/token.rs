//! Token-import resolution: address or ENS name to a verified ERC-20 contract.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use ensign_cache::{CacheConfig, TtlCache};
use ensign_core::constants::{ERC20_CHECK_MAX_RETRIES, ERC20_CHECK_TTL_SECONDS, TOKEN_RECORD_KEY};
use ensign_core::error::{EnsignError, Result};
use ensign_core::traits::{EnsLookup, EthCall, NameNormalizer};
use ensign_core::types::{parse_address, Chain, InputKind, TokenState};

use crate::abi::IERC20;
use crate::classify::classify;
use crate::normalize::BasicNormalizer;
use crate::absorb;

/// Picks the token candidate for a name.
///
/// A `token` record that parses as an address wins over the primary address.
/// Returns the candidate and whether the record was usable.
pub fn select_token_candidate(
    token_record: Option<&str>,
    primary: Option<Address>,
) -> (Option<Address>, bool) {
    match token_record.and_then(parse_address) {
        Some(token) => (Some(token), true),
        None => (primary, false),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERC-20 CHECK
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads `decimals()` to decide whether an address is an ERC-20 contract.
///
/// Successful reads are cached per (address, chain). Transport failures are
/// retried up to `max_retries` times; reverts and undecodable answers are not.
pub struct Erc20Checker<C> {
    transport: C,
    cache: TtlCache<(Address, Chain), u8>,
    max_retries: u32,
}

impl<C: EthCall> Erc20Checker<C> {
    /// Creates a checker with the default TTL and retry budget.
    pub fn new(transport: C) -> Self {
        Self::with_policy(
            transport,
            Duration::from_secs(ERC20_CHECK_TTL_SECONDS),
            ERC20_CHECK_MAX_RETRIES,
        )
    }

    /// Creates a checker with a custom TTL and retry budget.
    ///
    /// The budget is capped at [`ERC20_CHECK_MAX_RETRIES`].
    pub fn with_policy(transport: C, ttl: Duration, max_retries: u32) -> Self {
        Self {
            transport,
            cache: TtlCache::with_config(CacheConfig::with_ttl(ttl)),
            max_retries: max_retries.min(ERC20_CHECK_MAX_RETRIES),
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Returns `decimals()` for `token`, or `None` if it is not an ERC-20.
    #[instrument(skip(self))]
    pub async fn decimals(&self, token: Address, chain: Chain) -> Option<u8> {
        if let Some(decimals) = self.cache.get(&(token, chain)) {
            debug!(%token, "Cache hit (decimals)");
            return Some(decimals);
        }

        let mut retries = 0;
        loop {
            match self.read_decimals(token, chain).await {
                Ok(decimals) => {
                    self.cache.set((token, chain), decimals);
                    return Some(decimals);
                }
                Err(e) if e.is_recoverable() && retries < self.max_retries => {
                    retries += 1;
                    debug!(%token, error = %e, retries, "Retrying decimals()");
                }
                Err(e) => {
                    debug!(%token, error = %e, "Not an ERC-20 contract");
                    return None;
                }
            }
        }
    }

    async fn read_decimals(&self, token: Address, chain: Chain) -> Result<u8> {
        let calldata = Bytes::from(IERC20::decimalsCall {}.abi_encode());
        let data = self.transport.call(token, calldata, chain).await?;
        if data.is_empty() {
            return Err(EnsignError::AbiDecode("decimals(): empty return data".into()));
        }
        IERC20::decimalsCall::abi_decode_returns(&data, true)
            .map(|r| r._0)
            .map_err(|e| EnsignError::AbiDecode(format!("decimals(): {e}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN RESOLVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Receiver side of a spawned token resolution.
pub struct TokenWatch {
    /// Published states; the last one is final once the task ends
    pub receiver: watch::Receiver<TokenState>,
    /// Lookup task, absent when the input needed no lookups
    pub handle: Option<JoinHandle<()>>,
}

enum Pending {
    Verify(Address),
    Lookup(String),
}

/// Resolves token-import input to a contract and checks it answers `decimals()`.
pub struct TokenResolver<L, C> {
    lookup: L,
    checker: Erc20Checker<C>,
    normalizer: Arc<dyn NameNormalizer>,
}

impl<L: EnsLookup, C: EthCall> TokenResolver<L, C> {
    /// Creates a resolver with the default normalizer.
    pub fn new(lookup: L, checker: Erc20Checker<C>) -> Self {
        Self::with_normalizer(lookup, checker, Arc::new(BasicNormalizer))
    }

    /// Creates a resolver with a custom normalizer.
    pub fn with_normalizer(
        lookup: L,
        checker: Erc20Checker<C>,
        normalizer: Arc<dyn NameNormalizer>,
    ) -> Self {
        Self {
            lookup,
            checker,
            normalizer,
        }
    }

    /// Returns the lookup layer.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Returns the ERC-20 checker.
    pub fn checker(&self) -> &Erc20Checker<C> {
        &self.checker
    }

    /// Resolves `input` and returns the final state.
    pub async fn resolve(&self, input: &str, enabled: bool, chain: Chain) -> TokenState {
        let (tx, _rx) = watch::channel(TokenState::default());
        self.resolve_with(input, enabled, chain, &tx).await;
        let state = tx.borrow().clone();
        state
    }

    /// Resolves `input`, publishing every intermediate state to `tx`.
    #[instrument(skip(self, tx))]
    pub async fn resolve_with(
        &self,
        input: &str,
        enabled: bool,
        chain: Chain,
        tx: &watch::Sender<TokenState>,
    ) {
        let (state, pending) = self.plan(input, enabled, chain);
        tx.send_replace(state);
        if let Some(pending) = pending {
            self.drive(pending, chain, tx).await;
        }
    }

    fn plan(&self, input: &str, enabled: bool, chain: Chain) -> (TokenState, Option<Pending>) {
        let kind = classify(input, self.normalizer.as_ref());
        let mut state = TokenState {
            key: kind.key(),
            is_ens: kind.is_ens_name(),
            ..Default::default()
        };

        let pending = match kind {
            InputKind::Invalid => None,
            _ if !enabled => None,
            InputKind::Address(address) => {
                state.resolution.address = Some(address);
                Some(Pending::Verify(address))
            }
            InputKind::EnsName(name) if chain.supports_ens() => Some(Pending::Lookup(name)),
            InputKind::EnsName(name) => {
                debug!(name = %name, %chain, "Token lookup skipped on unsupported chain");
                None
            }
        };

        state.is_loading = pending.is_some();
        (state, pending)
    }

    async fn drive(&self, pending: Pending, chain: Chain, tx: &watch::Sender<TokenState>) {
        let candidate = match pending {
            Pending::Verify(address) => address,
            Pending::Lookup(name) => {
                let ens_chain = chain.ens_chain();
                let (primary, record) = tokio::join!(
                    self.lookup.resolve_name(&name, ens_chain),
                    self.lookup.resolve_text(&name, TOKEN_RECORD_KEY, ens_chain),
                );
                let primary = absorb(primary, "address", &name);
                let record = absorb(record, TOKEN_RECORD_KEY, &name);

                if record.is_some() && record.as_deref().and_then(parse_address).is_none() {
                    warn!(name = %name, record = ?record, "Token record is not an address");
                }
                let (address, has_token_record) =
                    select_token_candidate(record.as_deref(), primary);

                tx.send_modify(|s| {
                    s.resolution.address = address;
                    s.resolution.has_token_record = has_token_record;
                    s.is_loading = address.is_some();
                });

                match address {
                    Some(address) => address,
                    None => return,
                }
            }
        };

        let decimals = self.checker.decimals(candidate, chain).await;
        tx.send_modify(|s| {
            s.resolution.is_erc20 = decimals.is_some();
            s.resolution.decimals = decimals;
            s.is_loading = false;
            s.refresh_validity();
        });
        debug!(token = %candidate, erc20 = decimals.is_some(), "Token resolution finished");
    }
}

impl<L: EnsLookup + 'static, C: EthCall + 'static> TokenResolver<L, C> {
    /// Resolves `input` on a background task.
    pub fn spawn(self: &Arc<Self>, input: &str, enabled: bool, chain: Chain) -> TokenWatch {
        let (state, pending) = self.plan(input, enabled, chain);
        let (tx, receiver) = watch::channel(state);

        let handle = pending.map(|pending| {
            let resolver = Arc::clone(self);
            tokio::spawn(async move {
                resolver.drive(pending, chain, &tx).await;
            })
        });

        TokenWatch { receiver, handle }
    }
}
