//! Name resolution: address, avatar and social records for an input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use ensign_core::traits::{EnsLookup, NameNormalizer};
use ensign_core::types::{Chain, IdentityState, InputKind, ResolvedIdentity, SocialKey};

use crate::classify::classify;
use crate::normalize::BasicNormalizer;
use crate::absorb;

/// Receiver side of a spawned resolution.
pub struct IdentityWatch {
    /// Published states; the last one is final once the task ends
    pub receiver: watch::Receiver<IdentityState>,
    /// Lookup task, absent when the input needed no lookups
    pub handle: Option<JoinHandle<()>>,
}

/// Resolves addresses and ENS names into a [`ResolvedIdentity`] plus social records.
pub struct NameResolver<L> {
    lookup: L,
    normalizer: Arc<dyn NameNormalizer>,
}

impl<L: EnsLookup> NameResolver<L> {
    /// Creates a resolver with the default normalizer.
    pub fn new(lookup: L) -> Self {
        Self::with_normalizer(lookup, Arc::new(BasicNormalizer))
    }

    /// Creates a resolver with a custom normalizer.
    pub fn with_normalizer(lookup: L, normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self { lookup, normalizer }
    }

    /// Returns the lookup layer.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolves `input` and returns the final state.
    pub async fn resolve(&self, input: &str, enabled: bool, chain: Chain) -> IdentityState {
        let (tx, _rx) = watch::channel(IdentityState::default());
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
        tx: &watch::Sender<IdentityState>,
    ) {
        let (state, pending) = self.plan(input, enabled, chain);
        tx.send_replace(state);
        if let Some(name) = pending {
            self.drive(&name, chain.ens_chain(), tx).await;
        }
    }

    /// Initial state for `input`, plus the name to look up if any.
    ///
    /// Addresses, invalid input, disabled requests and unsupported chains all
    /// settle here without issuing lookups.
    fn plan(&self, input: &str, enabled: bool, chain: Chain) -> (IdentityState, Option<String>) {
        let kind = classify(input, self.normalizer.as_ref());
        let key = kind.key();

        match kind {
            InputKind::Address(address) => {
                (IdentityState::settled(key, ResolvedIdentity::from_address(address)), None)
            }
            InputKind::Invalid => (IdentityState::settled(key, ResolvedIdentity::default()), None),
            InputKind::EnsName(name) => {
                let identity = ResolvedIdentity::from_name(&name);
                if !enabled || !chain.supports_ens() {
                    debug!(name = %name, enabled, %chain, "Name resolution skipped");
                    return (IdentityState::settled(key, identity), None);
                }
                let state = IdentityState {
                    key,
                    identity,
                    is_loading: true,
                    ..Default::default()
                };
                (state, Some(name))
            }
        }
    }

    async fn drive(&self, name: &str, ens_chain: Chain, tx: &watch::Sender<IdentityState>) {
        let address_done = AtomicBool::new(false);
        let avatar_done = AtomicBool::new(false);
        let loading = || !(address_done.load(Ordering::SeqCst) && avatar_done.load(Ordering::SeqCst));

        let address_branch = async {
            let address = absorb(
                self.lookup.resolve_name(name, ens_chain).await,
                "address",
                name,
            );
            address_done.store(true, Ordering::SeqCst);
            tx.send_modify(|s| {
                s.identity.address = address;
                s.is_valid = address.is_some();
                s.is_loading = loading();
                s.socials_loading = address.is_some();
            });

            // Records are only worth fetching for names that resolve.
            if address.is_none() {
                return;
            }
            let records = join_all(SocialKey::ALL.into_iter().map(|key| async move {
                let value = absorb(
                    self.lookup.resolve_text(name, key.record_key(), ens_chain).await,
                    key.record_key(),
                    name,
                );
                (key, value)
            }))
            .await;
            tx.send_modify(|s| {
                for (key, value) in records {
                    s.socials.set(key, value);
                }
                s.socials_loading = false;
            });
        };

        let avatar_branch = async {
            let avatar = absorb(self.lookup.resolve_avatar(name, ens_chain).await, "avatar", name);
            avatar_done.store(true, Ordering::SeqCst);
            tx.send_modify(|s| {
                s.identity.avatar = avatar;
                s.is_loading = loading();
            });
        };

        tokio::join!(address_branch, avatar_branch);
        debug!(name, valid = tx.borrow().is_valid, "Name resolution finished");
    }
}

impl<L: EnsLookup + 'static> NameResolver<L> {
    /// Resolves `input` on a background task.
    ///
    /// The receiver already holds the initial state when this returns, so an
    /// address input is observable as settled without waiting.
    pub fn spawn(self: &Arc<Self>, input: &str, enabled: bool, chain: Chain) -> IdentityWatch {
        let (state, pending) = self.plan(input, enabled, chain);
        let (tx, receiver) = watch::channel(state);

        let handle = pending.map(|name| {
            let resolver = Arc::clone(self);
            tokio::spawn(async move {
                resolver.drive(&name, chain.ens_chain(), &tx).await;
            })
        });

        IdentityWatch { receiver, handle }
    }
}
