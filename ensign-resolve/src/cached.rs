//! Caching adapter over any [`EnsLookup`].

use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::debug;

use ensign_cache::{CacheConfig, TtlCache};
use ensign_core::error::Result;
use ensign_core::traits::EnsLookup;
use ensign_core::types::Chain;

/// Which lookup a cached value belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Field {
    Address,
    Avatar,
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LookupKey {
    chain: Chain,
    name: String,
    field: Field,
}

#[derive(Clone, Debug)]
enum Cached {
    Address(Option<Address>),
    Text(Option<String>),
}

/// Wraps an [`EnsLookup`] with a TTL cache keyed by (name, field, chain).
///
/// Only successful lookups are cached, including "record unset" answers.
pub struct CachedEnsLookup<L> {
    inner: L,
    cache: TtlCache<LookupKey, Cached>,
}

impl<L: EnsLookup> CachedEnsLookup<L> {
    /// Wraps `inner` with the given TTL.
    pub fn new(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::with_config(CacheConfig::with_ttl(ttl)),
        }
    }

    /// Returns the wrapped lookup.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    fn key(name: &str, field: Field, chain: Chain) -> LookupKey {
        LookupKey {
            chain,
            name: name.to_string(),
            field,
        }
    }
}

#[async_trait]
impl<L: EnsLookup> EnsLookup for CachedEnsLookup<L> {
    async fn resolve_name(&self, name: &str, chain: Chain) -> Result<Option<Address>> {
        let key = Self::key(name, Field::Address, chain);
        if let Some(Cached::Address(hit)) = self.cache.get(&key) {
            debug!(name, %chain, "Cache hit (address)");
            return Ok(hit);
        }
        let value = self.inner.resolve_name(name, chain).await?;
        self.cache.set(key, Cached::Address(value));
        Ok(value)
    }

    async fn resolve_avatar(&self, name: &str, chain: Chain) -> Result<Option<String>> {
        let key = Self::key(name, Field::Avatar, chain);
        if let Some(Cached::Text(hit)) = self.cache.get(&key) {
            debug!(name, %chain, "Cache hit (avatar)");
            return Ok(hit);
        }
        let value = self.inner.resolve_avatar(name, chain).await?;
        self.cache.set(key, Cached::Text(value.clone()));
        Ok(value)
    }

    async fn resolve_text(&self, name: &str, key: &str, chain: Chain) -> Result<Option<String>> {
        let cache_key = Self::key(name, Field::Text(key.to_string()), chain);
        if let Some(Cached::Text(hit)) = self.cache.get(&cache_key) {
            debug!(name, key, %chain, "Cache hit (text)");
            return Ok(hit);
        }
        let value = self.inner.resolve_text(name, key, chain).await?;
        self.cache.set(cache_key, Cached::Text(value.clone()));
        Ok(value)
    }
}
