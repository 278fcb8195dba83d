//! Collaborator traits for Ensign.
//!
//! The resolvers only talk to the chain through these interfaces, so any
//! RPC stack (or an in-memory fake in tests) can sit behind them.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chain;

// ═══════════════════════════════════════════════════════════════════════════════
// ENS LOOKUP TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for ENS lookups on an already-normalized name.
///
/// `Ok(None)` means the record is unset; `Err` means the lookup itself failed.
#[async_trait]
pub trait EnsLookup: Send + Sync {
    /// Resolves the name's primary address.
    async fn resolve_name(&self, name: &str, chain: Chain) -> Result<Option<Address>>;

    /// Resolves the name's avatar to a displayable URL.
    async fn resolve_avatar(&self, name: &str, chain: Chain) -> Result<Option<String>>;

    /// Resolves a single text record.
    async fn resolve_text(&self, name: &str, key: &str, chain: Chain) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT CALL TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for read-only contract calls (`eth_call` at the latest block).
#[async_trait]
pub trait EthCall: Send + Sync {
    /// Executes `calldata` against `to` and returns the raw return data.
    async fn call(&self, to: Address, calldata: Bytes, chain: Chain) -> Result<Bytes>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMALIZATION TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonicalizes a raw ENS name before lookup.
pub trait NameNormalizer: Send + Sync {
    /// Returns the normalized name, or `EnsignError::Normalization`.
    fn normalize(&self, raw: &str) -> Result<String>;
}

#[async_trait]
impl<T: EnsLookup + ?Sized> EnsLookup for std::sync::Arc<T> {
    async fn resolve_name(&self, name: &str, chain: Chain) -> Result<Option<Address>> {
        (**self).resolve_name(name, chain).await
    }

    async fn resolve_avatar(&self, name: &str, chain: Chain) -> Result<Option<String>> {
        (**self).resolve_avatar(name, chain).await
    }

    async fn resolve_text(&self, name: &str, key: &str, chain: Chain) -> Result<Option<String>> {
        (**self).resolve_text(name, key, chain).await
    }
}

#[async_trait]
impl<T: EthCall + ?Sized> EthCall for std::sync::Arc<T> {
    async fn call(&self, to: Address, calldata: Bytes, chain: Chain) -> Result<Bytes> {
        (**self).call(to, calldata, chain).await
    }
}

impl<T: NameNormalizer + ?Sized> NameNormalizer for std::sync::Arc<T> {
    fn normalize(&self, raw: &str) -> Result<String> {
        (**self).normalize(raw)
    }
}
