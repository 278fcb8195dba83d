//! ENS client for resolving addresses, avatars and text records.
//!
//! Lookups go through the registry: `resolver(node)` first, then `addr(node)`
//! or `text(node, key)` on the returned resolver. Unset records (zero address,
//! empty string, no resolver) come back as `None`.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, instrument};

use ensign_core::constants::AVATAR_RECORD_KEY;
use ensign_core::error::{EnsignError, Result};
use ensign_core::traits::{EnsLookup, EthCall};
use ensign_core::types::Chain;

use crate::abi::{IEnsRegistry, IEnsResolver};
use crate::config::EnsConfig;

/// ENS client over any [`EthCall`] transport.
pub struct EnsClient<C> {
    transport: C,
    registry: Address,
    ipfs_gateway: String,
}

impl<C: EthCall> EnsClient<C> {
    /// Creates a client with the default registry and gateway.
    pub fn new(transport: C) -> Self {
        Self {
            transport,
            registry: default_registry(),
            ipfs_gateway: EnsConfig::default().ipfs_gateway,
        }
    }

    /// Creates a client with custom configuration.
    pub fn with_config(transport: C, config: &EnsConfig) -> Result<Self> {
        let registry = ensign_core::parse_address(&config.registry)
            .ok_or_else(|| EnsignError::InvalidAddress(config.registry.clone()))?;
        Ok(Self {
            transport,
            registry,
            ipfs_gateway: config.ipfs_gateway.trim_end_matches('/').to_string(),
        })
    }

    /// Looks up the resolver contract for `name`.
    #[instrument(skip(self))]
    pub async fn resolver(&self, name: &str, chain: Chain) -> Result<Option<Address>> {
        let node = namehash(name);
        let call = IEnsRegistry::resolverCall { node };
        let data = self
            .transport
            .call(self.registry, Bytes::from(call.abi_encode()), chain)
            .await?;
        let resolver = decode::<IEnsRegistry::resolverCall>(&data)?._0;

        if resolver.is_zero() {
            debug!(name, "No resolver set");
            return Ok(None);
        }
        Ok(Some(resolver))
    }

    async fn call_resolver<T: SolCall>(
        &self,
        name: &str,
        call: T,
        chain: Chain,
    ) -> Result<Option<T::Return>> {
        let Some(resolver) = self.resolver(name, chain).await? else {
            return Ok(None);
        };
        let data = self
            .transport
            .call(resolver, Bytes::from(call.abi_encode()), chain)
            .await?;
        decode::<T>(&data).map(Some)
    }

    /// Turns an avatar record into a URL the UI can load.
    pub fn avatar_url(&self, record: &str) -> Option<String> {
        parse_avatar_record(record, &self.ipfs_gateway)
    }
}

#[async_trait]
impl<C: EthCall> EnsLookup for EnsClient<C> {
    #[instrument(skip(self))]
    async fn resolve_name(&self, name: &str, chain: Chain) -> Result<Option<Address>> {
        let call = IEnsResolver::addrCall { node: namehash(name) };
        let address = self
            .call_resolver(name, call, chain)
            .await?
            .map(|r| r._0)
            .filter(|a| !a.is_zero());
        debug!(name, ?address, "Resolved address");
        Ok(address)
    }

    #[instrument(skip(self))]
    async fn resolve_avatar(&self, name: &str, chain: Chain) -> Result<Option<String>> {
        let record = self.resolve_text(name, AVATAR_RECORD_KEY, chain).await?;
        Ok(record.and_then(|r| self.avatar_url(&r)))
    }

    #[instrument(skip(self))]
    async fn resolve_text(&self, name: &str, key: &str, chain: Chain) -> Result<Option<String>> {
        let call = IEnsResolver::textCall {
            node: namehash(name),
            key: key.to_string(),
        };
        let text = self
            .call_resolver(name, call, chain)
            .await?
            .map(|r| r._0)
            .filter(|t| !t.is_empty());
        Ok(text)
    }
}

fn default_registry() -> Address {
    Address::from_str(ensign_core::constants::ENS_REGISTRY_ADDRESS).unwrap_or(Address::ZERO)
}

fn decode<T: SolCall>(data: &[u8]) -> Result<T::Return> {
    // An EOA or a contract without the function returns empty data.
    if data.is_empty() {
        return Err(EnsignError::AbiDecode(format!("{}: empty return data", T::SIGNATURE)));
    }
    T::abi_decode_returns(data, true)
        .map_err(|e| EnsignError::AbiDecode(format!("{}: {e}", T::SIGNATURE)))
}

/// Computes the EIP-137 namehash of an already-normalized name.
pub fn namehash(name: &str) -> B256 {
    use sha3::{Digest, Keccak256};

    let mut node = [0u8; 32];

    for label in name.rsplit('.') {
        if label.is_empty() {
            continue;
        }

        let label_hash = Keccak256::digest(label.as_bytes());

        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(&label_hash);

        node = Keccak256::digest(combined).into();
    }

    B256::from(node)
}

/// Converts an avatar text record to a URL.
///
/// HTTP(S) and inline image data pass through; IPFS/IPNS references are
/// rewritten onto `gateway`. NFT references (`eip155:`) need token metadata
/// lookups and resolve to `None`.
pub fn parse_avatar_record(record: &str, gateway: &str) -> Option<String> {
    let raw = record.trim();
    let gateway = gateway.trim_end_matches('/');

    if raw.starts_with("https://") || raw.starts_with("http://") {
        return url::Url::parse(raw).ok().map(String::from);
    }
    if raw.starts_with("data:image/") {
        return Some(raw.to_string());
    }
    if let Some(rest) = raw.strip_prefix("ipfs://") {
        let cid = rest.strip_prefix("ipfs/").unwrap_or(rest);
        return (!cid.is_empty()).then(|| format!("{gateway}/ipfs/{cid}"));
    }
    if let Some(cid) = raw.strip_prefix("/ipfs/") {
        return (!cid.is_empty()).then(|| format!("{gateway}/ipfs/{cid}"));
    }
    if let Some(name) = raw.strip_prefix("ipns://") {
        return (!name.is_empty()).then(|| format!("{gateway}/ipns/{name}"));
    }
    if raw.starts_with("Qm") || raw.starts_with("bafy") || raw.starts_with("bafk") {
        return Some(format!("{gateway}/ipfs/{raw}"));
    }

    debug!(record = raw, "Unsupported avatar record");
    None
}
