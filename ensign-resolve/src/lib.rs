//! # Ensign Resolution
//!
//! Turns free-text address/ENS input into the values a DEX frontend shows:
//!
//! - [`classify`]: address vs. ENS name vs. invalid
//! - [`NameResolver`]: address, avatar and social records for a name
//! - [`TokenResolver`]: token-import candidates checked against `decimals()`
//! - [`PreferenceResolver`] / [`decode_preferences`]: vendor preference records
//!
//! Lookups go through [`EnsClient`] over [`RpcClient`], optionally behind
//! [`CachedEnsLookup`]. [`EnsignResolver`] wires all of it from a
//! [`ResolverConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod abi;
mod cached;
mod classify;
mod config;
mod debounce;
mod ens;
mod identity;
mod normalize;
mod preferences;
mod resolver;
mod rpc;
mod session;
mod token;

#[cfg(test)]
mod mock;

pub use cached::CachedEnsLookup;
pub use classify::classify;
pub use config::{EnsConfig, ResolverConfig, RpcConfig};
pub use debounce::Debouncer;
pub use ens::{namehash, parse_avatar_record, EnsClient};
pub use identity::{IdentityWatch, NameResolver};
pub use normalize::BasicNormalizer;
pub use preferences::{decode_preferences, PreferenceResolver};
pub use resolver::{EnsignResolver, SharedLookup};
pub use rpc::RpcClient;
pub use session::LatestSlot;
pub use token::{select_token_candidate, Erc20Checker, TokenResolver, TokenWatch};

use ensign_core::error::Result;
use tracing::warn;

/// Lookup failures surface as absent values; siblings are unaffected.
pub(crate) fn absorb<T>(result: Result<Option<T>>, what: &str, name: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!(name, what, error = %e, "Lookup failed");
        None
    })
}
