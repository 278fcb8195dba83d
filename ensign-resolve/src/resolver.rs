//! Combined resolver wiring RPC, ENS, caching and the three resolution units.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use ensign_core::error::Result;
use ensign_core::traits::EnsLookup;

use crate::cached::CachedEnsLookup;
use crate::config::ResolverConfig;
use crate::debounce::Debouncer;
use crate::ens::EnsClient;
use crate::identity::NameResolver;
use crate::preferences::PreferenceResolver;
use crate::rpc::RpcClient;
use crate::token::{Erc20Checker, TokenResolver};

/// Lookup layer shared by the resolution units.
pub type SharedLookup = Arc<dyn EnsLookup>;

/// Resolver over a live JSON-RPC endpoint.
///
/// Builds one [`RpcClient`] and one ENS lookup layer (cached unless disabled)
/// and hands them to:
/// 1. [`NameResolver`] for address/ENS identity widgets
/// 2. [`TokenResolver`] for token import
/// 3. [`PreferenceResolver`] for vendor preference records
pub struct EnsignResolver {
    identity: Arc<NameResolver<SharedLookup>>,
    token: Arc<TokenResolver<SharedLookup, Arc<RpcClient>>>,
    preferences: Arc<PreferenceResolver<SharedLookup>>,
    config: ResolverConfig,
}

impl EnsignResolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with the given mainnet RPC URL.
    pub fn with_rpc(rpc_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ResolverConfig::with_rpc(rpc_url))
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        config.validate()?;

        let rpc = Arc::new(RpcClient::new(config.rpc.clone())?);
        let ens = EnsClient::with_config(Arc::clone(&rpc), &config.ens)?;

        let lookup: SharedLookup = if config.enable_cache {
            Arc::new(CachedEnsLookup::new(
                ens,
                Duration::from_secs(config.cache_ttl_seconds),
            ))
        } else {
            Arc::new(ens)
        };

        let checker = Erc20Checker::with_policy(
            rpc,
            Duration::from_secs(config.erc20_cache_ttl_seconds),
            config.erc20_max_retries,
        );

        info!(
            chains = config.rpc.endpoints.len(),
            cache = config.enable_cache,
            "Resolver ready"
        );

        Ok(Self {
            identity: Arc::new(NameResolver::new(Arc::clone(&lookup))),
            token: Arc::new(TokenResolver::new(Arc::clone(&lookup), checker)),
            preferences: Arc::new(PreferenceResolver::new(lookup)),
            config,
        })
    }

    /// Name resolver for address/ENS input.
    pub fn identity(&self) -> &Arc<NameResolver<SharedLookup>> {
        &self.identity
    }

    /// Token-import resolver.
    pub fn token(&self) -> &Arc<TokenResolver<SharedLookup, Arc<RpcClient>>> {
        &self.token
    }

    /// Preference resolver.
    pub fn preferences(&self) -> &Arc<PreferenceResolver<SharedLookup>> {
        &self.preferences
    }

    /// Debouncer with the configured quiet period.
    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(self.config.debounce())
    }

    /// Active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensign_core::types::Chain;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = ResolverConfig::default();
        config.rpc.timeout_seconds = 0;
        assert!(EnsignResolver::with_config(config).is_err());
    }

    #[tokio::test]
    async fn test_address_input_sends_no_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let resolver = EnsignResolver::with_rpc(server.uri()).unwrap();
        let state = resolver
            .identity()
            .resolve("0xABCDEF0123456789ABCDEF0123456789ABCDEF01", true, Chain::Ethereum)
            .await;

        assert!(state.is_valid);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_rpc_failures_degrade_to_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let resolver = EnsignResolver::with_rpc(server.uri()).unwrap();

        let identity = resolver.identity().resolve("alice.eth", true, Chain::Ethereum).await;
        assert!(!identity.is_valid);
        assert!(!identity.is_loading);

        let token = resolver.token().resolve("alice.eth", true, Chain::Ethereum).await;
        assert!(!token.is_valid);

        let prefs = resolver.preferences().resolve("alice.eth", true, Chain::Ethereum).await;
        assert!(!prefs.preferences.has_any_preferences());
    }

    #[test]
    fn test_debouncer_uses_config() {
        let mut config = ResolverConfig::default();
        config.debounce_ms = 150;
        let resolver = EnsignResolver::with_config(config).unwrap();
        assert_eq!(resolver.debouncer().quiet(), Duration::from_millis(150));
    }
}
