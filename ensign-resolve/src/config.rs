//! Resolver configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ensign_core::constants::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_IPFS_GATEWAY, DEFAULT_LOOKUP_TTL_SECONDS,
    ENS_REGISTRY_ADDRESS, ERC20_CHECK_MAX_RETRIES, ERC20_CHECK_TTL_SECONDS,
};
use ensign_core::error::{EnsignError, Result};
use ensign_core::types::Chain;

/// Default Ethereum RPC URL when none is provided.
const DEFAULT_ETH_RPC_URL: &str = "https://ethereum.publicnode.com";

/// JSON-RPC endpoint configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// RPC URL per chain id
    pub endpoints: BTreeMap<u64, String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(Chain::Ethereum.id(), DEFAULT_ETH_RPC_URL.to_string());
        Self {
            endpoints,
            timeout_seconds: 30,
        }
    }
}

impl RpcConfig {
    /// Creates a configuration with the given mainnet RPC URL.
    pub fn new(mainnet_rpc_url: impl Into<String>) -> Self {
        Self::default().with_endpoint(Chain::Ethereum, mainnet_rpc_url)
    }

    /// Adds or replaces the endpoint for `chain`.
    pub fn with_endpoint(mut self, chain: Chain, url: impl Into<String>) -> Self {
        self.endpoints.insert(chain.id(), url.into());
        self
    }

    /// Returns the endpoint configured for `chain`.
    pub fn endpoint(&self, chain: Chain) -> Option<&str> {
        self.endpoints.get(&chain.id()).map(String::as_str)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// ENS client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsConfig {
    /// ENS registry contract
    pub registry: String,
    /// Gateway used to turn avatar CIDs into URLs
    pub ipfs_gateway: String,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            registry: ENS_REGISTRY_ADDRESS.into(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.into(),
        }
    }
}

/// Top-level resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// JSON-RPC configuration
    pub rpc: RpcConfig,
    /// ENS configuration
    pub ens: EnsConfig,
    /// Whether to cache ENS lookups
    pub enable_cache: bool,
    /// ENS lookup cache TTL in seconds
    pub cache_ttl_seconds: u64,
    /// How long a successful ERC-20 check stays cached
    pub erc20_cache_ttl_seconds: u64,
    /// Retries after a failed ERC-20 check, at most [`ERC20_CHECK_MAX_RETRIES`]
    pub erc20_max_retries: u32,
    /// Quiet period before raw input is resolved
    pub debounce_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            ens: EnsConfig::default(),
            enable_cache: true,
            cache_ttl_seconds: DEFAULT_LOOKUP_TTL_SECONDS,
            erc20_cache_ttl_seconds: ERC20_CHECK_TTL_SECONDS,
            erc20_max_retries: ERC20_CHECK_MAX_RETRIES,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ResolverConfig {
    /// Creates a config with the given mainnet RPC URL.
    pub fn with_rpc(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: RpcConfig::new(rpc_url),
            ..Default::default()
        }
    }

    /// Adds an RPC endpoint for another chain.
    pub fn with_endpoint(mut self, chain: Chain, url: impl Into<String>) -> Self {
        self.rpc = self.rpc.with_endpoint(chain, url);
        self
    }

    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }

    /// Loads a JSON configuration file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make the resolvers misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.rpc.timeout_seconds == 0 {
            return Err(EnsignError::ConfigError("rpc.timeout_seconds must be > 0".into()));
        }
        if self.erc20_max_retries > ERC20_CHECK_MAX_RETRIES {
            return Err(EnsignError::ConfigError(format!(
                "erc20_max_retries must be at most {ERC20_CHECK_MAX_RETRIES}, got {}",
                self.erc20_max_retries
            )));
        }
        if ensign_core::parse_address(&self.ens.registry).is_none() {
            return Err(EnsignError::ConfigError(format!(
                "ens.registry is not an address: {}",
                self.ens.registry
            )));
        }
        for (chain, url) in &self.rpc.endpoints {
            url::Url::parse(url).map_err(|e| {
                EnsignError::ConfigError(format!("invalid RPC URL for chain {chain}: {e}"))
            })?;
        }
        url::Url::parse(&self.ens.ipfs_gateway)
            .map_err(|e| EnsignError::ConfigError(format!("invalid IPFS gateway: {e}")))?;
        Ok(())
    }

    /// Debounce quiet period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.erc20_cache_ttl_seconds, 60);
        assert_eq!(config.erc20_max_retries, 1);
        assert_eq!(config.debounce_ms, 300);
        assert!(config.rpc.endpoint(Chain::Ethereum).is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ResolverConfig::with_rpc("https://test.com")
            .with_endpoint(Chain::Bsc, "https://bsc.test.com")
            .no_cache();

        assert_eq!(config.rpc.endpoint(Chain::Ethereum), Some("https://test.com"));
        assert_eq!(config.rpc.endpoint(Chain::Bsc), Some("https://bsc.test.com"));
        assert!(config.rpc.endpoint(Chain::Base).is_none());
        assert!(!config.enable_cache);
    }

    #[test]
    fn test_validate_rejects_bad_registry() {
        let mut config = ResolverConfig::default();
        config.ens.registry = "registry.eth".into();
        assert!(matches!(config.validate(), Err(EnsignError::ConfigError(_))));
    }

    #[test]
    fn test_validate_bounds_erc20_retries() {
        let mut config = ResolverConfig::default();
        config.erc20_max_retries = 0;
        assert!(config.validate().is_ok());

        config.erc20_max_retries = 5;
        assert!(matches!(config.validate(), Err(EnsignError::ConfigError(_))));
    }

    #[test]
    fn test_from_json_file_rejects_extra_retries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"erc20_max_retries": 5}}"#).unwrap();
        assert!(ResolverConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_from_json_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rpc": {{"endpoints": {{"56": "https://bsc.test"}}}}, "ens": {{"ipfs_gateway": "https://gw.test"}}}}"#
        )
        .unwrap();

        let config = ResolverConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.rpc.timeout_seconds, 30);
        assert_eq!(config.rpc.endpoint(Chain::Bsc), Some("https://bsc.test"));
        assert_eq!(config.ens.registry, ENS_REGISTRY_ADDRESS);
        assert_eq!(config.ens.ipfs_gateway, "https://gw.test");
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rpc": {{"endpoints": {{"1": "https://a.test", "56": "https://b.test"}}, "timeout_seconds": 5}}, "debounce_ms": 150}}"#
        )
        .unwrap();

        let config = ResolverConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.rpc.endpoint(Chain::Bsc), Some("https://b.test"));
        assert_eq!(config.erc20_cache_ttl_seconds, 60);
    }

    #[test]
    fn test_from_json_file_rejects_bad_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rpc": {{"endpoints": {{"1": "not a url"}}, "timeout_seconds": 5}}}}"#)
            .unwrap();
        assert!(ResolverConfig::from_json_file(file.path()).is_err());
    }
}
