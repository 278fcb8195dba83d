//! Networks and the ENS chain selector.

use serde::{Deserialize, Serialize};

/// An EVM network the frontend can be connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub enum Chain {
    /// Ethereum mainnet (1).
    Ethereum,
    /// Goerli test network (5).
    Goerli,
    /// Sepolia test network (11155111).
    Sepolia,
    /// BNB Smart Chain (56).
    Bsc,
    /// BNB Smart Chain testnet (97).
    BscTestnet,
    /// Arbitrum One (42161).
    ArbitrumOne,
    /// Base (8453).
    Base,
    /// Linea (59144).
    Linea,
    /// zkSync Era (324).
    ZkSync,
    /// Polygon zkEVM (1101).
    PolygonZkEvm,
    /// opBNB (204).
    OpBnb,
    /// Any other chain id.
    Other(u64),
}

impl Chain {
    /// Numeric EIP-155 chain id.
    pub fn id(self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Goerli => 5,
            Chain::Sepolia => 11_155_111,
            Chain::Bsc => 56,
            Chain::BscTestnet => 97,
            Chain::ArbitrumOne => 42_161,
            Chain::Base => 8_453,
            Chain::Linea => 59_144,
            Chain::ZkSync => 324,
            Chain::PolygonZkEvm => 1_101,
            Chain::OpBnb => 204,
            Chain::Other(id) => id,
        }
    }

    /// Maps a chain id back to a [`Chain`].
    pub fn from_id(id: u64) -> Self {
        match id {
            1 => Chain::Ethereum,
            5 => Chain::Goerli,
            11_155_111 => Chain::Sepolia,
            56 => Chain::Bsc,
            97 => Chain::BscTestnet,
            42_161 => Chain::ArbitrumOne,
            8_453 => Chain::Base,
            59_144 => Chain::Linea,
            324 => Chain::ZkSync,
            1_101 => Chain::PolygonZkEvm,
            204 => Chain::OpBnb,
            other => Chain::Other(other),
        }
    }

    /// Network where ENS lookups are issued while connected to `self`.
    ///
    /// Always mainnet, except Goerli which keeps its own registry.
    pub fn ens_chain(self) -> Chain {
        match self {
            Chain::Goerli => Chain::Goerli,
            _ => Chain::Ethereum,
        }
    }

    /// Whether name resolution is offered while connected to `self`.
    pub fn supports_ens(self) -> bool {
        !matches!(self, Chain::Other(_))
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::Ethereum
    }
}

impl From<u64> for Chain {
    fn from(id: u64) -> Self {
        Chain::from_id(id)
    }
}

impl From<Chain> for u64 {
    fn from(chain: Chain) -> Self {
        chain.id()
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chain::Ethereum => "ethereum",
            Chain::Goerli => "goerli",
            Chain::Sepolia => "sepolia",
            Chain::Bsc => "bsc",
            Chain::BscTestnet => "bsc-testnet",
            Chain::ArbitrumOne => "arbitrum-one",
            Chain::Base => "base",
            Chain::Linea => "linea",
            Chain::ZkSync => "zksync",
            Chain::PolygonZkEvm => "polygon-zkevm",
            Chain::OpBnb => "opbnb",
            Chain::Other(id) => return write!(f, "chain-{id}"),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Chain::Ethereum, Chain::Ethereum ; "mainnet stays on mainnet")]
    #[test_case(Chain::Goerli, Chain::Goerli ; "goerli keeps its own registry")]
    #[test_case(Chain::Sepolia, Chain::Ethereum ; "sepolia uses mainnet")]
    #[test_case(Chain::Bsc, Chain::Ethereum ; "bsc uses mainnet")]
    #[test_case(Chain::Other(999), Chain::Ethereum ; "unknown uses mainnet")]
    fn test_ens_chain(connected: Chain, expected: Chain) {
        assert_eq!(connected.ens_chain(), expected);
    }

    #[test]
    fn test_id_roundtrip() {
        for chain in [
            Chain::Ethereum,
            Chain::Goerli,
            Chain::Sepolia,
            Chain::Bsc,
            Chain::BscTestnet,
            Chain::ArbitrumOne,
            Chain::Base,
            Chain::Linea,
            Chain::ZkSync,
            Chain::PolygonZkEvm,
            Chain::OpBnb,
            Chain::Other(31_337),
        ] {
            assert_eq!(Chain::from_id(chain.id()), chain);
        }
    }

    #[test]
    fn test_supports_ens() {
        assert!(Chain::Bsc.supports_ens());
        assert!(Chain::Ethereum.supports_ens());
        assert!(!Chain::Other(31_337).supports_ens());
    }

    #[test]
    fn test_serde_as_id() {
        assert_eq!(serde_json::to_string(&Chain::Bsc).unwrap(), "56");
        let chain: Chain = serde_json::from_str("5").unwrap();
        assert_eq!(chain, Chain::Goerli);
    }
}
