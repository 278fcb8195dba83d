//! Token-import resolution output.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Token contract resolved from an address or ENS name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResolution {
    /// Candidate token contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// The name carries a `token` record that parses as an address
    pub has_token_record: bool,
    /// The candidate answered `decimals()`
    pub is_erc20: bool,
    /// Value returned by `decimals()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

/// Snapshot of a token resolution, published as lookups complete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// Input key this state belongs to
    pub key: String,
    /// Resolution derived so far
    pub resolution: TokenResolution,
    /// Whether the input classified as an ENS name
    pub is_ens: bool,
    /// Non-empty input that resolved to an ERC-20 contract
    pub is_valid: bool,
    /// Any lookup or verification outstanding
    pub is_loading: bool,
}

impl TokenState {
    /// Recomputes `is_valid` from the current resolution.
    ///
    /// Both paths need a resolved address that passed the ERC-20 check; a name
    /// pointing at a non-token contract is invalid, not merely unverified.
    pub fn refresh_validity(&mut self) {
        self.is_valid =
            !self.key.is_empty() && self.resolution.address.is_some() && self.resolution.is_erc20;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_requires_erc20() {
        let mut state = TokenState {
            key: "token.eth".into(),
            resolution: TokenResolution {
                address: Some(Address::repeat_byte(1)),
                has_token_record: true,
                ..Default::default()
            },
            is_ens: true,
            ..Default::default()
        };
        state.refresh_validity();
        assert!(!state.is_valid);

        state.resolution.is_erc20 = true;
        state.refresh_validity();
        assert!(state.is_valid);
    }

    #[test]
    fn test_validity_requires_input() {
        let mut state = TokenState {
            resolution: TokenResolution {
                address: Some(Address::repeat_byte(1)),
                is_erc20: true,
                ..Default::default()
            },
            ..Default::default()
        };
        state.refresh_validity();
        assert!(!state.is_valid);
    }
}
