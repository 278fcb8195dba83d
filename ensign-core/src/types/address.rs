//! Address helpers and input classification types.
//!
//! - [`InputKind`]: what a piece of free text turned out to be
//! - [`is_address`] / [`parse_address`]: the canonical hex address check
//! - [`shorten_address`]: the `0x1234...abcd` form used by display widgets

use std::str::FromStr;
use std::sync::LazyLock;

use alloy::primitives::Address;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::ADDRESS_PATTERN;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("address pattern is a valid regex"));

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// Classification of a free-text input.
///
/// Variants are mutually exclusive: a string that matches the address
/// pattern is never treated as a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputKind {
    /// A raw hex address; needs no resolution.
    Address(Address),
    /// A normalized ENS name.
    EnsName(String),
    /// Neither.
    Invalid,
}

impl InputKind {
    /// Returns true for [`InputKind::Address`].
    pub fn is_address(&self) -> bool {
        matches!(self, InputKind::Address(_))
    }

    /// Returns true for [`InputKind::EnsName`].
    pub fn is_ens_name(&self) -> bool {
        matches!(self, InputKind::EnsName(_))
    }

    /// Key identifying this input in caches and published states.
    ///
    /// Addresses use their lowercase hex form so casing variants share a key.
    pub fn key(&self) -> String {
        match self {
            InputKind::Address(address) => format!("{address:#x}"),
            InputKind::EnsName(name) => name.clone(),
            InputKind::Invalid => String::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns true if `s` is `0x` followed by exactly 40 hex digits (any casing).
///
/// No EIP-55 checksum validation is applied.
pub fn is_address(s: &str) -> bool {
    ADDRESS_RE.is_match(s)
}

/// Parses `s` as an address if it matches the canonical pattern.
///
/// Surrounding whitespace is ignored. Used for raw input as well as for
/// `token` text records.
pub fn parse_address(s: &str) -> Option<Address> {
    let s = s.trim();
    if !is_address(s) {
        return None;
    }
    Address::from_str(s).ok()
}

/// Shortens an address to `0x` + `chars` leading and `chars` trailing hex digits.
pub fn shorten_address(address: &Address, chars: usize) -> String {
    let full = address.to_checksum(None);
    let hex = &full[2..];
    if chars == 0 || chars * 2 >= hex.len() {
        return full;
    }
    format!("0x{}...{}", &hex[..chars], &hex[hex.len() - chars..])
}
