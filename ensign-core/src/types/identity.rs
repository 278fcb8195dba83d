//! Name resolution output.
//!
//! - [`ResolvedIdentity`]: address, name and avatar shown by address/ENS widgets
//! - [`SocialRecords`]: the fixed set of social text records
//! - [`IdentityState`]: a published snapshot of an in-flight resolution

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::address::shorten_address;
use crate::constants::{
    DISCORD_RECORD_KEY, EMAIL_RECORD_KEY, GITHUB_RECORD_KEY, TELEGRAM_RECORD_KEY,
    TWITTER_RECORD_KEY, URL_RECORD_KEY,
};

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVED IDENTITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Identity derived from an address or ENS name input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Resolved (or directly entered) address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Normalized ENS name, when the input was a name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Whether the input classified as an ENS name
    pub is_ens_name: bool,
}

impl ResolvedIdentity {
    /// Identity for a raw address input.
    pub fn from_address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Default::default()
        }
    }

    /// Identity for an ENS name whose lookups have not completed.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            ens_name: Some(name.into()),
            is_ens_name: true,
            ..Default::default()
        }
    }

    /// Label for display: the ENS name, else the shortened address.
    pub fn display_name(&self) -> Option<String> {
        self.ens_name
            .clone()
            .or_else(|| self.address.as_ref().map(|a| shorten_address(a, 4)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOCIAL RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// The social text records looked up for every resolved name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialKey {
    /// `com.twitter`
    Twitter,
    /// `com.github`
    Github,
    /// `com.discord`
    Discord,
    /// `org.telegram`
    Telegram,
    /// `email`
    Email,
    /// `url`
    Url,
}

impl SocialKey {
    /// Every social key, in lookup order.
    pub const ALL: [SocialKey; 6] = [
        SocialKey::Twitter,
        SocialKey::Github,
        SocialKey::Discord,
        SocialKey::Telegram,
        SocialKey::Email,
        SocialKey::Url,
    ];

    /// The ENS text record key.
    pub fn record_key(self) -> &'static str {
        match self {
            SocialKey::Twitter => TWITTER_RECORD_KEY,
            SocialKey::Github => GITHUB_RECORD_KEY,
            SocialKey::Discord => DISCORD_RECORD_KEY,
            SocialKey::Telegram => TELEGRAM_RECORD_KEY,
            SocialKey::Email => EMAIL_RECORD_KEY,
            SocialKey::Url => URL_RECORD_KEY,
        }
    }
}

/// Social record values; a field is `None` when the record is unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialRecords {
    /// `com.twitter`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// `com.github`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// `com.discord`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
    /// `org.telegram`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    /// `email`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SocialRecords {
    /// Returns the value stored for `key`.
    pub fn get(&self, key: SocialKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Stores `value` for `key`; empty strings count as unset.
    pub fn set(&mut self, key: SocialKey, value: Option<String>) {
        *self.slot_mut(key) = value.filter(|v| !v.is_empty());
    }

    /// Iterates over the records that are set.
    pub fn iter(&self) -> impl Iterator<Item = (SocialKey, &str)> + '_ {
        SocialKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|v| (key, v)))
    }

    /// Returns true if no record is set.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn slot(&self, key: SocialKey) -> &Option<String> {
        match key {
            SocialKey::Twitter => &self.twitter,
            SocialKey::Github => &self.github,
            SocialKey::Discord => &self.discord,
            SocialKey::Telegram => &self.telegram,
            SocialKey::Email => &self.email,
            SocialKey::Url => &self.url,
        }
    }

    fn slot_mut(&mut self, key: SocialKey) -> &mut Option<String> {
        match key {
            SocialKey::Twitter => &mut self.twitter,
            SocialKey::Github => &mut self.github,
            SocialKey::Discord => &mut self.discord,
            SocialKey::Telegram => &mut self.telegram,
            SocialKey::Email => &mut self.email,
            SocialKey::Url => &mut self.url,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot of a name resolution, published as lookups complete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityState {
    /// Input key this state belongs to (see [`crate::InputKind::key`])
    pub key: String,
    /// Identity derived so far
    pub identity: ResolvedIdentity,
    /// Social records derived so far
    pub socials: SocialRecords,
    /// True once an address is known
    pub is_valid: bool,
    /// Address or avatar lookup outstanding
    pub is_loading: bool,
    /// Social record lookups outstanding
    pub socials_loading: bool,
}

impl IdentityState {
    /// Final state for inputs that need no lookups.
    pub fn settled(key: impl Into<String>, identity: ResolvedIdentity) -> Self {
        let is_valid = identity.address.is_some();
        Self {
            key: key.into(),
            identity,
            is_valid,
            ..Default::default()
        }
    }

    /// Returns true when no lookup of any kind is outstanding.
    pub fn is_settled(&self) -> bool {
        !self.is_loading && !self.socials_loading
    }
}
