//! Vendor preference records: fetching and decoding.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, instrument};

use ensign_core::constants::{MAX_SLIPPAGE_PERCENT, MIN_SLIPPAGE_PERCENT};
use ensign_core::traits::{EnsLookup, NameNormalizer};
use ensign_core::types::{
    Chain, GasPriority, InputKind, PreferenceKey, PreferenceSet, PreferenceState, RawPreferences,
    Theme,
};

use crate::classify::classify;
use crate::normalize::BasicNormalizer;
use crate::absorb;

/// Decodes raw record text into typed preferences.
///
/// Values that fail to parse are dropped; decoding never fails as a whole.
pub fn decode_preferences(raw: &RawPreferences) -> PreferenceSet {
    PreferenceSet {
        slippage: raw.slippage.as_deref().and_then(decode_slippage),
        theme: raw.theme.as_deref().and_then(|t| t.parse::<Theme>().ok()),
        expert_mode: raw
            .expert_mode
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| v.eq_ignore_ascii_case("true")),
        gas_priority: raw.gas.as_deref().and_then(|g| g.parse::<GasPriority>().ok()),
    }
}

/// Keeps the trimmed text when it is a finite percentage in range.
fn decode_slippage(text: &str) -> Option<String> {
    let text = text.trim();
    let value: f64 = text.parse().ok()?;
    let in_range =
        value.is_finite() && (MIN_SLIPPAGE_PERCENT..=MAX_SLIPPAGE_PERCENT).contains(&value);
    if !in_range {
        debug!(slippage = text, "Slippage out of range");
    }
    in_range.then(|| text.to_string())
}

/// Fetches and decodes the preference records of an ENS name.
pub struct PreferenceResolver<L> {
    lookup: L,
    normalizer: Arc<dyn NameNormalizer>,
}

impl<L: EnsLookup> PreferenceResolver<L> {
    /// Creates a resolver with the default normalizer.
    pub fn new(lookup: L) -> Self {
        Self::with_normalizer(lookup, Arc::new(BasicNormalizer))
    }

    /// Creates a resolver with a custom normalizer.
    pub fn with_normalizer(lookup: L, normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self { lookup, normalizer }
    }

    /// Returns the lookup layer.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolves the preferences of `name` and returns the final state.
    pub async fn resolve(&self, name: &str, enabled: bool, chain: Chain) -> PreferenceState {
        let (tx, _rx) = watch::channel(PreferenceState::default());
        self.resolve_with(name, enabled, chain, &tx).await;
        let state = tx.borrow().clone();
        state
    }

    /// Resolves the preferences of `name`, publishing to `tx`.
    ///
    /// Only ENS names carry records; addresses and invalid input settle empty.
    #[instrument(skip(self, tx))]
    pub async fn resolve_with(
        &self,
        name: &str,
        enabled: bool,
        chain: Chain,
        tx: &watch::Sender<PreferenceState>,
    ) {
        let kind = classify(name, self.normalizer.as_ref());
        let key = kind.key();

        let name = match kind {
            InputKind::EnsName(name) if enabled && chain.supports_ens() => name,
            _ => {
                tx.send_replace(PreferenceState {
                    key,
                    ..Default::default()
                });
                return;
            }
        };

        tx.send_replace(PreferenceState {
            key,
            is_loading: true,
            ..Default::default()
        });

        let ens_chain = chain.ens_chain();
        let values = join_all(PreferenceKey::ALL.into_iter().map(|key| {
            let name = name.as_str();
            async move {
                let value = absorb(
                    self.lookup.resolve_text(name, key.record_key(), ens_chain).await,
                    key.record_key(),
                    name,
                );
                (key, value)
            }
        }))
        .await;

        let mut raw = RawPreferences::default();
        for (key, value) in values {
            raw.set(key, value);
        }
        let preferences = decode_preferences(&raw);
        debug!(name = %name, any = preferences.has_any_preferences(), "Preferences decoded");

        tx.send_modify(|s| {
            s.preferences = preferences;
            s.is_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEns;
    use proptest::prelude::*;
    use test_case::test_case;

    fn raw_slippage(value: &str) -> RawPreferences {
        RawPreferences {
            slippage: Some(value.into()),
            ..Default::default()
        }
    }

    #[test_case("0.5", Some("0.5") ; "typical")]
    #[test_case("0", Some("0") ; "lower bound")]
    #[test_case("50", Some("50") ; "upper bound")]
    #[test_case(" 1.5 ", Some("1.5") ; "padding trimmed")]
    #[test_case("75", None ; "above range")]
    #[test_case("-1", None ; "negative")]
    #[test_case("abc", None ; "not a number")]
    #[test_case("NaN", None ; "nan")]
    #[test_case("inf", None ; "infinity")]
    #[test_case("0.5%", None ; "trailing garbage")]
    #[test_case("", None ; "empty")]
    fn test_decode_slippage(input: &str, expected: Option<&str>) {
        let prefs = decode_preferences(&raw_slippage(input));
        assert_eq!(prefs.slippage.as_deref(), expected);
    }

    #[test_case("dark", Some(Theme::Dark) ; "dark")]
    #[test_case("light", Some(Theme::Light) ; "light")]
    #[test_case("Dark", None ; "capitalized")]
    #[test_case("blue", None ; "unknown")]
    fn test_decode_theme(input: &str, expected: Option<Theme>) {
        let raw = RawPreferences {
            theme: Some(input.into()),
            ..Default::default()
        };
        assert_eq!(decode_preferences(&raw).theme, expected);
    }

    #[test_case("true", Some(true) ; "lowercase")]
    #[test_case("TRUE", Some(true) ; "uppercase")]
    #[test_case("false", Some(false) ; "false")]
    #[test_case("no", Some(false) ; "anything else")]
    #[test_case("", None ; "empty")]
    fn test_decode_expert_mode(input: &str, expected: Option<bool>) {
        let raw = RawPreferences {
            expert_mode: Some(input.into()),
            ..Default::default()
        };
        assert_eq!(decode_preferences(&raw).expert_mode, expected);
    }

    #[test]
    fn test_decode_gas_normalized() {
        let raw = RawPreferences {
            gas: Some("HIGH".into()),
            ..Default::default()
        };
        let prefs = decode_preferences(&raw);
        assert_eq!(prefs.gas_priority, Some(GasPriority::High));
        assert_eq!(prefs.to_text_records(), vec![("com.pancakeswap.gas", "high".to_string())]);
    }

    #[test]
    fn test_padded_slippage_written_back_trimmed() {
        let prefs = decode_preferences(&raw_slippage("\t2.5\n"));
        assert_eq!(
            prefs.to_text_records(),
            vec![("com.pancakeswap.slippage", "2.5".to_string())]
        );
    }

    #[test]
    fn test_decode_empty() {
        let prefs = decode_preferences(&RawPreferences::default());
        assert!(!prefs.has_any_preferences());
    }

    proptest! {
        #[test]
        fn prop_kept_slippage_is_in_range(text in ".{0,12}") {
            if let Some(kept) = decode_preferences(&raw_slippage(&text)).slippage {
                let value: f64 = kept.parse().unwrap();
                prop_assert!((0.0..=50.0).contains(&value));
                prop_assert_eq!(kept.trim(), kept.as_str());
            }
        }

        #[test]
        fn prop_in_range_numbers_kept(value in 0.0f64..=50.0) {
            let text = value.to_string();
            let prefs = decode_preferences(&raw_slippage(&text));
            prop_assert_eq!(prefs.slippage, Some(text));
        }
    }

    #[tokio::test]
    async fn test_resolve_fetches_all_records() {
        let ens = MockEns::new()
            .with_text("trader.eth", "com.pancakeswap.slippage", "0.5")
            .with_text("trader.eth", "com.pancakeswap.theme", "dark")
            .with_text("trader.eth", "com.pancakeswap.expertMode", "TRUE")
            .with_text("trader.eth", "com.pancakeswap.gas", "Medium");
        let resolver = PreferenceResolver::new(ens);

        let state = resolver.resolve("trader.eth", true, Chain::Bsc).await;

        assert!(!state.is_loading);
        assert_eq!(state.key, "trader.eth");
        assert_eq!(
            state.preferences,
            PreferenceSet {
                slippage: Some("0.5".into()),
                theme: Some(Theme::Dark),
                expert_mode: Some(true),
                gas_priority: Some(GasPriority::Medium),
            }
        );
        assert_eq!(resolver.lookup().calls(), 4);
    }

    #[tokio::test]
    async fn test_failed_record_is_dropped() {
        let ens = MockEns::new()
            .with_text("trader.eth", "com.pancakeswap.theme", "light")
            .failing("text:trader.eth:com.pancakeswap.slippage");
        let resolver = PreferenceResolver::new(ens);

        let state = resolver.resolve("trader.eth", true, Chain::Ethereum).await;

        assert_eq!(state.preferences.slippage, None);
        assert_eq!(state.preferences.theme, Some(Theme::Light));
    }

    #[tokio::test]
    async fn test_lookups_use_ens_chain() {
        for (connected, expected) in [(Chain::Bsc, Chain::Ethereum), (Chain::Goerli, Chain::Goerli)] {
            let ens = MockEns::new().with_text("trader.eth", "com.pancakeswap.theme", "dark");
            let resolver = PreferenceResolver::new(ens);

            let state = resolver.resolve("trader.eth", true, connected).await;

            assert_eq!(state.preferences.theme, Some(Theme::Dark));
            let chains = resolver.lookup().chains();
            assert_eq!(chains.len(), 4);
            assert!(chains.iter().all(|chain| *chain == expected), "{connected}: {chains:?}");
        }
    }

    #[tokio::test]
    async fn test_address_has_no_preferences() {
        let resolver = PreferenceResolver::new(MockEns::new());
        let state = resolver
            .resolve("0x1111111111111111111111111111111111111111", true, Chain::Ethereum)
            .await;

        assert!(!state.preferences.has_any_preferences());
        assert_eq!(resolver.lookup().calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_issues_no_lookups() {
        let resolver = PreferenceResolver::new(MockEns::new());
        let state = resolver.resolve("trader.eth", false, Chain::Ethereum).await;

        assert!(!state.is_loading);
        assert_eq!(resolver.lookup().calls(), 0);
    }
}
