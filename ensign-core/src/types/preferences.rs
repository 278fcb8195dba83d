//! User preferences stored as vendor ENS text records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    EXPERT_MODE_RECORD_KEY, GAS_RECORD_KEY, SLIPPAGE_RECORD_KEY, THEME_RECORD_KEY,
};

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCE KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// The vendor text records holding preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceKey {
    /// `com.pancakeswap.slippage`
    Slippage,
    /// `com.pancakeswap.theme`
    Theme,
    /// `com.pancakeswap.expertMode`
    ExpertMode,
    /// `com.pancakeswap.gas`
    Gas,
}

impl PreferenceKey {
    /// Every preference key, in lookup order.
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::Slippage,
        PreferenceKey::Theme,
        PreferenceKey::ExpertMode,
        PreferenceKey::Gas,
    ];

    /// The ENS text record key.
    pub fn record_key(self) -> &'static str {
        match self {
            PreferenceKey::Slippage => SLIPPAGE_RECORD_KEY,
            PreferenceKey::Theme => THEME_RECORD_KEY,
            PreferenceKey::ExpertMode => EXPERT_MODE_RECORD_KEY,
            PreferenceKey::Gas => GAS_RECORD_KEY,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCE VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// UI theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// `dark`
    Dark,
    /// `light`
    Light,
}

impl Theme {
    /// Record value.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Case-sensitive: only `dark` and `light` parse.
impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

/// Gas price priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasPriority {
    /// `low`
    Low,
    /// `medium`
    Medium,
    /// `high`
    High,
}

impl GasPriority {
    /// Record value (always lowercase).
    pub fn as_str(self) -> &'static str {
        match self {
            GasPriority::Low => "low",
            GasPriority::Medium => "medium",
            GasPriority::High => "high",
        }
    }
}

/// Case-insensitive.
impl FromStr for GasPriority {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(GasPriority::Low),
            "medium" => Ok(GasPriority::Medium),
            "high" => Ok(GasPriority::High),
            _ => Err(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCE SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw text record values, as fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPreferences {
    /// `com.pancakeswap.slippage`
    pub slippage: Option<String>,
    /// `com.pancakeswap.theme`
    pub theme: Option<String>,
    /// `com.pancakeswap.expertMode`
    pub expert_mode: Option<String>,
    /// `com.pancakeswap.gas`
    pub gas: Option<String>,
}

impl RawPreferences {
    /// Stores the raw value fetched for `key`.
    pub fn set(&mut self, key: PreferenceKey, value: Option<String>) {
        let slot = match key {
            PreferenceKey::Slippage => &mut self.slippage,
            PreferenceKey::Theme => &mut self.theme,
            PreferenceKey::ExpertMode => &mut self.expert_mode,
            PreferenceKey::Gas => &mut self.gas,
        };
        *slot = value;
    }
}

/// Validated preferences. Each field is independently optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    /// Slippage in percent, as written in the record (within [0, 50])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<String>,
    /// UI theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Expert mode toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_mode: Option<bool>,
    /// Gas price priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_priority: Option<GasPriority>,
}

impl PreferenceSet {
    /// True if at least one field survived validation.
    pub fn has_any_preferences(&self) -> bool {
        self.slippage.is_some()
            || self.theme.is_some()
            || self.expert_mode.is_some()
            || self.gas_priority.is_some()
    }

    /// Renders the present fields as `(record key, value)` pairs.
    pub fn to_text_records(&self) -> Vec<(&'static str, String)> {
        let mut records = Vec::new();
        if let Some(slippage) = &self.slippage {
            records.push((SLIPPAGE_RECORD_KEY, slippage.clone()));
        }
        if let Some(theme) = self.theme {
            records.push((THEME_RECORD_KEY, theme.as_str().to_string()));
        }
        if let Some(expert) = self.expert_mode {
            records.push((EXPERT_MODE_RECORD_KEY, expert.to_string()));
        }
        if let Some(gas) = self.gas_priority {
            records.push((GAS_RECORD_KEY, gas.as_str().to_string()));
        }
        records
    }
}

/// Snapshot of a preference lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceState {
    /// Input key this state belongs to
    pub key: String,
    /// Decoded preferences
    pub preferences: PreferenceSet,
    /// Record lookups outstanding
    pub is_loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_is_case_sensitive() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Dark".parse::<Theme>().is_err());
        assert!("LIGHT".parse::<Theme>().is_err());
    }

    #[test]
    fn test_gas_is_case_insensitive() {
        assert_eq!("HIGH".parse::<GasPriority>(), Ok(GasPriority::High));
        assert_eq!("Medium".parse::<GasPriority>(), Ok(GasPriority::Medium));
        assert!("fast".parse::<GasPriority>().is_err());
    }

    #[test]
    fn test_has_any_preferences() {
        assert!(!PreferenceSet::default().has_any_preferences());
        let prefs = PreferenceSet {
            expert_mode: Some(false),
            ..Default::default()
        };
        assert!(prefs.has_any_preferences());
    }

    #[test]
    fn test_to_text_records() {
        let prefs = PreferenceSet {
            slippage: Some("0.5".into()),
            theme: None,
            expert_mode: Some(true),
            gas_priority: Some(GasPriority::Low),
        };
        assert_eq!(
            prefs.to_text_records(),
            vec![
                ("com.pancakeswap.slippage", "0.5".to_string()),
                ("com.pancakeswap.expertMode", "true".to_string()),
                ("com.pancakeswap.gas", "low".to_string()),
            ]
        );
    }

    #[test]
    fn test_raw_set() {
        let mut raw = RawPreferences::default();
        raw.set(PreferenceKey::Gas, Some("high".into()));
        assert_eq!(raw.gas.as_deref(), Some("high"));
    }
}
