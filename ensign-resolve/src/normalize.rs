//! Rule-based ENS name normalization.
//!
//! Covers the subset of ENSIP-15 that matters for user-typed names: case
//! folding, label structure, and the ASCII character set. Non-ASCII letters
//! and emoji pass through after lowercasing.

use ensign_core::error::{EnsignError, Result};
use ensign_core::traits::NameNormalizer;

/// Default [`NameNormalizer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicNormalizer;

impl BasicNormalizer {
    /// Creates a new normalizer.
    pub fn new() -> Self {
        Self
    }

    fn check_label(name: &str, label: &str) -> Result<()> {
        let fail = |reason: String| EnsignError::Normalization {
            name: name.to_string(),
            reason,
        };

        if label.is_empty() {
            return Err(fail("empty label".into()));
        }

        let mut seen_body = false;
        for c in label.chars() {
            if c == '_' {
                if seen_body {
                    return Err(fail(format!("underscore allowed only at start of '{label}'")));
                }
                continue;
            }
            seen_body = true;

            if c.is_ascii() {
                if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '$') {
                    return Err(fail(format!("disallowed character {c:?}")));
                }
            } else if c.is_whitespace() || c.is_control() {
                return Err(fail(format!("disallowed character {:?}", c)));
            }
        }

        if label.is_ascii() && label.len() >= 4 && &label[2..4] == "--" {
            return Err(fail(format!("invalid label extension in '{label}'")));
        }

        Ok(())
    }
}

impl NameNormalizer for BasicNormalizer {
    fn normalize(&self, raw: &str) -> Result<String> {
        if raw.is_empty() {
            return Err(EnsignError::Normalization {
                name: raw.to_string(),
                reason: "empty name".into(),
            });
        }

        let normalized = raw.to_lowercase();
        for label in normalized.split('.') {
            Self::check_label(raw, label)?;
        }
        Ok(normalized)
    }
}
