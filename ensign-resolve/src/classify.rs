//! Input classification.

use tracing::warn;

use ensign_core::traits::NameNormalizer;
use ensign_core::types::{parse_address, InputKind};

/// Classifies free text as an address, an ENS name, or neither.
///
/// The address check runs first. Anything else containing a `.` goes through
/// `normalizer`; a normalization failure is logged and yields
/// [`InputKind::Invalid`].
pub fn classify(input: &str, normalizer: &dyn NameNormalizer) -> InputKind {
    let input = input.trim();
    if input.is_empty() {
        return InputKind::Invalid;
    }

    if let Some(address) = parse_address(input) {
        return InputKind::Address(address);
    }

    if input.contains('.') {
        return match normalizer.normalize(input) {
            Ok(name) => InputKind::EnsName(name),
            Err(e) => {
                warn!(input, error = %e, "ENS name failed normalization");
                InputKind::Invalid
            }
        };
    }

    InputKind::Invalid
}
