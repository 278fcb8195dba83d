//! Domain types for Ensign.
//!
//! This module provides the data structures produced by the resolvers:
//!
//! - [`Chain`]: connected network and its ENS chain
//! - [`InputKind`]: classification of free-text input
//! - [`ResolvedIdentity`] / [`SocialRecords`]: name resolution output
//! - [`TokenResolution`]: token-import resolution output
//! - [`PreferenceSet`]: decoded vendor preferences

mod address;
mod chain;
mod identity;
mod preferences;
mod token;

pub use address::*;
pub use chain::*;
pub use identity::*;
pub use preferences::*;
pub use token::*;
