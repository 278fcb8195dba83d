//! # Ensign Core
//!
//! Core types, errors, and traits shared by the Ensign resolution crates.
//!
//! This crate provides the foundational building blocks used by all other Ensign crates:
//!
//! - **Types**: identities, social records, token resolutions, preferences, chains
//! - **Errors**: a single error enum with recoverability classification
//! - **Constants**: ENS record keys, registry address, timing defaults
//! - **Traits**: the lookup collaborators (ENS, contract calls, normalization)
//!
//! ## Example
//!
//! ```rust
//! use ensign_core::{PreferenceSet, Theme};
//!
//! let prefs = PreferenceSet {
//!     theme: Some(Theme::Dark),
//!     ..Default::default()
//! };
//! assert!(prefs.has_any_preferences());
//! let json = serde_json::to_string(&prefs).unwrap();
//! assert!(json.contains("dark"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use alloy::primitives::Address;
pub use constants::*;
pub use error::{EnsignError, Result};
pub use traits::*;
pub use types::*;
