//! TTL cache for Ensign lookups.
//!
//! Generic in-memory cache with configurable capacity and expiration.

mod cache;

pub use cache::{CacheConfig, TtlCache};
