//! Error types for Ensign.
//!
//! Lookups and contract reads return these errors to their immediate caller.
//! The resolvers absorb them into absent or invalid result states.

use thiserror::Error;

/// Result type alias using `EnsignError`.
pub type Result<T> = std::result::Result<T, EnsignError>;

/// Main error type for all Ensign operations.
#[derive(Debug, Error)]
pub enum EnsignError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Name failed ENS normalization.
    #[error("Cannot normalize '{name}': {reason}")]
    Normalization { name: String, reason: String },

    /// Malformed hex address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONTRACT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// `eth_call` reverted or the target has no code.
    #[error("Contract call to {to} failed: {reason}")]
    ContractCallFailed { to: String, reason: String },

    /// Return data did not match the expected ABI.
    #[error("ABI decode error: {0}")]
    AbiDecode(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Connection timeout.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    /// No RPC endpoint configured for the chain.
    #[error("No RPC endpoint configured for chain {0}")]
    UnsupportedChain(u64),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EnsignError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EnsignError::HttpError(_)
                | EnsignError::ConnectionTimeout(_)
                | EnsignError::RpcError(_)
        )
    }
}
