//! Error types for the SkySurety oracle engine
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

use crate::types::oracle::OracleAddress;

/// Result type alias using SuretyError
pub type Result<T> = std::result::Result<T, SuretyError>;

/// Unified error type for SkySurety operations
#[derive(Debug, Error)]
pub enum SuretyError {
    // Registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // Ledger bridge errors
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Oracle registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Oracle already registered: {0}")]
    AlreadyRegistered(OracleAddress),

    #[error("Index pool too small: need {needed} distinct labels, pool holds {pool_size}")]
    PoolTooSmall { needed: usize, pool_size: u8 },
}

/// Ledger bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The ledger refused the response (request closed, unknown, or index
    /// mismatch). Logged and dropped by the engine, never retried.
    #[error("Submission rejected: {reason}")]
    SubmissionRejected { reason: String },

    #[error("Event channel closed")]
    ChannelClosed,
}

impl From<serde_json::Error> for SuretyError {
    fn from(err: serde_json::Error) -> Self {
        SuretyError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for SuretyError {
    fn from(err: std::io::Error) -> Self {
        SuretyError::Internal(err.to_string())
    }
}
