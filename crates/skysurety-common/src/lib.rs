//! # SkySurety Common
//!
//! Shared domain types and errors for the SkySurety oracle network.
//!
//! ## Core Types
//!
//! - [`OracleAddress`]: opaque account identifier for a registered oracle
//! - [`IndexSet`]: the three index labels assigned to an oracle at registration
//! - [`OracleNode`]: a registered oracle and its immutable index set
//! - [`FlightKey`]: the `(airline, flight_code, timestamp)` request key
//! - [`FlightStatus`]: the six flight status codes reported by oracles
//! - [`StatusRequest`]/[`StatusResponse`]: normalized ledger event payloads

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{BridgeError, RegistryError, Result, SuretyError};
pub use types::{
    events::{StatusRequest, StatusResponse},
    flight::FlightKey,
    oracle::{IndexSet, OracleAddress, OracleNode},
    status::FlightStatus,
};

/// SkySurety version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of index labels assigned to each oracle at registration
pub const INDICES_PER_ORACLE: usize = 3;

/// Size of the index label pool mirrored from the ledger contract
pub const DEFAULT_INDEX_POOL_SIZE: u8 = 10;

/// Minimum matching responses required to finalize a status value
pub const DEFAULT_QUORUM_THRESHOLD: usize = 3;
