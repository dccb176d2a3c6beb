//! Normalized ledger event payloads
//!
//! The bridge turns raw ledger events into these messages; the engine never
//! sees the underlying contract ABI.

use serde::{Deserialize, Serialize};

use crate::types::{flight::FlightKey, oracle::OracleAddress, status::FlightStatus};

/// A `StatusRequested` event observed on the ledger
///
/// A fact to react to, not a stored entity: the ledger owns request
/// lifecycle, and redelivery on reconnect is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Index label the ledger chose for this request
    pub request_index: u8,
    /// Flight being queried
    pub flight: FlightKey,
}

impl StatusRequest {
    pub fn new(request_index: u8, flight: FlightKey) -> Self {
        Self {
            request_index,
            flight,
        }
    }
}

/// A response produced by one oracle for one request
///
/// Created immediately after an index match, submitted exactly once per
/// `(oracle, request)` pair, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Oracle that produced the response (back-reference, not ownership)
    pub oracle: OracleAddress,
    /// Index the request was tagged with
    pub request_index: u8,
    /// Flight being answered
    pub flight: FlightKey,
    /// Sampled status value
    pub status: FlightStatus,
}

impl StatusResponse {
    pub fn new(
        oracle: OracleAddress,
        request_index: u8,
        flight: FlightKey,
        status: FlightStatus,
    ) -> Self {
        Self {
            oracle,
            request_index,
            flight,
            status,
        }
    }
}
