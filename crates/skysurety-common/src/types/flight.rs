//! Flight request key

use serde::{Deserialize, Serialize};

/// Composite identifier of a flight status query
///
/// The ledger keys requests by `(airline, flight_code, timestamp)`; the
/// engine mirrors that tuple everywhere it tracks responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    /// Airline account address on the ledger
    pub airline: String,
    /// Flight code as registered (e.g., "1332")
    pub flight_code: String,
    /// Scheduled departure timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl FlightKey {
    pub fn new(airline: impl Into<String>, flight_code: impl Into<String>, timestamp: i64) -> Self {
        Self {
            airline: airline.into(),
            flight_code: flight_code.into(),
            timestamp,
        }
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.airline, self.flight_code, self.timestamp)
    }
}
