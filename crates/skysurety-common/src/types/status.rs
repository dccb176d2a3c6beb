//! Flight status codes
//!
//! The ledger contract encodes flight status as a multiple of 10 in six
//! buckets. Oracles report one of these codes per response.

use serde::{Deserialize, Serialize};

/// Flight status as reported by an oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    /// Status not yet known
    Unknown,
    /// Flight departed on time
    OnTime,
    /// Delay attributable to the airline (triggers payout on the ledger)
    LateAirline,
    /// Weather delay
    LateWeather,
    /// Technical delay
    LateTechnical,
    /// Any other delay cause
    LateOther,
}

impl FlightStatus {
    /// All six codes, in ledger code order
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    /// Numeric code as the ledger contract encodes it
    pub fn code(&self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    /// Decode a ledger status code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlightStatus::Unknown => "unknown",
            FlightStatus::OnTime => "on_time",
            FlightStatus::LateAirline => "late_airline",
            FlightStatus::LateWeather => "late_weather",
            FlightStatus::LateTechnical => "late_technical",
            FlightStatus::LateOther => "late_other",
        };
        write!(f, "{} ({})", name, self.code())
    }
}
