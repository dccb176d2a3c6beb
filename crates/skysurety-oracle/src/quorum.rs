//! Quorum-based resolution tracking
//!
//! Accumulates submitted responses keyed by `(flight, status)` and flags a
//! request as resolved once enough oracles report the same value. Mirrors
//! the ledger's finalization rule so the engine can observe resolution
//! without reading contract state.

use dashmap::{mapref::entry::Entry, DashMap};
use serde::Serialize;

use skysurety_common::{FlightKey, FlightStatus, OracleAddress, StatusResponse};

/// Per-`(flight, status)` vote tally
///
/// Created lazily on the first response to a new key and never removed
/// during the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionRecord {
    /// Distinct oracles that reported this exact value
    pub count: usize,
    /// Set the instant `count` first reaches the quorum threshold
    pub resolved: bool,
}

/// Tracks responses per request key and detects quorum crossings
///
/// An oracle's first response to a given request is authoritative: later
/// responses from the same oracle for the same flight are ignored, so a
/// node cannot change its vote and redelivered events cannot double-count.
/// The first status value to reach the threshold finalizes the request;
/// the tracker does not arbitrate between values that would both cross.
pub struct QuorumTracker {
    threshold: usize,
    /// Dedup: one vote per (oracle, flight)
    seen: DashMap<(OracleAddress, FlightKey), ()>,
    /// Vote tallies per (flight, status)
    records: DashMap<(FlightKey, FlightStatus), ResolutionRecord>,
    /// First status value to reach quorum per flight
    winners: DashMap<FlightKey, FlightStatus>,
}

impl QuorumTracker {
    /// Create a tracker with the given quorum threshold
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            seen: DashMap::new(),
            records: DashMap::new(),
            winners: DashMap::new(),
        }
    }

    /// Record one submitted response
    ///
    /// Returns `true` exactly on the transition where the count for this
    /// response's `(flight, status)` key first reaches the threshold and no
    /// other value has already finalized the flight; `false` otherwise,
    /// including duplicates and every call after resolution.
    pub fn record(&self, response: &StatusResponse) -> bool {
        let vote_key = (response.oracle.clone(), response.flight.clone());
        if self.seen.insert(vote_key, ()).is_some() {
            // vote already cast for this flight, no change
            return false;
        }

        let mut record = self
            .records
            .entry((response.flight.clone(), response.status))
            .or_default();
        record.count += 1;

        if record.count >= self.threshold && !record.resolved {
            // single global check per submission: the first value to cross
            // claims the flight, a later value crossing changes nothing
            match self.winners.entry(response.flight.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(response.status);
                    record.resolved = true;
                    return true;
                }
                Entry::Occupied(_) => return false,
            }
        }
        false
    }

    /// Whether any status value for this flight has reached quorum
    pub fn is_resolved(&self, flight: &FlightKey) -> bool {
        self.winners.contains_key(flight)
    }

    /// The finalized status value for this flight, if any
    pub fn resolution(&self, flight: &FlightKey) -> Option<FlightStatus> {
        self.winners.get(flight).map(|status| *status)
    }

    /// Current tally for one `(flight, status)` key
    pub fn tally(&self, flight: &FlightKey, status: FlightStatus) -> Option<ResolutionRecord> {
        self.records
            .get(&(flight.clone(), status))
            .map(|r| r.value().clone())
    }

    /// Total votes recorded across all keys
    pub fn votes_recorded(&self) -> usize {
        self.seen.len()
    }

    /// Number of flights that have reached quorum
    pub fn resolved_count(&self) -> usize {
        self.winners.len()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(oracle: &str, status: FlightStatus) -> StatusResponse {
        StatusResponse::new(
            OracleAddress::new(oracle),
            7,
            FlightKey::new("0xAA", "1332", 1587423057711),
            status,
        )
    }

    #[test]
    fn test_quorum_transition_at_threshold() {
        let tracker = QuorumTracker::new(3);

        assert!(!tracker.record(&response("0x01", FlightStatus::LateAirline)));
        assert!(!tracker.record(&response("0x02", FlightStatus::LateAirline)));
        assert!(tracker.record(&response("0x03", FlightStatus::LateAirline)));
        // already resolved, no further transition
        assert!(!tracker.record(&response("0x04", FlightStatus::LateAirline)));

        let flight = FlightKey::new("0xAA", "1332", 1587423057711);
        assert!(tracker.is_resolved(&flight));
        assert_eq!(tracker.resolution(&flight), Some(FlightStatus::LateAirline));
    }

    #[test]
    fn test_duplicate_vote_ignored() {
        let tracker = QuorumTracker::new(3);

        assert!(!tracker.record(&response("0x01", FlightStatus::OnTime)));
        // same oracle, same flight: ignored even with a different value
        assert!(!tracker.record(&response("0x01", FlightStatus::OnTime)));
        assert!(!tracker.record(&response("0x01", FlightStatus::LateAirline)));

        let flight = FlightKey::new("0xAA", "1332", 1587423057711);
        let tally = tracker.tally(&flight, FlightStatus::OnTime).unwrap();
        assert_eq!(tally.count, 1);
        assert!(tracker.tally(&flight, FlightStatus::LateAirline).is_none());
        assert_eq!(tracker.votes_recorded(), 1);
    }

    #[test]
    fn test_disagreement_below_threshold_stays_unresolved() {
        let tracker = QuorumTracker::new(3);

        tracker.record(&response("0x01", FlightStatus::LateAirline));
        tracker.record(&response("0x02", FlightStatus::LateAirline));
        tracker.record(&response("0x03", FlightStatus::Unknown));

        let flight = FlightKey::new("0xAA", "1332", 1587423057711);
        assert!(!tracker.is_resolved(&flight));
        assert_eq!(tracker.resolution(&flight), None);
    }

    #[test]
    fn test_first_value_to_cross_wins() {
        let tracker = QuorumTracker::new(2);

        tracker.record(&response("0x01", FlightStatus::OnTime));
        assert!(tracker.record(&response("0x02", FlightStatus::OnTime)));

        // a second value crossing the threshold later changes nothing
        tracker.record(&response("0x03", FlightStatus::LateAirline));
        assert!(!tracker.record(&response("0x04", FlightStatus::LateAirline)));

        let flight = FlightKey::new("0xAA", "1332", 1587423057711);
        assert_eq!(tracker.resolution(&flight), Some(FlightStatus::OnTime));
        let tally = tracker.tally(&flight, FlightStatus::LateAirline).unwrap();
        assert_eq!(tally.count, 2);
        assert!(!tally.resolved);
    }

    #[test]
    fn test_independent_flights_resolve_independently() {
        let tracker = QuorumTracker::new(2);
        let other = FlightKey::new("0xAA", "1334", 1587423397911);

        tracker.record(&response("0x01", FlightStatus::OnTime));
        tracker.record(&StatusResponse::new(
            OracleAddress::new("0x01"),
            3,
            other.clone(),
            FlightStatus::LateWeather,
        ));
        assert!(tracker.record(&StatusResponse::new(
            OracleAddress::new("0x02"),
            3,
            other.clone(),
            FlightStatus::LateWeather,
        )));

        assert!(tracker.is_resolved(&other));
        assert!(!tracker.is_resolved(&FlightKey::new("0xAA", "1332", 1587423057711)));
    }
}
