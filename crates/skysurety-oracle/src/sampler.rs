//! Status value generation
//!
//! Each eligible oracle draws its own status value independently, so
//! oracles can genuinely disagree and quorum is meaningful. The sampler is
//! a seam: production uses a uniform draw over the six ledger codes, tests
//! substitute deterministic sources.

use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

use skysurety_common::FlightStatus;

/// Source of simulated status values
pub trait StatusSampler: Send + Sync {
    /// Draw one status value for one oracle's response
    fn sample(&self) -> FlightStatus;
}

/// Uniform draw over the six ledger status codes
pub struct RandomSampler {
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded variant for reproducible simulation runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSampler for RandomSampler {
    fn sample(&self) -> FlightStatus {
        let mut rng = self.rng.lock();
        let pick = rng.gen_range(0..FlightStatus::ALL.len());
        FlightStatus::ALL[pick]
    }
}

/// Cycles through a fixed sequence of status values
///
/// Deterministic stand-in for tests and demos: a single-element sequence
/// makes every oracle agree, a mixed sequence scripts disagreement.
pub struct SequenceSampler {
    sequence: Vec<FlightStatus>,
    cursor: Mutex<usize>,
}

impl SequenceSampler {
    pub fn new(sequence: Vec<FlightStatus>) -> Self {
        assert!(!sequence.is_empty(), "sequence must not be empty");
        Self {
            sequence,
            cursor: Mutex::new(0),
        }
    }

    /// Every draw returns the same value
    pub fn fixed(status: FlightStatus) -> Self {
        Self::new(vec![status])
    }
}

impl StatusSampler for SequenceSampler {
    fn sample(&self) -> FlightStatus {
        let mut cursor = self.cursor.lock();
        let status = self.sequence[*cursor % self.sequence.len()];
        *cursor += 1;
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sampler_stays_in_code_set() {
        let sampler = RandomSampler::seeded(9);
        for _ in 0..100 {
            let status = sampler.sample();
            assert!(FlightStatus::ALL.contains(&status));
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let a = RandomSampler::seeded(42);
        let b = RandomSampler::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_sequence_sampler_cycles() {
        let sampler =
            SequenceSampler::new(vec![FlightStatus::LateAirline, FlightStatus::Unknown]);
        assert_eq!(sampler.sample(), FlightStatus::LateAirline);
        assert_eq!(sampler.sample(), FlightStatus::Unknown);
        assert_eq!(sampler.sample(), FlightStatus::LateAirline);
    }
}
