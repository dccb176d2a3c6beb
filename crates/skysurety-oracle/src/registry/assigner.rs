//! Index assignment for newly registered oracles
//!
//! The deployed ledger assigns each oracle three pseudo-random index labels
//! on-chain at registration. This assigner mirrors that rule with the pool
//! size obtained once at startup and treated as fixed configuration.

use rand::Rng;

use skysurety_common::{
    error::RegistryError, IndexSet, Result, SuretyError, INDICES_PER_ORACLE,
};

/// Draws index label sets for registering oracles
///
/// Pure given an RNG: no state beyond the pool size, no side effects beyond
/// consuming randomness. The registry serializes calls so two registrations
/// never interleave their draws.
#[derive(Debug, Clone)]
pub struct IndexAssigner {
    pool_size: u8,
}

impl IndexAssigner {
    /// Create an assigner over the label pool `[0, pool_size)`
    pub fn new(pool_size: u8) -> Result<Self> {
        if (pool_size as usize) < INDICES_PER_ORACLE {
            return Err(SuretyError::Registry(RegistryError::PoolTooSmall {
                needed: INDICES_PER_ORACLE,
                pool_size,
            }));
        }
        Ok(Self { pool_size })
    }

    /// Draw exactly three distinct labels, redrawing duplicates
    pub fn assign(&self, rng: &mut impl Rng) -> IndexSet {
        let mut labels = [0u8; INDICES_PER_ORACLE];
        let mut drawn = 0;
        while drawn < INDICES_PER_ORACLE {
            let candidate = rng.gen_range(0..self.pool_size);
            if !labels[..drawn].contains(&candidate) {
                labels[drawn] = candidate;
                drawn += 1;
            }
        }
        IndexSet::new(labels)
    }

    pub fn pool_size(&self) -> u8 {
        self.pool_size
    }
}
