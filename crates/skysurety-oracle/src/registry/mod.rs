//! Oracle roster and registration
//!
//! Holds every oracle account registered in this run together with its
//! assigned index labels. Strictly append-only: no node is removed or
//! reassigned for the lifetime of the process.

pub mod assigner;

use std::collections::HashSet;

use parking_lot::Mutex;
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use skysurety_common::{
    error::RegistryError, OracleAddress, OracleNode, Result, SuretyError,
};

use crate::registry::assigner::IndexAssigner;

struct RegistryInner {
    /// Nodes in registration order (deterministic iteration for matching)
    nodes: Vec<OracleNode>,
    /// Registered addresses for duplicate rejection
    addresses: HashSet<OracleAddress>,
    /// Shared randomness stream for index assignment
    rng: StdRng,
}

/// Append-only roster of registered oracle nodes
///
/// Registration is serialized by a single interior lock so two concurrent
/// registrations can neither double-register an address nor interleave
/// their draws from the shared randomness stream. Injected explicitly into
/// the coordinator rather than held as process-wide state, so independent
/// simulation runs can coexist in one process.
pub struct OracleRegistry {
    assigner: IndexAssigner,
    inner: Mutex<RegistryInner>,
}

impl OracleRegistry {
    /// Create a registry over the label pool `[0, pool_size)`
    pub fn new(pool_size: u8) -> Result<Self> {
        Self::with_rng(pool_size, StdRng::from_entropy())
    }

    /// Create a registry with an explicit randomness stream (tests)
    pub fn with_rng(pool_size: u8, rng: StdRng) -> Result<Self> {
        Ok(Self {
            assigner: IndexAssigner::new(pool_size)?,
            inner: Mutex::new(RegistryInner {
                nodes: Vec::new(),
                addresses: HashSet::new(),
                rng,
            }),
        })
    }

    /// Register an oracle account and assign its index labels
    ///
    /// Fails with `AlreadyRegistered` if the address already holds a node;
    /// rejection, not a silent no-op.
    pub fn register(&self, address: OracleAddress) -> Result<OracleNode> {
        let mut inner = self.inner.lock();
        if inner.addresses.contains(&address) {
            return Err(SuretyError::Registry(RegistryError::AlreadyRegistered(
                address,
            )));
        }
        let indices = self.assigner.assign(&mut inner.rng);
        let node = OracleNode::new(address.clone(), indices);
        inner.addresses.insert(address);
        inner.nodes.push(node.clone());
        debug!(oracle = %node.address, indices = %node.indices, "Oracle registered");
        Ok(node)
    }

    /// Every registered node holding the given index, in registration order
    pub fn nodes_matching_index(&self, index: u8) -> Vec<OracleNode> {
        let inner = self.inner.lock();
        inner
            .nodes
            .iter()
            .filter(|node| node.matches(index))
            .cloned()
            .collect()
    }

    /// Number of registered nodes
    pub fn count(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    /// Size of the index label pool this registry mirrors
    pub fn pool_size(&self) -> u8 {
        self.assigner.pool_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> OracleRegistry {
        OracleRegistry::with_rng(10, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_register_assigns_three_distinct_indices() {
        let registry = registry();
        let node = registry
            .register(OracleAddress::new("0x01"))
            .unwrap();
        let labels = node.indices.labels();
        assert!(labels.iter().all(|&l| l < 10));
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
        assert_ne!(labels[1], labels[2]);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = registry();
        registry.register(OracleAddress::new("0x01")).unwrap();
        let err = registry.register(OracleAddress::new("0x01")).unwrap_err();
        assert!(matches!(
            err,
            SuretyError::Registry(RegistryError::AlreadyRegistered(_))
        ));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_matching_is_complete_and_in_registration_order() {
        let registry = registry();
        let registered: Vec<_> = (0..20)
            .map(|i| {
                registry
                    .register(OracleAddress::new(format!("0x{i:02}")))
                    .unwrap()
            })
            .collect();

        for index in 0..10 {
            let expected: Vec<_> = registered
                .iter()
                .filter(|n| n.matches(index))
                .cloned()
                .collect();
            assert_eq!(registry.nodes_matching_index(index), expected);
        }
    }

    #[test]
    fn test_no_match_outside_pool() {
        let registry = registry();
        for i in 0..5 {
            registry
                .register(OracleAddress::new(format!("0x{i:02}")))
                .unwrap();
        }
        assert!(registry.nodes_matching_index(55).is_empty());
    }
}
