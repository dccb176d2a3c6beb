//! Oracle identity and index assignment types
//!
//! An oracle is an off-chain account registered to answer flight status
//! queries. At registration the ledger assigns it three index labels; a
//! request is only answerable by oracles holding the request's index.

use serde::{Deserialize, Serialize};

use crate::INDICES_PER_ORACLE;

/// Opaque account identifier for an oracle (the address that registered)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OracleAddress(String);

impl OracleAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Generate a simulated account address from 20 random bytes
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        let mut bytes = [0u8; 20];
        rng.fill(&mut bytes[..]);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OracleAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index labels held by one oracle
///
/// Exactly three distinct labels drawn from `[0, pool_size)`, assigned once
/// at registration and immutable for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSet([u8; INDICES_PER_ORACLE]);

impl IndexSet {
    /// Build from three labels. Caller guarantees distinctness; the
    /// assigner is the only production constructor.
    pub fn new(labels: [u8; INDICES_PER_ORACLE]) -> Self {
        debug_assert!(
            labels[0] != labels[1] && labels[0] != labels[2] && labels[1] != labels[2],
            "index labels must be distinct"
        );
        Self(labels)
    }

    /// Whether this oracle is eligible to answer a request with the given index
    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    pub fn labels(&self) -> &[u8; INDICES_PER_ORACLE] {
        &self.0
    }
}

impl std::fmt::Display for IndexSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

/// A registered oracle node
///
/// Created on successful registration, never removed during a run; the
/// index set is never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleNode {
    /// Account that registered
    pub address: OracleAddress,
    /// Index labels assigned at registration
    pub indices: IndexSet,
}

impl OracleNode {
    pub fn new(address: OracleAddress, indices: IndexSet) -> Self {
        Self { address, indices }
    }

    /// Whether this node is eligible for a request with the given index
    pub fn matches(&self, index: u8) -> bool {
        self.indices.contains(index)
    }
}
