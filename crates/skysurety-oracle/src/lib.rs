//! # SkySurety Oracle
//!
//! Oracle coordination engine for a smart-contract flight insurance ledger.
//!
//! The ledger cannot call external services itself: it emits a
//! `StatusRequested` event and registered off-chain oracles race to answer
//! it. This crate is the off-chain side of that protocol: it registers a
//! roster of oracle accounts, watches the ledger event stream, submits a
//! simulated status response from every eligible oracle, and tracks how many
//! matching responses each status value has collected.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SkySurety Oracle                         │
//! │                                                              │
//! │  StatusRequested      ┌─────────────────────┐                │
//! │  ──────────────────►  │ ResponseCoordinator │                │
//! │   (EventBridge)       └──────────┬──────────┘                │
//! │                          │       │        │                  │
//! │                 ┌────────┘       │        └─────────┐        │
//! │                 ▼                ▼                  ▼        │
//! │        ┌────────────────┐ ┌──────────────┐ ┌──────────────┐ │
//! │        │ OracleRegistry │ │ StatusSampler│ │ QuorumTracker│ │
//! │        │ (IndexAssigner)│ │  (6 codes)   │ │  (3-of-N)    │ │
//! │        └────────────────┘ └──────────────┘ └──────────────┘ │
//! │                                  │                           │
//! │  submit_response(StatusResponse) ▼                           │
//! │  ◄──────────────────────── EventBridge                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger is reached only through the [`EventBridge`] seam; requests
//! arrive as normalized messages on a channel and responses go back through
//! `submit_response`, which the ledger may reject. Quorum bookkeeping is
//! local: the engine mirrors the ledger's finalization rule so operators can
//! observe resolution without reading contract state.

pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod quorum;
pub mod registry;
pub mod sampler;

// Re-export core types
pub use bridge::{simulated::SimulatedLedger, EventBridge};
pub use config::OracleServiceConfig;
pub use coordinator::{CoordinatorMetrics, MetricsSnapshot, ResponseCoordinator};
pub use quorum::{QuorumTracker, ResolutionRecord};
pub use registry::{assigner::IndexAssigner, OracleRegistry};
pub use sampler::{RandomSampler, SequenceSampler, StatusSampler};

/// SkySurety oracle service version
pub const ORACLE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of simulated oracle accounts registered at startup
pub const DEFAULT_ORACLE_COUNT: usize = 20;

/// Request channel buffer before the bridge sees backpressure
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
