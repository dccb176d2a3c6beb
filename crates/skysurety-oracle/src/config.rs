//! Oracle service configuration

use serde::{Deserialize, Serialize};

use skysurety_common::{DEFAULT_INDEX_POOL_SIZE, DEFAULT_QUORUM_THRESHOLD};

use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_ORACLE_COUNT};

/// Oracle service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleServiceConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Simulated oracle accounts registered at startup
    pub oracle_count: usize,
    /// Index label pool size mirrored from the ledger contract
    pub index_pool_size: u8,
    /// Matching responses required to finalize a status value
    pub quorum_threshold: usize,
    /// Request channel buffer
    pub channel_buffer: usize,
    /// Interval between simulated demo status requests (milliseconds)
    pub demo_request_interval_ms: u64,
}

impl Default for OracleServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8085,
            oracle_count: DEFAULT_ORACLE_COUNT,
            index_pool_size: DEFAULT_INDEX_POOL_SIZE,
            quorum_threshold: DEFAULT_QUORUM_THRESHOLD,
            channel_buffer: DEFAULT_CHANNEL_CAPACITY,
            demo_request_interval_ms: 5000,
        }
    }
}

impl OracleServiceConfig {
    /// Load configuration from environment and .env
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();

        // deployment platforms set PORT, it takes priority
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }

        if let Ok(host) = std::env::var("SKYSURETY_HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("SKYSURETY_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(val) = std::env::var("SKYSURETY_ORACLE_COUNT") {
            if let Ok(v) = val.parse() {
                cfg.oracle_count = v;
            }
        }
        if let Ok(val) = std::env::var("SKYSURETY_INDEX_POOL_SIZE") {
            if let Ok(v) = val.parse() {
                cfg.index_pool_size = v;
            }
        }
        if let Ok(val) = std::env::var("SKYSURETY_QUORUM_THRESHOLD") {
            if let Ok(v) = val.parse() {
                cfg.quorum_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("SKYSURETY_CHANNEL_BUFFER") {
            if let Ok(v) = val.parse() {
                cfg.channel_buffer = v;
            }
        }
        if let Ok(val) = std::env::var("SKYSURETY_DEMO_INTERVAL_MS") {
            if let Ok(v) = val.parse() {
                cfg.demo_request_interval_ms = v;
            }
        }

        Ok(cfg)
    }
}
