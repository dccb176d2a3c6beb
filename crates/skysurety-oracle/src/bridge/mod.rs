//! Ledger boundary
//!
//! The engine's only external seam. The bridge normalizes ledger events
//! into [`StatusRequest`] messages pushed onto a channel (at-least-once:
//! the underlying event stream may redeliver on reconnect) and carries
//! responses back through [`EventBridge::submit_response`], which the
//! ledger may reject. Rejections are logged and dropped, never retried;
//! retry and timeout policy for requests belongs to the ledger.

pub mod simulated;

use async_trait::async_trait;

use skysurety_common::{Result, StatusResponse};

/// Submission sink reached through an opaque client interface
///
/// Implementations talk to the actual ledger contract (or a simulation of
/// it). A failed submission maps to `BridgeError::SubmissionRejected`.
#[async_trait]
pub trait EventBridge: Send + Sync {
    /// Send one oracle response to the ledger
    async fn submit_response(&self, response: &StatusResponse) -> Result<()>;
}
