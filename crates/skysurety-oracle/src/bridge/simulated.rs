//! In-memory ledger simulation
//!
//! Stand-in for the deployed insurance contract: it emits `StatusRequested`
//! events on demand, accepts responses while a request window is open, and
//! broadcasts every accepted response as a `StatusReported` observability
//! event. The engine under test or in a local run cannot tell it apart
//! from a real bridge.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use skysurety_common::{
    error::BridgeError, FlightKey, Result, StatusRequest, StatusResponse, SuretyError,
};

use crate::bridge::EventBridge;

/// Buffer for the `StatusReported` broadcast feed
const REPORT_FEED_CAPACITY: usize = 256;

/// Simulated insurance ledger
///
/// Requests are opened by [`request_status`](Self::request_status) and stay
/// open until [`close_request`](Self::close_request); a response for an
/// unknown or closed flight, or with a mismatched index, is rejected the
/// way the contract would revert it.
pub struct SimulatedLedger {
    /// Taken on shutdown so the request stream closes
    request_tx: Mutex<Option<mpsc::Sender<StatusRequest>>>,
    /// Open request windows: flight -> index the ledger chose
    open_requests: DashMap<FlightKey, u8>,
    report_tx: broadcast::Sender<StatusResponse>,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl SimulatedLedger {
    /// Create a ledger and the request stream the coordinator consumes
    pub fn new(channel_buffer: usize) -> (Arc<Self>, mpsc::Receiver<StatusRequest>) {
        let (request_tx, request_rx) = mpsc::channel(channel_buffer);
        let (report_tx, _) = broadcast::channel(REPORT_FEED_CAPACITY);
        let ledger = Arc::new(Self {
            request_tx: Mutex::new(Some(request_tx)),
            open_requests: DashMap::new(),
            report_tx,
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        });
        (ledger, request_rx)
    }

    /// Open a request window and emit a `StatusRequested` event
    ///
    /// Calling again for an already-open flight re-emits the event, which
    /// models redelivery on reconnect; downstream dedup absorbs it.
    pub async fn request_status(&self, request_index: u8, flight: FlightKey) -> Result<()> {
        let tx = self
            .request_tx
            .lock()
            .clone()
            .ok_or(SuretyError::Bridge(BridgeError::ChannelClosed))?;
        self.open_requests.insert(flight.clone(), request_index);
        debug!(flight = %flight, index = request_index, "StatusRequested emitted");
        tx.send(StatusRequest::new(request_index, flight))
            .await
            .map_err(|_| SuretyError::Bridge(BridgeError::ChannelClosed))
    }

    /// Close the request stream; the coordinator drains and exits
    pub fn shutdown(&self) {
        self.request_tx.lock().take();
    }

    /// Stop accepting responses for a flight (post-finalization)
    ///
    /// Returns whether a window was actually open.
    pub fn close_request(&self, flight: &FlightKey) -> bool {
        let closed = self.open_requests.remove(flight).is_some();
        if closed {
            debug!(flight = %flight, "Request window closed");
        }
        closed
    }

    /// Whether the ledger is still accepting responses for a flight
    pub fn is_open(&self, flight: &FlightKey) -> bool {
        self.open_requests.contains_key(flight)
    }

    /// Subscribe to `StatusReported` events for every accepted response
    ///
    /// Monitoring only; quorum logic never reads this feed.
    pub fn subscribe_reports(&self) -> broadcast::Receiver<StatusResponse> {
        self.report_tx.subscribe()
    }

    /// Responses accepted so far
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Responses rejected so far
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventBridge for SimulatedLedger {
    async fn submit_response(&self, response: &StatusResponse) -> Result<()> {
        let open_index = self.open_requests.get(&response.flight).map(|idx| *idx);
        let rejection = match open_index {
            None => Some("no open request for flight".to_string()),
            Some(index) if index != response.request_index => Some(format!(
                "index mismatch: request is open under {index}, got {}",
                response.request_index
            )),
            Some(_) => None,
        };

        if let Some(reason) = rejection {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(SuretyError::Bridge(BridgeError::SubmissionRejected {
                reason,
            }));
        }

        self.accepted.fetch_add(1, Ordering::Relaxed);
        // no listener is fine, the feed is observability only
        let _ = self.report_tx.send(response.clone());
        Ok(())
    }
}
