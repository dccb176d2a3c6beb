//! Response coordination
//!
//! Consumes the normalized `StatusRequested` stream and, for each request,
//! fans a simulated response out from every eligible oracle. Requests are
//! independent units of work handled concurrently; within one request the
//! per-oracle submissions have no ordering dependency and run in parallel.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use skysurety_common::{FlightKey, FlightStatus, OracleNode, StatusRequest, StatusResponse};

use crate::{
    bridge::EventBridge, quorum::QuorumTracker, registry::OracleRegistry, sampler::StatusSampler,
};

/// Coordinator counters
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    pub requests_received: AtomicU64,
    pub requests_dropped: AtomicU64,
    pub responses_submitted: AtomicU64,
    pub responses_rejected: AtomicU64,
    pub requests_resolved: AtomicU64,
}

/// Point-in-time copy of the counters, wire-ready for the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub requests_dropped: u64,
    pub responses_submitted: u64,
    pub responses_rejected: u64,
    pub requests_resolved: u64,
}

impl CoordinatorMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_dropped: self.requests_dropped.load(Ordering::Relaxed),
            responses_submitted: self.responses_submitted.load(Ordering::Relaxed),
            responses_rejected: self.responses_rejected.load(Ordering::Relaxed),
            requests_resolved: self.requests_resolved.load(Ordering::Relaxed),
        }
    }
}

/// Coordinates oracle responses to incoming status requests
///
/// Per request: look up the eligible oracles, drop the request if none
/// match, otherwise sample an independent status value per oracle and
/// submit each through the bridge. Accepted responses feed the quorum
/// tracker; rejections are logged and dropped. Duplicate request delivery
/// is safe to re-run end to end because the tracker deduplicates votes.
pub struct ResponseCoordinator {
    registry: Arc<OracleRegistry>,
    bridge: Arc<dyn EventBridge>,
    sampler: Arc<dyn StatusSampler>,
    quorum: Arc<QuorumTracker>,
    metrics: Arc<CoordinatorMetrics>,
    /// Resolution notifications for whoever closes ledger request windows
    resolution_tx: Option<mpsc::UnboundedSender<(FlightKey, FlightStatus)>>,
}

impl ResponseCoordinator {
    pub fn new(
        registry: Arc<OracleRegistry>,
        bridge: Arc<dyn EventBridge>,
        sampler: Arc<dyn StatusSampler>,
        quorum: Arc<QuorumTracker>,
    ) -> Self {
        Self {
            registry,
            bridge,
            sampler,
            quorum,
            metrics: Arc::new(CoordinatorMetrics::default()),
            resolution_tx: None,
        }
    }

    /// Send `(flight, status)` on this channel when a request reaches quorum
    pub fn with_resolution_notify(
        mut self,
        tx: mpsc::UnboundedSender<(FlightKey, FlightStatus)>,
    ) -> Self {
        self.resolution_tx = Some(tx);
        self
    }

    pub fn metrics(&self) -> Arc<CoordinatorMetrics> {
        self.metrics.clone()
    }

    pub fn quorum(&self) -> Arc<QuorumTracker> {
        self.quorum.clone()
    }

    /// Consume the request stream until the bridge closes it
    ///
    /// Each request is spawned as its own task; on shutdown the in-flight
    /// requests are drained before returning.
    pub async fn run(self: Arc<Self>, mut requests: mpsc::Receiver<StatusRequest>) {
        let mut in_flight = JoinSet::new();
        while let Some(request) = requests.recv().await {
            let coordinator = self.clone();
            in_flight.spawn(async move {
                coordinator.handle_request(request).await;
            });
            // reap finished tasks so the set does not grow unbounded
            while in_flight.try_join_next().is_some() {}
        }
        while in_flight.join_next().await.is_some() {}
        info!("Request stream closed, coordinator exiting");
    }

    /// Handle one `StatusRequested` event
    #[instrument(skip(self, request), fields(flight = %request.flight, index = request.request_index))]
    pub async fn handle_request(&self, request: StatusRequest) {
        self.metrics.requests_received.fetch_add(1, Ordering::Relaxed);

        let matching = self.registry.nodes_matching_index(request.request_index);
        if matching.is_empty() {
            self.metrics.requests_dropped.fetch_add(1, Ordering::Relaxed);
            warn!("No registered oracle holds the requested index, dropping");
            return;
        }

        debug!(oracles = matching.len(), "Dispatching to eligible oracles");
        let submissions = matching
            .into_iter()
            .map(|node| self.submit_for(node, &request));
        join_all(submissions).await;
    }

    /// Generate and submit one oracle's response
    async fn submit_for(&self, node: OracleNode, request: &StatusRequest) {
        let status = self.sampler.sample();
        let response = StatusResponse::new(
            node.address,
            request.request_index,
            request.flight.clone(),
            status,
        );

        match self.bridge.submit_response(&response).await {
            Ok(()) => {
                self.metrics
                    .responses_submitted
                    .fetch_add(1, Ordering::Relaxed);
                if self.quorum.record(&response) {
                    self.metrics
                        .requests_resolved
                        .fetch_add(1, Ordering::Relaxed);
                    info!(
                        flight = %response.flight,
                        status = %response.status,
                        threshold = self.quorum.threshold(),
                        "Quorum reached, flight status finalized"
                    );
                    if let Some(tx) = &self.resolution_tx {
                        let _ = tx.send((response.flight.clone(), response.status));
                    }
                }
            }
            Err(err) => {
                // the ledger owns retry policy, drop the response
                self.metrics
                    .responses_rejected
                    .fetch_add(1, Ordering::Relaxed);
                warn!(oracle = %response.oracle, error = %err, "Submission rejected, dropping response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use skysurety_common::OracleAddress;

    use crate::{
        bridge::simulated::SimulatedLedger,
        sampler::{RandomSampler, SequenceSampler},
    };

    fn flight() -> FlightKey {
        FlightKey::new("0xAA", "1332", 1587423057711)
    }

    /// Registry large enough that every index in the pool has holders
    fn saturated_registry() -> Arc<OracleRegistry> {
        let registry = OracleRegistry::with_rng(10, StdRng::seed_from_u64(1)).unwrap();
        for i in 0..60 {
            registry
                .register(OracleAddress::new(format!("0x{i:02}")))
                .unwrap();
        }
        Arc::new(registry)
    }

    fn coordinator(
        registry: Arc<OracleRegistry>,
        ledger: Arc<SimulatedLedger>,
        sampler: Arc<dyn StatusSampler>,
        threshold: usize,
    ) -> ResponseCoordinator {
        ResponseCoordinator::new(
            registry,
            ledger,
            sampler,
            Arc::new(QuorumTracker::new(threshold)),
        )
    }

    #[tokio::test]
    async fn test_all_matching_oracles_submit() {
        let registry = saturated_registry();
        let (ledger, _requests) = SimulatedLedger::new(64);
        let coordinator = coordinator(
            registry.clone(),
            ledger.clone(),
            Arc::new(RandomSampler::seeded(3)),
            3,
        );

        ledger.request_status(7, flight()).await.unwrap();
        coordinator
            .handle_request(StatusRequest::new(7, flight()))
            .await;

        let eligible = registry.nodes_matching_index(7).len() as u64;
        assert!(eligible >= 3);
        // no early cutoff: every eligible oracle submitted
        assert_eq!(ledger.accepted(), eligible);
        assert_eq!(
            coordinator.metrics().snapshot().responses_submitted,
            eligible
        );
    }

    #[tokio::test]
    async fn test_agreeing_oracles_reach_quorum() {
        let registry = saturated_registry();
        let (ledger, _requests) = SimulatedLedger::new(64);
        let coordinator = coordinator(
            registry,
            ledger.clone(),
            Arc::new(SequenceSampler::fixed(FlightStatus::LateAirline)),
            3,
        );

        ledger.request_status(7, flight()).await.unwrap();
        coordinator
            .handle_request(StatusRequest::new(7, flight()))
            .await;

        assert!(coordinator.quorum().is_resolved(&flight()));
        assert_eq!(
            coordinator.quorum().resolution(&flight()),
            Some(FlightStatus::LateAirline)
        );
        assert_eq!(coordinator.metrics().snapshot().requests_resolved, 1);
    }

    #[tokio::test]
    async fn test_no_matching_oracles_drops_request() {
        let registry = Arc::new(OracleRegistry::with_rng(10, StdRng::seed_from_u64(1)).unwrap());
        let (ledger, _requests) = SimulatedLedger::new(64);
        let coordinator = coordinator(
            registry,
            ledger.clone(),
            Arc::new(RandomSampler::seeded(3)),
            3,
        );

        ledger.request_status(4, flight()).await.unwrap();
        coordinator
            .handle_request(StatusRequest::new(4, flight()))
            .await;

        let metrics = coordinator.metrics().snapshot();
        assert_eq!(metrics.requests_dropped, 1);
        assert_eq!(metrics.responses_submitted, 0);
        assert_eq!(coordinator.quorum().votes_recorded(), 0);
        assert!(!coordinator.quorum().is_resolved(&flight()));
    }

    #[tokio::test]
    async fn test_duplicate_delivery_counts_each_oracle_once() {
        let registry = saturated_registry();
        let (ledger, _requests) = SimulatedLedger::new(64);
        let coordinator = coordinator(
            registry.clone(),
            ledger.clone(),
            Arc::new(SequenceSampler::fixed(FlightStatus::OnTime)),
            // high threshold so resolution never closes the window here
            1000,
        );

        ledger.request_status(7, flight()).await.unwrap();
        coordinator
            .handle_request(StatusRequest::new(7, flight()))
            .await;
        coordinator
            .handle_request(StatusRequest::new(7, flight()))
            .await;

        let eligible = registry.nodes_matching_index(7).len();
        // re-run submitted again, but votes stayed at one per oracle
        assert_eq!(coordinator.quorum().votes_recorded(), eligible);
        let tally = coordinator
            .quorum()
            .tally(&flight(), FlightStatus::OnTime)
            .unwrap();
        assert_eq!(tally.count, eligible);
    }

    #[tokio::test]
    async fn test_rejected_submissions_are_dropped_not_recorded() {
        let registry = saturated_registry();
        let (ledger, _requests) = SimulatedLedger::new(64);
        let coordinator = coordinator(
            registry,
            ledger.clone(),
            Arc::new(RandomSampler::seeded(3)),
            3,
        );

        // no open window on the ledger: every submission rejects
        coordinator
            .handle_request(StatusRequest::new(7, flight()))
            .await;

        let metrics = coordinator.metrics().snapshot();
        assert_eq!(metrics.responses_submitted, 0);
        assert!(metrics.responses_rejected > 0);
        assert_eq!(coordinator.quorum().votes_recorded(), 0);
    }

    #[tokio::test]
    async fn test_run_drains_in_flight_requests_on_close() {
        let registry = saturated_registry();
        let (ledger, requests) = SimulatedLedger::new(64);
        let coordinator = Arc::new(coordinator(
            registry,
            ledger.clone(),
            Arc::new(SequenceSampler::fixed(FlightStatus::LateWeather)),
            3,
        ));

        ledger.request_status(2, flight()).await.unwrap();
        let handle = tokio::spawn(coordinator.clone().run(requests));
        ledger.shutdown();
        handle.await.unwrap();

        assert_eq!(coordinator.metrics().snapshot().requests_received, 1);
        assert!(coordinator.quorum().is_resolved(&flight()));
    }
}
