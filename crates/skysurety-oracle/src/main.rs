//! SkySurety Oracle Service Binary
//!
//! Registers a roster of simulated oracle accounts, watches the (simulated)
//! insurance ledger for `StatusRequested` events, answers them through the
//! coordination engine, and exposes a small REST surface for health checks
//! and stats.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skysurety_common::{FlightKey, OracleAddress};
use skysurety_oracle::{
    config::OracleServiceConfig, coordinator::ResponseCoordinator, quorum::QuorumTracker,
    registry::OracleRegistry, sampler::RandomSampler, SimulatedLedger, ORACLE_VERSION,
};

/// Airline account used by the demo request driver
const DEMO_AIRLINE: &str = "0xfa54dde08bb652e73a43a507ee224c8af6ed4dbd";

/// Flights seeded on the demo ledger: (code, route)
const DEMO_FLIGHTS: [(&str, &str); 3] = [
    ("1332", "OAK -> HOU"),
    ("1334", "SFO -> MEL"),
    ("1334", "SFO -> LAX"),
];

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting SkySurety Oracle Service v{}", ORACLE_VERSION);

    // Load configuration
    let config = OracleServiceConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    // Simulated ledger and the request stream it feeds
    let (ledger, request_rx) = SimulatedLedger::new(config.channel_buffer);

    // Register the oracle roster
    let registry = Arc::new(OracleRegistry::new(config.index_pool_size)?);
    let mut account_rng = StdRng::from_entropy();
    for i in 0..config.oracle_count {
        let node = registry.register(OracleAddress::random(&mut account_rng))?;
        info!(
            "Added oracle #{} {} indices {}",
            i + 1,
            node.address,
            node.indices
        );
    }
    info!("Registered {} oracles", registry.count());

    // Coordination engine
    let quorum = Arc::new(QuorumTracker::new(config.quorum_threshold));
    let (resolution_tx, mut resolution_rx) = tokio::sync::mpsc::unbounded_channel();
    let coordinator = Arc::new(
        ResponseCoordinator::new(
            registry.clone(),
            ledger.clone(),
            Arc::new(RandomSampler::new()),
            quorum.clone(),
        )
        .with_resolution_notify(resolution_tx),
    );
    let metrics = coordinator.metrics();
    tokio::spawn(coordinator.run(request_rx));

    // Finalized flights stop accepting responses, as the contract would
    {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            while let Some((flight, status)) = resolution_rx.recv().await {
                ledger.close_request(&flight);
                info!(flight = %flight, status = %status, "Request window closed after finalization");
            }
        });
    }

    // StatusReported observability feed (monitoring only)
    {
        let mut reports = ledger.subscribe_reports();
        tokio::spawn(async move {
            loop {
                match reports.recv().await {
                    Ok(report) => info!(
                        oracle = %report.oracle,
                        flight = %report.flight,
                        status = %report.status,
                        "StatusReported"
                    ),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Report feed lagged, events skipped")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    // Demo request driver: periodically query the seeded flights
    {
        let ledger = ledger.clone();
        let pool_size = config.index_pool_size;
        let interval_ms = config.demo_request_interval_ms;
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut timer =
                tokio::time::interval(tokio::time::Duration::from_millis(interval_ms));
            let mut next = 0usize;
            loop {
                timer.tick().await;
                let (code, route) = DEMO_FLIGHTS[next % DEMO_FLIGHTS.len()];
                next += 1;
                let index = rng.gen_range(0..pool_size);
                // fresh timestamp per query, each request is a new key
                let flight =
                    FlightKey::new(DEMO_AIRLINE, code, chrono::Utc::now().timestamp_millis());
                info!(flight = %flight, route, index, "Requesting flight status");
                if ledger.request_status(index, flight).await.is_err() {
                    break;
                }
            }
        });
    }

    // REST surface
    let app = create_rest_api(registry.clone(), quorum.clone(), metrics);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server started on {}", addr);

    let shutdown = {
        let ledger = ledger.clone();
        async move {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
            info!("Received shutdown signal");
            ledger.shutdown();
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutting down SkySurety oracle service");
    Ok(())
}

/// Create REST API routes for the oracle service
fn create_rest_api(
    registry: Arc<OracleRegistry>,
    quorum: Arc<QuorumTracker>,
    metrics: Arc<skysurety_oracle::CoordinatorMetrics>,
) -> axum::Router {
    use axum::{response::Json, routing::get, Router};
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new().allow_origin(Any);

    Router::new()
        // Static acknowledgement for external health checks
        .route(
            "/api",
            get(|| async {
                Json(serde_json::json!({
                    "message": "SkySurety oracle service is running",
                }))
            }),
        )
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "healthy"})) }),
        )
        .route(
            "/api/v1/stats",
            get({
                let registry = registry.clone();
                let quorum = quorum.clone();
                move || {
                    let registry = registry.clone();
                    let quorum = quorum.clone();
                    let metrics = metrics.clone();
                    async move {
                        Json(serde_json::json!({
                            "oracles_registered": registry.count(),
                            "index_pool_size": registry.pool_size(),
                            "quorum_threshold": quorum.threshold(),
                            "votes_recorded": quorum.votes_recorded(),
                            "flights_resolved": quorum.resolved_count(),
                            "coordinator": metrics.snapshot(),
                        }))
                    }
                }
            }),
        )
        .route(
            "/api/v1/version",
            get(|| async {
                Json(serde_json::json!({
                    "service": "skysurety-oracle",
                    "version": ORACLE_VERSION,
                }))
            }),
        )
        .layer(cors)
}
