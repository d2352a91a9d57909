//! Sentinel Agent
//!
//! Host security agent: executes controller response actions and reports
//! behavioral drift.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      SENTINEL AGENT                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌────────────┐  ┌──────────────────────┐  │
//! │  │ Push       │  │ Command    │  │ Drift Monitor        │  │
//! │  │ Server     │  │ Poller     │  │ Process Snapshots    │  │
//! │  │ (Axum)     │  │            │  │                      │  │
//! │  └─────┬──────┘  └─────┬──────┘  └──────────┬───────────┘  │
//! │        └───────┬───────┘                    │              │
//! │                ▼                            ▼              │
//! │       ┌─────────────────┐          ┌────────────────┐      │
//! │       │ Action Executor │          │ /ingest/*      │      │
//! │       └─────────────────┘          └────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod config;
mod constants;
mod error;
mod logic;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::{CliArgs, Config};
use crate::constants::{AGENT_NAME, AGENT_VERSION, INGEST_ROOTKIT, INGEST_SNAPSHOT, INGEST_VULNERABILITY};
use crate::logic::controller::{send_event, CommandPoller, HttpTransport};
use crate::logic::drift::{DriftDetector, DriftMonitor, StaticRules};
use crate::logic::response::{ActionExecutor, SysinfoProcessControl, SystemNetworkControl};
use crate::logic::shutdown;
use crate::logic::telemetry::{
    analyze_vulnerabilities, build_snapshot, run_integrity_check, NoRootkitCheck, ProcessLister,
    SnapshotSender, SoftwareInventory, StaticSignatures, StaticSoftwareInventory, SystemProbe,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "sentinel_agent=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&cli).context("Failed to load configuration")?;
    let hostname = logic::local_hostname();

    tracing::info!("{} Agent v{} starting on {}", AGENT_NAME, AGENT_VERSION, hostname);
    tracing::info!("Controller: {}", config.api_server);

    let transport = Arc::new(HttpTransport::new(&config).context("Failed to create controller client")?);
    let executor = Arc::new(ActionExecutor::new(
        hostname.clone(),
        Arc::new(SystemNetworkControl::for_current_platform()),
        Arc::new(SysinfoProcessControl),
    ));
    let probe = Arc::new(SystemProbe::new());
    let (trigger, shutdown) = shutdown::channel();

    let mut tasks = Vec::new();

    // Push channel
    tasks.push(tokio::spawn(api::serve(
        config.listen_addr,
        AppState { executor: Arc::clone(&executor) },
        config.http_timeout,
        shutdown.clone(),
    )));

    // Pull channel
    let poller = CommandPoller::new(hostname.clone(), Arc::clone(&transport), Arc::clone(&executor));
    tasks.push(tokio::spawn(poller.run(config.poll_interval, shutdown.clone())));

    // Process snapshots
    let snapshots = SnapshotSender::new(hostname.clone(), probe.clone(), Arc::clone(&transport));
    tasks.push(tokio::spawn(snapshots.run(config.snapshot_interval, shutdown.clone())));

    // Startup inventory
    let startup_probe = Arc::clone(&probe);
    let (hardware, baseline) = tokio::task::spawn_blocking(move || {
        let baseline = startup_probe.list().unwrap_or_else(|e| {
            tracing::warn!("Initial process scan failed: {}", e);
            Vec::new()
        });
        (startup_probe.hardware_info(), baseline)
    })
    .await
    .context("Startup inventory task failed")?;

    let inventory = build_snapshot(
        &hostname,
        hardware,
        &baseline,
        StaticSoftwareInventory::default().installed(),
    );
    if send_event(transport.as_ref(), INGEST_SNAPSHOT, &inventory).await {
        tracing::info!("Inventory snapshot sent ({} processes)", inventory.processes.len());
    }

    if config.vulnerability_scanning {
        for event in analyze_vulnerabilities(&inventory, &StaticSignatures::default()) {
            send_event(transport.as_ref(), INGEST_VULNERABILITY, &event).await;
        }
    }

    if let Some(event) = run_integrity_check(&NoRootkitCheck, &hostname) {
        send_event(transport.as_ref(), INGEST_ROOTKIT, &event).await;
    }

    // Behavioral drift
    if config.drift_enabled() {
        let detector = DriftDetector::seed(
            hostname.clone(),
            StaticRules::new(config.suspicious_pairs.clone()),
            &baseline,
        );
        let monitor = DriftMonitor::new(detector, probe.clone(), Arc::clone(&transport));
        tasks.push(tokio::spawn(monitor.run(config.scan_interval, shutdown.clone())));
    } else {
        tracing::info!("Behavioral monitoring disabled");
    }

    tracing::info!("{} Agent running, press Ctrl-C to stop", AGENT_NAME);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down...");
    trigger.trigger();

    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!("Task ended abnormally: {}", e);
        }
    }

    tracing::info!("{} Agent stopped", AGENT_NAME);
    Ok(())
}
