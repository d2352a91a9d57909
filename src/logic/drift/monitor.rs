//! Drift Monitor - periodic scan loop around `DriftDetector`

use std::sync::Arc;
use std::time::Duration;

use super::detector::DriftDetector;
use super::rules::RuleSource;
use crate::constants::INGEST_SUSPICIOUS;
use crate::logic::controller::{send_event, Transport};
use crate::logic::shutdown::Shutdown;
use crate::logic::telemetry::ProcessLister;

pub struct DriftMonitor<T: Transport, R: RuleSource> {
    detector: DriftDetector<R>,
    lister: Arc<dyn ProcessLister>,
    transport: Arc<T>,
}

impl<T: Transport, R: RuleSource> DriftMonitor<T, R> {
    pub fn new(detector: DriftDetector<R>, lister: Arc<dyn ProcessLister>, transport: Arc<T>) -> Self {
        Self { detector, lister, transport }
    }

    /// One scan; returns the number of events emitted
    pub async fn tick(&mut self) -> usize {
        let lister = Arc::clone(&self.lister);
        let current = match tokio::task::spawn_blocking(move || lister.list()).await {
            Ok(Ok(processes)) => processes,
            Ok(Err(e)) => {
                tracing::warn!("Process scan failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Process scan task failed: {}", e);
                Vec::new()
            }
        };

        let events = self.detector.observe(&current);
        for event in &events {
            tracing::warn!(
                "Suspicious behavior detected: parent '{}' started child '{}'",
                event.parent.name,
                event.child.name
            );
            send_event(self.transport.as_ref(), INGEST_SUSPICIOUS, event).await;
        }

        events.len()
    }

    pub async fn run(mut self, interval: Duration, mut shutdown: Shutdown) {
        tracing::info!(
            "Started behavioral monitoring (every {:?}, {} known processes)",
            interval,
            self.detector.known().len()
        );

        loop {
            self.tick().await;
            if shutdown.sleep(interval).await {
                break;
            }
        }

        tracing::info!("Behavioral monitoring stopped");
    }
}
