//! Periodic process-name snapshots for `/ingest/process-snapshot`

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::provider::ProcessLister;
use crate::constants::INGEST_PROCESS_SNAPSHOT;
use crate::logic::controller::{send_event, Transport};
use crate::logic::shutdown::Shutdown;
use crate::logic::timestamp_rfc3339;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub hostname: String,
    pub timestamp: String,
    pub processes: Vec<String>,
}

pub struct SnapshotSender<T: Transport> {
    hostname: String,
    lister: Arc<dyn ProcessLister>,
    transport: Arc<T>,
}

impl<T: Transport> SnapshotSender<T> {
    pub fn new(hostname: impl Into<String>, lister: Arc<dyn ProcessLister>, transport: Arc<T>) -> Self {
        Self { hostname: hostname.into(), lister, transport }
    }

    pub async fn collect(&self) -> Option<ProcessSnapshot> {
        let lister = Arc::clone(&self.lister);
        let processes = match tokio::task::spawn_blocking(move || lister.list()).await {
            Ok(Ok(processes)) => processes,
            Ok(Err(e)) => {
                tracing::warn!("Process snapshot skipped: {}", e);
                return None;
            }
            Err(e) => {
                tracing::warn!("Process snapshot task failed: {}", e);
                return None;
            }
        };

        Some(ProcessSnapshot {
            hostname: self.hostname.clone(),
            timestamp: timestamp_rfc3339(),
            processes: processes.into_iter().map(|p| p.name).collect(),
        })
    }

    pub async fn send_once(&self) -> bool {
        let Some(snapshot) = self.collect().await else {
            return false;
        };

        let count = snapshot.processes.len();
        let sent = send_event(self.transport.as_ref(), INGEST_PROCESS_SNAPSHOT, &snapshot).await;
        if sent {
            tracing::info!("Process snapshot sent: {} processes", count);
        }
        sent
    }

    /// Send immediately, then every `interval` until shutdown
    pub async fn run(self, interval: Duration, mut shutdown: Shutdown) {
        tracing::info!("Started process snapshots (every {:?})", interval);

        loop {
            self.send_once().await;
            if shutdown.sleep(interval).await {
                break;
            }
        }

        tracing::info!("Process snapshots stopped");
    }
}
