//! Telemetry ingest - fire-and-forget POSTs to `/ingest/*`

use serde::Serialize;

use super::transport::Transport;

/// Serialize and send one telemetry document; failures are only logged
pub async fn send_event<T, E>(transport: &T, path: &str, event: &E) -> bool
where
    T: Transport,
    E: Serialize,
{
    let body = match serde_json::to_value(event) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Cannot serialize payload for {}: {}", path, e);
            return false;
        }
    };

    match transport.post_json(path, &body).await {
        Ok(()) => {
            tracing::debug!("Data sent to {}", path);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to send data to {}: {}", path, e);
            false
        }
    }
}
