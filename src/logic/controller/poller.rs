//! Command Poller
//!
//! Pull channel: ask the controller for pending work, run each command in
//! arrival order and report each result right after it runs.

use std::sync::Arc;
use std::time::Duration;

use super::reporter::CommandReporter;
use super::transport::Transport;
use crate::constants::POLL_PATH;
use crate::error::TransportError;
use crate::logic::command::PendingCommand;
use crate::logic::response::ActionExecutor;
use crate::logic::shutdown::Shutdown;

/// What one poll cycle did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub received: usize,
    pub executed: usize,
}

pub struct CommandPoller<T: Transport> {
    hostname: String,
    transport: Arc<T>,
    executor: Arc<ActionExecutor>,
    reporter: CommandReporter<T>,
}

impl<T: Transport> CommandPoller<T> {
    pub fn new(hostname: impl Into<String>, transport: Arc<T>, executor: Arc<ActionExecutor>) -> Self {
        Self {
            hostname: hostname.into(),
            reporter: CommandReporter::new(Arc::clone(&transport)),
            transport,
            executor,
        }
    }

    /// One fetch-execute-report pass
    pub async fn poll_cycle(&self) -> PollSummary {
        let mut summary = PollSummary::default();

        let body = match self.transport
            .get_json(POLL_PATH, &[("hostname", self.hostname.as_str())])
            .await
        {
            Ok(body) => body,
            Err(TransportError::Decode(e)) => {
                tracing::warn!("Failed to decode commands: {}", e);
                return summary;
            }
            Err(e) => {
                // Expected while the controller is unreachable
                tracing::debug!("Poll skipped: {}", e);
                return summary;
            }
        };

        let commands: Vec<PendingCommand> = match serde_json::from_value(body) {
            Ok(commands) => commands,
            Err(e) => {
                tracing::warn!("Failed to decode commands: {}", e);
                return summary;
            }
        };

        summary.received = commands.len();
        if commands.is_empty() {
            return summary;
        }

        tracing::info!("Received {} pending command(s)", commands.len());

        for pending in commands {
            tracing::info!(
                id = pending.id,
                priority = pending.priority.unwrap_or(0),
                "Executing command: {}",
                pending.command
            );

            let (id, request) = pending.into_request();
            let response = Arc::clone(&self.executor).dispatch(request).await;
            self.reporter.report(id, response).await;
            summary.executed += 1;
        }

        summary
    }

    /// Poll immediately, then every `interval` until shutdown
    pub async fn run(self, interval: Duration, mut shutdown: Shutdown) {
        tracing::info!("Started command polling (every {:?})", interval);

        loop {
            self.poll_cycle().await;
            if shutdown.sleep(interval).await {
                break;
            }
        }

        tracing::info!("Command polling stopped");
    }
}

// ============================================================================
// TESTS
// ============================================================================
