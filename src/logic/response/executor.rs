//! Action Executor
//!
//! Single authority over host response actions and the isolation flag.
//! Push and poll channels both land here. The step lock is held across the
//! platform steps so isolate/restore never interleave; readers only see the
//! published state, which is never locked across a platform step.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::json;

use super::forensics;
use super::network::NetworkControl;
use super::process::ProcessControl;
use super::types::{IsolationState, StepOutcome};
use crate::logic::command::{
    Action, CommandRequest, CommandResponse, IsolateParams, KillParams, RestoreParams,
};
use crate::logic::timestamp_rfc3339;

pub struct ActionExecutor {
    hostname: String,
    /// Serializes isolate/restore platform steps
    step_lock: Mutex<()>,
    /// Last applied isolation state
    published: RwLock<IsolationState>,
    network: Arc<dyn NetworkControl>,
    processes: Arc<dyn ProcessControl>,
}

impl ActionExecutor {
    pub fn new(
        hostname: impl Into<String>,
        network: Arc<dyn NetworkControl>,
        processes: Arc<dyn ProcessControl>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            step_lock: Mutex::new(()),
            published: RwLock::new(IsolationState::default()),
            network,
            processes,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Point-in-time read of the isolation flag; never waits on platform steps
    pub fn is_isolated(&self) -> bool {
        self.published.read().isolated
    }

    pub fn isolation_state(&self) -> IsolationState {
        self.published.read().clone()
    }

    /// Decode and run one command. Never panics on bad input.
    pub fn execute(&self, request: &CommandRequest) -> CommandResponse {
        match Action::decode(request) {
            Ok(action) => self.perform(action),
            Err(e) => {
                tracing::warn!(command = %request.command, "Command rejected: {}", e);
                e.into()
            }
        }
    }

    /// Run `execute` on the blocking pool and wait for it
    pub async fn dispatch(self: Arc<Self>, request: CommandRequest) -> CommandResponse {
        let command = request.command.clone();
        match tokio::task::spawn_blocking(move || self.execute(&request)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(command = %command, "Command execution aborted: {}", e);
                CommandResponse::failure(format!("Command execution aborted: {}", e))
            }
        }
    }

    pub fn perform(&self, action: Action) -> CommandResponse {
        match action {
            Action::NetworkIsolate(params) => self.network_isolate(params),
            Action::NetworkRestore(params) => self.network_restore(params),
            Action::KillProcess(params) => self.kill_process(params),
            Action::CollectForensics => self.collect_forensics(),
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn network_isolate(&self, params: IsolateParams) -> CommandResponse {
        tracing::warn!(
            hostname = %self.hostname,
            initiated_by = %params.initiated_by,
            reason = %params.reason,
            "STRIKE ACTION: network isolation"
        );

        let guard = self.step_lock.lock();
        let steps = self.network.isolate();
        log_failed_steps("network_isolate", &steps);
        // Flag flips even when steps fail; `steps` carries the evidence.
        self.published.write().set(true);
        drop(guard);

        tracing::info!("Network isolation completed for {}", self.hostname);

        CommandResponse::success(
            format!("Endpoint {} successfully isolated from network", self.hostname),
            Some(json!({
                "hostname": self.hostname,
                "isolated": true,
                "timestamp": timestamp_rfc3339(),
                "initiated_by": params.initiated_by,
                "steps": steps,
            })),
        )
    }

    fn network_restore(&self, params: RestoreParams) -> CommandResponse {
        tracing::warn!(
            hostname = %self.hostname,
            initiated_by = %params.initiated_by,
            "STRIKE ACTION: network restoration"
        );

        let guard = self.step_lock.lock();
        let steps = self.network.restore();
        log_failed_steps("network_restore", &steps);
        self.published.write().set(false);
        drop(guard);

        tracing::info!("Network access restored for {}", self.hostname);

        CommandResponse::success(
            format!("Network access restored for {}", self.hostname),
            Some(json!({
                "hostname": self.hostname,
                "isolated": false,
                "timestamp": timestamp_rfc3339(),
                "initiated_by": params.initiated_by,
                "steps": steps,
            })),
        )
    }

    fn kill_process(&self, params: KillParams) -> CommandResponse {
        let pid = params.pid;

        let Some(name) = self.processes.resolve(pid) else {
            tracing::info!("Kill requested for unknown process {}", pid);
            return CommandResponse::failure(format!("Process {} not found", pid));
        };

        tracing::warn!("STRIKE ACTION: killing process {} ({})", pid, name);

        match self.processes.terminate(pid) {
            Ok(()) => CommandResponse::success(
                format!("Process {} ({}) terminated", pid, name),
                Some(json!({ "pid": pid, "name": name })),
            ),
            Err(e) => {
                tracing::warn!("Kill of process {} failed: {}", pid, e);
                CommandResponse::failure(format!("Failed to kill process {}: {}", pid, e))
            }
        }
    }

    fn collect_forensics(&self) -> CommandResponse {
        tracing::info!("STRIKE ACTION: collecting forensics data");
        CommandResponse::success(
            "Forensics data collected",
            Some(forensics::manifest(&self.hostname, &timestamp_rfc3339())),
        )
    }
}

fn log_failed_steps(action: &str, steps: &[StepOutcome]) {
    for step in steps.iter().filter(|s| !s.success) {
        tracing::warn!(
            action,
            command = %step.command,
            "Platform step failed: {}",
            step.detail.as_deref().unwrap_or("unknown error")
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
