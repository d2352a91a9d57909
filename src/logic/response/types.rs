//! Response Types

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// ISOLATION STATE
// ============================================================================

/// Host network isolation as set by this agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IsolationState {
    pub isolated: bool,
    pub changed_at: Option<DateTime<Utc>>,
}

impl IsolationState {
    pub(crate) fn set(&mut self, isolated: bool) {
        self.isolated = isolated;
        self.changed_at = Some(Utc::now());
    }
}

// ============================================================================
// PLATFORM STEPS
// ============================================================================

/// Outcome of one privileged platform invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StepOutcome {
    pub fn from_result(command: String, result: Result<(), ActionError>) -> Self {
        match result {
            Ok(()) => Self { command, success: true, detail: None },
            Err(e) => Self { command, success: false, detail: Some(e.to_string()) },
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Action error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("Failed to kill process {pid}: {reason}")]
    TerminateFailed { pid: u32, reason: String },

    #[error("Command '{command}' failed ({exit_code}): {stderr}")]
    CommandFailed { command: String, exit_code: i32, stderr: String },

    #[error("Could not run '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },
}
