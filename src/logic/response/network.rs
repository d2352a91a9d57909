//! Network Isolation Module
//!
//! Drops all host traffic (or disables the primary interface) with the
//! platform's own tooling. Steps are independent: a failed step never stops
//! the next one and nothing is rolled back.

use std::process::Command;

use super::types::{ActionError, StepOutcome};

/// Privileged network surface used by the executor
pub trait NetworkControl: Send + Sync {
    fn isolate(&self) -> Vec<StepOutcome>;
    fn restore(&self) -> Vec<StepOutcome>;
}

/// One external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStep {
    pub program: String,
    pub args: Vec<String>,
}

impl PlatformStep {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// SYSTEM IMPLEMENTATION
// ============================================================================

/// Runs the real platform commands
#[derive(Debug, Clone)]
pub struct SystemNetworkControl {
    isolate_steps: Vec<PlatformStep>,
    restore_steps: Vec<PlatformStep>,
}

impl SystemNetworkControl {
    pub fn for_current_platform() -> Self {
        Self::for_platform(std::env::consts::OS)
    }

    pub fn for_platform(os: &str) -> Self {
        let (isolate_steps, restore_steps) = match os {
            "linux" => (iptables_policy("DROP"), iptables_policy("ACCEPT")),
            "windows" => (
                vec![PlatformStep::new("netsh", &["interface", "set", "interface", "Ethernet", "admin=disable"])],
                vec![PlatformStep::new("netsh", &["interface", "set", "interface", "Ethernet", "admin=enable"])],
            ),
            "macos" => (
                vec![PlatformStep::new("networksetup", &["-setairportpower", "en0", "off"])],
                vec![PlatformStep::new("networksetup", &["-setairportpower", "en0", "on"])],
            ),
            other => {
                tracing::warn!("No network isolation commands for platform '{}'", other);
                (Vec::new(), Vec::new())
            }
        };

        Self { isolate_steps, restore_steps }
    }

    pub fn isolate_steps(&self) -> &[PlatformStep] {
        &self.isolate_steps
    }

    pub fn restore_steps(&self) -> &[PlatformStep] {
        &self.restore_steps
    }
}

impl NetworkControl for SystemNetworkControl {
    fn isolate(&self) -> Vec<StepOutcome> {
        run_all(&self.isolate_steps)
    }

    fn restore(&self) -> Vec<StepOutcome> {
        run_all(&self.restore_steps)
    }
}

fn iptables_policy(policy: &str) -> Vec<PlatformStep> {
    ["INPUT", "OUTPUT", "FORWARD"]
        .iter()
        .map(|chain| PlatformStep::new("sudo", &["iptables", "-P", chain, policy]))
        .collect()
}

fn run_all(steps: &[PlatformStep]) -> Vec<StepOutcome> {
    steps
        .iter()
        .map(|step| StepOutcome::from_result(step.command_line(), run_step(step)))
        .collect()
}

fn run_step(step: &PlatformStep) -> Result<(), ActionError> {
    let output = Command::new(&step.program)
        .args(&step.args)
        .output()
        .map_err(|e| ActionError::SpawnFailed {
            command: step.command_line(),
            reason: e.to_string(),
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ActionError::CommandFailed {
            command: step.command_line(),
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
