//! Host Probe - process table and hardware facts from sysinfo

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sysinfo::System;
use thiserror::Error;

// ============================================================================
// TYPES
// ============================================================================

/// `{pid, name}` as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
}

/// One row of the process table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub parent_pid: Option<u32>,
}

impl ProcessEntry {
    pub fn new(pid: u32, name: &str, parent_pid: Option<u32>) -> Self {
        Self { pid, name: name.to_string(), parent_pid }
    }

    pub fn record(&self) -> ProcessRecord {
        ProcessRecord { pid: self.pid, name: self.name.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub platform: String,
    pub cpu_model: String,
    pub total_ram_gb: u64,
    pub total_cores: u32,
}

#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("Process table unavailable: {0}")]
    Unavailable(String),
}

/// Source of process table snapshots
pub trait ProcessLister: Send + Sync {
    fn list(&self) -> Result<Vec<ProcessEntry>, ProbeError>;
}

// ============================================================================
// SYSINFO PROBE
// ============================================================================

/// Keeps one `System` alive so repeated refreshes stay cheap
pub struct SystemProbe {
    system: Mutex<System>,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    pub fn new() -> Self {
        Self { system: Mutex::new(System::new()) }
    }

    pub fn hardware_info(&self) -> HardwareInfo {
        let mut sys = self.system.lock();
        sys.refresh_cpu();
        sys.refresh_memory();

        let platform = format!(
            "{} {}",
            System::name().unwrap_or_else(|| "unknown".to_string()),
            System::os_version().unwrap_or_default()
        )
        .trim()
        .to_string();

        let cpu_model = sys.cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default();

        HardwareInfo {
            platform,
            cpu_model,
            total_ram_gb: sys.total_memory() / 1024 / 1024 / 1024,
            total_cores: sys.cpus().len() as u32,
        }
    }
}

impl ProcessLister for SystemProbe {
    fn list(&self) -> Result<Vec<ProcessEntry>, ProbeError> {
        let mut sys = self.system.lock();
        sys.refresh_processes();

        let processes: Vec<ProcessEntry> = sys.processes()
            .iter()
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                parent_pid: process.parent().map(|p| p.as_u32()),
            })
            .collect();

        // A live host always has at least this agent running
        if processes.is_empty() {
            return Err(ProbeError::Unavailable("empty process table".to_string()));
        }

        Ok(processes)
    }
}
