//! Inventory & Vulnerability Analysis
//!
//! Startup snapshot of the host plus a signature lookup over the installed
//! software list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::provider::{HardwareInfo, ProcessEntry, ProcessRecord};
use crate::constants::EVENT_VULNERABILITY_DETECTED;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareInfo {
    pub name: String,
    pub version: String,
}

impl SoftwareInfo {
    pub fn new(name: &str, version: &str) -> Self {
        Self { name: name.to_string(), version: version.to_string() }
    }
}

/// Sent once at startup to `/ingest/snapshot`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfoSnapshot {
    pub hostname: String,
    pub os: String,
    pub architecture: String,
    #[serde(rename = "hardware_info")]
    pub hardware: HardwareInfo,
    pub processes: Vec<ProcessRecord>,
    pub installed_software: Vec<SoftwareInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityEvent {
    pub hostname: String,
    pub event_type: String,
    pub vulnerable_software: SoftwareInfo,
    pub reason: String,
    pub cve: String,
}

// ============================================================================
// SOURCES
// ============================================================================

pub trait SoftwareInventory: Send + Sync {
    fn installed(&self) -> Vec<SoftwareInfo>;
}

/// Fixed software list
pub struct StaticSoftwareInventory {
    items: Vec<SoftwareInfo>,
}

impl Default for StaticSoftwareInventory {
    fn default() -> Self {
        Self {
            items: vec![
                SoftwareInfo::new("Google Chrome", "128.0.6613.119"),
                SoftwareInfo::new("VS Code", "1.92.0"),
                SoftwareInfo::new("Docker Desktop", "4.28.0"),
            ],
        }
    }
}

impl StaticSoftwareInventory {
    pub fn new(items: Vec<SoftwareInfo>) -> Self {
        Self { items }
    }
}

impl SoftwareInventory for StaticSoftwareInventory {
    fn installed(&self) -> Vec<SoftwareInfo> {
        self.items.clone()
    }
}

/// Maps a product name to a known CVE
pub trait SignatureSource: Send + Sync {
    fn lookup(&self, software: &SoftwareInfo) -> Option<String>;
}

pub struct StaticSignatures {
    by_name: HashMap<String, String>,
}

impl Default for StaticSignatures {
    fn default() -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("Docker Desktop".to_string(), "CVE-2024-12345".to_string());
        Self { by_name }
    }
}

impl SignatureSource for StaticSignatures {
    fn lookup(&self, software: &SoftwareInfo) -> Option<String> {
        self.by_name.get(&software.name).cloned()
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

pub fn build_snapshot(
    hostname: &str,
    hardware: HardwareInfo,
    processes: &[ProcessEntry],
    installed_software: Vec<SoftwareInfo>,
) -> SystemInfoSnapshot {
    SystemInfoSnapshot {
        hostname: hostname.to_string(),
        os: std::env::consts::OS.to_string(),
        architecture: std::env::consts::ARCH.to_string(),
        hardware,
        processes: processes.iter().map(ProcessEntry::record).collect(),
        installed_software,
    }
}

/// One event per installed product with a signature hit
pub fn analyze_vulnerabilities(
    snapshot: &SystemInfoSnapshot,
    signatures: &dyn SignatureSource,
) -> Vec<VulnerabilityEvent> {
    snapshot.installed_software
        .iter()
        .filter_map(|software| {
            let cve = signatures.lookup(software)?;
            tracing::warn!("Vulnerability found: {} is vulnerable ({})", software.name, cve);
            Some(VulnerabilityEvent {
                hostname: snapshot.hostname.clone(),
                event_type: EVENT_VULNERABILITY_DETECTED.to_string(),
                vulnerable_software: software.clone(),
                reason: format!("Installed version {} is known to be vulnerable.", software.version),
                cve,
            })
        })
        .collect()
}
