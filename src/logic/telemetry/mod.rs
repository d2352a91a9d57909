//! Telemetry Module - Host facts sent to the controller
//!
//! This module handles:
//! - Process table and hardware probing (sysinfo)
//! - Startup inventory snapshot and vulnerability lookup
//! - Startup integrity (rootkit) check through a pluggable provider
//! - Periodic process-name snapshots

pub mod integrity;
pub mod inventory;
pub mod provider;
pub mod snapshot;

pub use integrity::{run_integrity_check, NoRootkitCheck, RootkitCheck, RootkitEvent, RootkitFinding};
pub use inventory::{
    analyze_vulnerabilities, build_snapshot, SignatureSource, SoftwareInfo, SoftwareInventory,
    StaticSignatures, StaticSoftwareInventory, SystemInfoSnapshot, VulnerabilityEvent,
};
pub use provider::{HardwareInfo, ProbeError, ProcessEntry, ProcessLister, ProcessRecord, SystemProbe};
pub use snapshot::{ProcessSnapshot, SnapshotSender};
