//! Agent logic
//!
//! - command: wire envelopes and the canonical `Action`
//! - response: the action executor and its platform seams
//! - controller: poll channel, result reporting and telemetry ingest
//! - drift: behavioral process monitoring
//! - telemetry: host inventory and process snapshots

pub mod command;
pub mod controller;
pub mod drift;
pub mod response;
pub mod shutdown;
pub mod telemetry;

#[cfg(test)]
pub mod testing;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as `2026-01-01T00:00:00Z`
pub fn timestamp_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Host name as reported by the OS, `unknown` if it cannot be read
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
