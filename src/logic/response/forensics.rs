//! Forensics manifest
//!
//! Placeholder for a real collector: reports the artifact categories a
//! collection covers without gathering them.

use serde_json::{json, Value};

/// Artifact categories reported by `collect_forensics`
pub const ARTIFACT_CATEGORIES: &[&str] = &["process_list", "network_connections", "system_logs"];

pub fn manifest(hostname: &str, timestamp: &str) -> Value {
    json!({
        "hostname": hostname,
        "timestamp": timestamp,
        "collected": ARTIFACT_CATEGORIES,
    })
}
