//! Integrity Check
//!
//! Startup rootkit check. Detection itself is delegated to a `RootkitCheck`
//! provider; the built-in one never reports anything, so nothing is sent to
//! the controller unless a real detector is plugged in.

use serde::{Deserialize, Serialize};

use crate::constants::EVENT_ROOTKIT_DETECTED;

/// What a detector found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootkitFinding {
    pub detection_method: String,
    pub recommendation: String,
}

pub trait RootkitCheck: Send + Sync {
    /// `None` means the host looks clean
    fn check(&self) -> Option<RootkitFinding>;
}

/// Default provider: no detector installed
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRootkitCheck;

impl RootkitCheck for NoRootkitCheck {
    fn check(&self) -> Option<RootkitFinding> {
        None
    }
}

/// `/ingest/rootkit_event` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootkitEvent {
    pub hostname: String,
    pub event_type: String,
    pub detection_method: String,
    pub recommendation: String,
}

pub fn run_integrity_check(check: &dyn RootkitCheck, hostname: &str) -> Option<RootkitEvent> {
    let Some(finding) = check.check() else {
        tracing::info!("Integrity check passed");
        return None;
    };

    tracing::warn!("Rootkit indicators found ({})", finding.detection_method);
    Some(RootkitEvent {
        hostname: hostname.to_string(),
        event_type: EVENT_ROOTKIT_DETECTED.to_string(),
        detection_method: finding.detection_method,
        recommendation: finding.recommendation,
    })
}
