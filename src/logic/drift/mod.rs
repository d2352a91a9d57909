//! Drift Module - Behavioral process monitoring
//!
//! This module handles:
//! - Parent/child suspicion rules
//! - New-process detection against a monotonic known set
//! - The periodic scan loop

pub mod detector;
pub mod monitor;
pub mod rules;

pub use detector::{BehavioralEvent, DriftDetector, KnownProcessSet};
pub use monitor::DriftMonitor;
pub use rules::{is_suspicious, parse_rules, RuleSource, StaticRules, SuspicionRule};
