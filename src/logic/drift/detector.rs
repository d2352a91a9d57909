//! Drift Detector
//!
//! Tracks every PID ever seen and flags new processes whose parent/child
//! names match a suspicion rule. The known set only grows: a recycled PID
//! is never evaluated again.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::rules::RuleSource;
use crate::constants::EVENT_SUSPICIOUS_PARENT_CHILD;
use crate::logic::telemetry::{ProcessEntry, ProcessRecord};

/// Monotonic set of observed PIDs
#[derive(Debug, Default, Clone)]
pub struct KnownProcessSet {
    pids: HashSet<u32>,
}

impl KnownProcessSet {
    /// Returns true if the PID was not known before
    pub fn insert(&mut self, pid: u32) -> bool {
        self.pids.insert(pid)
    }

    pub fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }
}

/// Sent to `/ingest/suspicious_event`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralEvent {
    pub hostname: String,
    pub event_type: String,
    #[serde(rename = "child_process")]
    pub child: ProcessRecord,
    #[serde(rename = "parent_process")]
    pub parent: ProcessRecord,
}

pub struct DriftDetector<R: RuleSource> {
    hostname: String,
    known: KnownProcessSet,
    rules: R,
}

impl<R: RuleSource> DriftDetector<R> {
    /// Start with every PID in `baseline` already known
    pub fn seed(hostname: impl Into<String>, rules: R, baseline: &[ProcessEntry]) -> Self {
        let mut known = KnownProcessSet::default();
        for process in baseline {
            known.insert(process.pid);
        }

        Self { hostname: hostname.into(), known, rules }
    }

    pub fn known(&self) -> &KnownProcessSet {
        &self.known
    }

    /// Evaluate one process table snapshot
    pub fn observe(&mut self, current: &[ProcessEntry]) -> Vec<BehavioralEvent> {
        let by_pid: HashMap<u32, &ProcessEntry> = current.iter().map(|p| (p.pid, p)).collect();
        let mut events = Vec::new();

        for process in current {
            if !self.known.insert(process.pid) {
                continue;
            }

            // Parent may already be gone
            let Some(parent) = process.parent_pid.and_then(|ppid| by_pid.get(&ppid)) else {
                continue;
            };

            if self.rules.is_suspicious(&parent.name, &process.name) {
                events.push(BehavioralEvent {
                    hostname: self.hostname.clone(),
                    event_type: EVENT_SUSPICIOUS_PARENT_CHILD.to_string(),
                    child: process.record(),
                    parent: parent.record(),
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::drift::rules::StaticRules;
    use serde_json::json;

    fn baseline() -> Vec<ProcessEntry> {
        vec![
            ProcessEntry::new(1, "init", None),
            ProcessEntry::new(100, "zsh", Some(1)),
        ]
    }

    fn detector() -> DriftDetector<StaticRules> {
        DriftDetector::seed("drift-host", StaticRules::default(), &baseline())
    }

    #[test]
    fn test_seed_marks_baseline_known() {
        let detector = detector();
        assert!(detector.known().contains(1));
        assert!(detector.known().contains(100));
        assert_eq!(detector.known().len(), 2);
    }

    #[test]
    fn test_new_suspicious_child_flagged_once() {
        let mut detector = detector();
        let mut current = baseline();
        current.push(ProcessEntry::new(200, "ping", Some(100)));

        let events = detector.observe(&current);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].child, ProcessRecord { pid: 200, name: "ping".to_string() });
        assert_eq!(events[0].parent, ProcessRecord { pid: 100, name: "zsh".to_string() });

        assert!(detector.observe(&current).is_empty());
    }

    #[test]
    fn test_benign_child_becomes_known() {
        let mut detector = detector();
        let mut current = baseline();
        current.push(ProcessEntry::new(201, "ls", Some(100)));

        assert!(detector.observe(&current).is_empty());
        assert!(detector.known().contains(201));
    }

    #[test]
    fn test_missing_parent_skipped_but_known() {
        let mut detector = detector();
        let current = vec![ProcessEntry::new(300, "ping", Some(999))];

        assert!(detector.observe(&current).is_empty());
        assert!(detector.known().contains(300));
    }

    #[test]
    fn test_reused_pid_not_reevaluated() {
        let mut detector = detector();
        detector.observe(&[ProcessEntry::new(400, "ls", Some(100))]);

        // PID 400 recycled as a suspicious child
        let current = vec![
            ProcessEntry::new(100, "zsh", Some(1)),
            ProcessEntry::new(400, "ping", Some(100)),
        ];
        assert!(detector.observe(&current).is_empty());
    }

    #[test]
    fn test_empty_tick() {
        let mut detector = detector();
        assert!(detector.observe(&[]).is_empty());
        assert_eq!(detector.known().len(), 2);
    }

    #[test]
    fn test_event_wire_shape() {
        let mut detector = detector();
        let events = detector.observe(&[
            ProcessEntry::new(100, "zsh", Some(1)),
            ProcessEntry::new(500, "ping", Some(100)),
        ]);

        assert_eq!(
            serde_json::to_value(&events[0]).unwrap(),
            json!({
                "hostname": "drift-host",
                "event_type": "SUSPICIOUS_PARENT_CHILD_PROCESS",
                "child_process": {"pid": 500, "name": "ping"},
                "parent_process": {"pid": 100, "name": "zsh"},
            })
        );
    }
}
