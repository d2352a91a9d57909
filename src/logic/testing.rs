//! Test doubles for the privileged and network-facing seams

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::TransportError;
use crate::logic::controller::Transport;
use crate::logic::response::{ActionError, NetworkControl, ProcessControl, StepOutcome};

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Default)]
pub struct FakeNetwork {
    calls: Mutex<Vec<&'static str>>,
    in_flight: AtomicBool,
    overlapped: AtomicBool,
    fail: bool,
    delay: Duration,
}

impl FakeNetwork {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    /// Each platform operation takes `delay`
    pub fn slow(delay: Duration) -> Self {
        Self { delay, ..Default::default() }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// True if two platform operations ever ran at the same time
    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }

    fn record(&self, op: &'static str) -> Vec<StepOutcome> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.lock().push(op);
        std::thread::sleep(self.delay.max(Duration::from_millis(2)));
        self.in_flight.store(false, Ordering::SeqCst);

        let result = if self.fail {
            Err(ActionError::CommandFailed {
                command: format!("fake-{}", op),
                exit_code: 1,
                stderr: "permission denied".to_string(),
            })
        } else {
            Ok(())
        };
        vec![StepOutcome::from_result(format!("fake-{}", op), result)]
    }
}

impl NetworkControl for FakeNetwork {
    fn isolate(&self) -> Vec<StepOutcome> {
        self.record("isolate")
    }

    fn restore(&self) -> Vec<StepOutcome> {
        self.record("restore")
    }
}

// ============================================================================
// PROCESSES
// ============================================================================

#[derive(Default)]
pub struct FakeProcesses {
    table: Mutex<HashMap<u32, String>>,
    terminated: Mutex<Vec<u32>>,
}

impl FakeProcesses {
    pub fn with(entries: &[(u32, &str)]) -> Self {
        let table = entries.iter().map(|(pid, name)| (*pid, name.to_string())).collect();
        Self { table: Mutex::new(table), terminated: Mutex::new(Vec::new()) }
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.table.lock().len()
    }
}

impl ProcessControl for FakeProcesses {
    fn resolve(&self, pid: u32) -> Option<String> {
        self.table.lock().get(&pid).cloned()
    }

    fn terminate(&self, pid: u32) -> Result<(), ActionError> {
        match self.table.lock().remove(&pid) {
            Some(_) => {
                self.terminated.lock().push(pid);
                Ok(())
            }
            None => Err(ActionError::ProcessNotFound { pid }),
        }
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Serves a canned poll response and records every POST
pub struct RecordingTransport {
    poll_response: Mutex<Result<Value, TransportError>>,
    posts: Mutex<Vec<(String, Value)>>,
    gets: Mutex<Vec<(String, Vec<(String, String)>)>>,
    fail_posts: bool,
}

impl RecordingTransport {
    pub fn new(poll_response: Result<Value, TransportError>) -> Self {
        Self {
            poll_response: Mutex::new(poll_response),
            posts: Mutex::new(Vec::new()),
            gets: Mutex::new(Vec::new()),
            fail_posts: false,
        }
    }

    pub fn failing_posts(poll_response: Result<Value, TransportError>) -> Self {
        Self { fail_posts: true, ..Self::new(poll_response) }
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().clone()
    }

    pub fn posts_to(&self, path: &str) -> Vec<Value> {
        self.posts
            .lock()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn gets(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.gets.lock().clone()
    }
}

impl Transport for RecordingTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<(), TransportError> {
        self.posts.lock().push((path.to_string(), body.clone()));
        if self.fail_posts {
            Err(TransportError::Status(503))
        } else {
            Ok(())
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        let query = query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.gets.lock().push((path.to_string(), query));
        self.poll_response.lock().clone()
    }
}
