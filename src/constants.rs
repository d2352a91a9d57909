//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults and wire names.

/// Default controller URL
///
/// This is the fallback when neither the environment nor agent.conf set `API_SERVER`.
pub const DEFAULT_API_SERVER: &str = "https://localhost";

/// Default poll interval (seconds)
pub const DEFAULT_POLL_INTERVAL: u64 = 10;

/// Default drift scan interval (seconds)
pub const DEFAULT_SCAN_INTERVAL: u64 = 2;

/// Default process snapshot interval (seconds)
pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 5 * 60;

/// Default poll request timeout (seconds)
pub const DEFAULT_POLL_TIMEOUT: u64 = 5;

/// Default timeout for every other HTTP exchange (seconds)
pub const DEFAULT_HTTP_TIMEOUT: u64 = 10;

/// Default suspicious parent/child pairs
pub const DEFAULT_SUSPICIOUS_PAIRS: &str = "zsh:ping";

/// Config file locations probed in order when `SENTINEL_CONFIG` is unset
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "agent.conf",
    "config/agent.conf",
    "/etc/sentinel/agent.conf",
];

/// Agent version (reported by `/status`)
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent name
pub const AGENT_NAME: &str = "Sentinel";

// ============================================
// Controller endpoints
// ============================================

pub const POLL_PATH: &str = "/command/poll";
pub const RESULT_PATH: &str = "/command/result";

pub const INGEST_SNAPSHOT: &str = "/ingest/snapshot";
pub const INGEST_VULNERABILITY: &str = "/ingest/vulnerability_event";
pub const INGEST_SUSPICIOUS: &str = "/ingest/suspicious_event";
pub const INGEST_PROCESS_SNAPSHOT: &str = "/ingest/process-snapshot";
pub const INGEST_ROOTKIT: &str = "/ingest/rootkit_event";

// ============================================
// Event types
// ============================================

pub const EVENT_SUSPICIOUS_PARENT_CHILD: &str = "SUSPICIOUS_PARENT_CHILD_PROCESS";
pub const EVENT_VULNERABILITY_DETECTED: &str = "VULNERABILITY_DETECTED";
pub const EVENT_ROOTKIT_DETECTED: &str = "ROOTKIT_DETECTED";
