//! Controller Module - Agent to controller communication
//!
//! This module handles:
//! - JSON transport to the controller
//! - Command polling (pull channel)
//! - Result reporting for polled commands
//! - Telemetry ingest

pub mod ingest;
pub mod poller;
pub mod reporter;
pub mod transport;

pub use ingest::send_event;
pub use poller::{CommandPoller, PollSummary};
pub use reporter::CommandReporter;
pub use transport::{HttpTransport, Transport};
