//! Response Module - Privileged host response actions
//!
//! # Components
//! - `executor.rs`: command dispatcher and owner of the isolation flag
//! - `network.rs`: network isolation via platform tooling
//! - `process.rs`: process resolve / terminate
//! - `forensics.rs`: forensic artifact manifest

pub mod executor;
pub mod forensics;
pub mod network;
pub mod process;
pub mod types;

pub use executor::ActionExecutor;
pub use network::{NetworkControl, SystemNetworkControl};
pub use process::{ProcessControl, SysinfoProcessControl};
pub use types::{ActionError, IsolationState, StepOutcome};
