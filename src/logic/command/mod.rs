//! Command Module - Canonical command model shared by push and poll channels
//!
//! # Components
//! - `types.rs`: wire envelopes, typed `Action`, result bodies

pub mod types;

pub use types::{
    Action, CommandError, CommandExecutionResult, CommandRequest, CommandResponse,
    IsolateParams, KillParams, PendingCommand, RestoreParams,
};
