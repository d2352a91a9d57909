//! Command Reporter
//!
//! Delivers one poll-channel result to the controller, keyed by command id.
//! Fire-and-forget: failures are logged, never retried.

use std::sync::Arc;

use super::transport::Transport;
use crate::constants::RESULT_PATH;
use crate::logic::command::{CommandExecutionResult, CommandResponse};

pub struct CommandReporter<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> CommandReporter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn report(&self, command_id: i64, response: CommandResponse) {
        let result = CommandExecutionResult::new(command_id, response);
        let body = match serde_json::to_value(&result) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Cannot serialize result for command {}: {}", command_id, e);
                return;
            }
        };

        match self.transport.post_json(RESULT_PATH, &body).await {
            Ok(()) => tracing::info!("Result reported for command ID {}", command_id),
            Err(e) => tracing::warn!("Failed to report result for command ID {}: {}", command_id, e),
        }
    }
}
