//! Command Types
//!
//! Wire envelopes for both delivery channels and the canonical `Action`
//! they decode into.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

// ============================================================================
// WIRE ENVELOPES
// ============================================================================

/// Push-channel body: `{command, params}`
///
/// A missing `command` decodes as empty and later fails as an unknown command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl CommandRequest {
    pub fn new(command: &str, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => Some(map),
            _ => None,
        };
        Self { command: command.to_string(), params }
    }
}

/// Poll-channel entry: carries the id used to correlate the result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCommand {
    pub id: i64,
    pub command: String,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Advisory only, batches run in arrival order. Null means unset.
    #[serde(default)]
    pub priority: Option<i32>,
}

impl PendingCommand {
    pub fn into_request(self) -> (i64, CommandRequest) {
        (self.id, CommandRequest { command: self.command, params: self.params })
    }
}

// ============================================================================
// CANONICAL ACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsolateParams {
    pub initiated_by: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreParams {
    pub initiated_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KillParams {
    #[serde(deserialize_with = "deserialize_pid")]
    pub pid: u32,
}

/// JSON numbers arrive as floats from some controllers, so `1234.0` is
/// accepted. Fractions, negatives and strings are not.
fn deserialize_pid<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;

    if let Some(pid) = number.as_u64() {
        return u32::try_from(pid).map_err(|_| de::Error::custom(format!("pid {} out of range", pid)));
    }

    match number.as_f64() {
        Some(pid) if pid.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&pid) => Ok(pid as u32),
        _ => Err(de::Error::custom(format!("pid must be a non-negative integer, got {}", number))),
    }
}

/// A validated response action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NetworkIsolate(IsolateParams),
    NetworkRestore(RestoreParams),
    KillProcess(KillParams),
    CollectForensics,
}

impl Action {
    /// Validate a wire envelope once, at the boundary
    pub fn decode(request: &CommandRequest) -> Result<Self, CommandError> {
        let command = request.command.as_str();
        let params = Value::Object(request.params.clone().unwrap_or_default());

        match command {
            "network_isolate" => parse_params(command, params).map(Action::NetworkIsolate),
            "network_restore" => parse_params(command, params).map(Action::NetworkRestore),
            "kill_process" => parse_params(command, params).map(Action::KillProcess),
            "collect_forensics" => Ok(Action::CollectForensics),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::NetworkIsolate(_) => "network_isolate",
            Action::NetworkRestore(_) => "network_restore",
            Action::KillProcess(_) => "kill_process",
            Action::CollectForensics => "collect_forensics",
        }
    }
}

fn parse_params<T: DeserializeOwned>(command: &str, params: Value) -> Result<T, CommandError> {
    serde_json::from_value(params).map_err(|e| CommandError::InvalidParams {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// Why an envelope could not become an `Action`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Invalid parameters for {command}: {reason}")]
    InvalidParams { command: String, reason: String },
}

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one command, returned verbatim on the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResponse {
    pub fn success(message: impl Into<String>, data: Option<Value>) -> Self {
        Self { success: true, message: message.into(), data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }
}

impl From<CommandError> for CommandResponse {
    fn from(err: CommandError) -> Self {
        CommandResponse::failure(err.to_string())
    }
}

/// Poll-channel report body for `POST /command/result`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandExecutionResult {
    pub command_id: i64,
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl CommandExecutionResult {
    pub fn new(command_id: i64, response: CommandResponse) -> Self {
        Self {
            command_id,
            success: response.success,
            message: response.message,
            data: response.data.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_isolate() {
        let request = CommandRequest::new(
            "network_isolate",
            json!({"initiated_by": "analyst", "reason": "beaconing", "extra": 1}),
        );

        let action = Action::decode(&request).unwrap();
        assert_eq!(
            action,
            Action::NetworkIsolate(IsolateParams {
                initiated_by: "analyst".to_string(),
                reason: "beaconing".to_string(),
            })
        );
        assert_eq!(action.name(), "network_isolate");
    }

    #[test]
    fn test_missing_param_is_invalid() {
        let request = CommandRequest::new("network_isolate", json!({"initiated_by": "analyst"}));

        match Action::decode(&request) {
            Err(CommandError::InvalidParams { command, reason }) => {
                assert_eq!(command, "network_isolate");
                assert!(reason.contains("reason"));
            }
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_pid_is_invalid() {
        let request = CommandRequest::new("kill_process", json!({"pid": "1234"}));
        assert!(matches!(
            Action::decode(&request),
            Err(CommandError::InvalidParams { .. })
        ));

        let request = CommandRequest::new("kill_process", json!({"pid": 1234}));
        assert_eq!(
            Action::decode(&request).unwrap(),
            Action::KillProcess(KillParams { pid: 1234 })
        );
    }

    #[test]
    fn test_integral_float_pid_accepted() {
        let request = CommandRequest::new("kill_process", json!({"pid": 1234.0}));
        assert_eq!(
            Action::decode(&request).unwrap(),
            Action::KillProcess(KillParams { pid: 1234 })
        );

        for bad in [json!(12.5), json!(-1), json!(-1.0), json!(4294967296u64), json!(null)] {
            let request = CommandRequest::new("kill_process", json!({ "pid": bad }));
            assert!(
                matches!(Action::decode(&request), Err(CommandError::InvalidParams { .. })),
                "pid {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_unknown_command() {
        let request: CommandRequest = serde_json::from_str(r#"{"command":"unknown_x"}"#).unwrap();
        let err = Action::decode(&request).unwrap_err();
        assert_eq!(err, CommandError::Unknown("unknown_x".to_string()));

        let response = CommandResponse::from(err);
        assert!(!response.success);
        assert!(response.message.contains("Unknown command"));
    }

    #[test]
    fn test_null_params_accepted_for_forensics() {
        let request: CommandRequest =
            serde_json::from_str(r#"{"command":"collect_forensics","params":null}"#).unwrap();
        assert_eq!(Action::decode(&request).unwrap(), Action::CollectForensics);
    }

    #[test]
    fn test_pending_command_decode() {
        let raw = r#"[
            {"id": 7, "command": "kill_process", "params": {"pid": 99},
             "created_at": "2026-01-01T00:00:00Z", "priority": 3}
        ]"#;
        let commands: Vec<PendingCommand> = serde_json::from_str(raw).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].priority, Some(3));

        let (id, request) = commands[0].clone().into_request();
        assert_eq!(id, 7);
        assert_eq!(request.command, "kill_process");
    }

    #[test]
    fn test_pending_command_null_fields() {
        let raw = r#"[
            {"id": 1, "command": "collect_forensics",
             "params": null, "created_at": null, "priority": null},
            {"id": 2, "command": "collect_forensics"}
        ]"#;
        let commands: Vec<PendingCommand> = serde_json::from_str(raw).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].priority, None);
        assert_eq!(commands[0].created_at, None);
        assert!(commands[1].params.is_none());
    }

    #[test]
    fn test_response_omits_missing_data() {
        let body = serde_json::to_value(CommandResponse::failure("nope")).unwrap();
        assert_eq!(body, json!({"success": false, "message": "nope"}));

        let report = CommandExecutionResult::new(4, CommandResponse::failure("nope"));
        assert_eq!(report.data, json!({}));
    }
}
