//! Push-channel handlers

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::constants::AGENT_VERSION;
use crate::error::{AppError, AppResult};
use crate::logic::command::{CommandRequest, CommandResponse};
use crate::logic::timestamp_rfc3339;

/// POST /command
///
/// Only an undecodable body is an HTTP error; every other outcome,
/// including unknown or missing commands, is a 200 with `success: false`.
/// A JSON `null` body is treated as an empty envelope.
pub async fn command(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<CommandResponse>> {
    let request: CommandRequest = serde_json::from_slice::<Option<CommandRequest>>(&body)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?
        .unwrap_or_default();

    tracing::info!("Received push command: {}", request.command);

    let response = state.executor.clone().dispatch(request).await;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub hostname: String,
    pub isolated: bool,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        hostname: state.executor.hostname().to_string(),
        isolated: state.executor.is_isolated(),
        version: AGENT_VERSION,
        timestamp: timestamp_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::{create_router, AppState};
    use crate::logic::response::ActionExecutor;
    use crate::logic::testing::{FakeNetwork, FakeProcesses};

    fn app() -> Router {
        let executor = Arc::new(ActionExecutor::new(
            "push-host",
            Arc::new(FakeNetwork::default()),
            Arc::new(FakeProcesses::with(&[(4242, "miner")])),
        ));
        create_router(AppState { executor }, Duration::from_secs(10))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_command(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/command")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_status() -> Request<Body> {
        Request::builder().uri("/status").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = call(app(), get_status()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hostname"], "push-host");
        assert_eq!(body["isolated"], false);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = call(app(), post_command("not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_wellformed_body_without_command_is_200() {
        for body in [r#"{}"#, r#"{"params": {}}"#, "null"] {
            let (status, response) = call(app(), post_command(body)).await;

            assert_eq!(status, StatusCode::OK, "body {}", body);
            assert_eq!(response["success"], false);
            assert_eq!(response["message"], "Unknown command: ");
        }
    }

    #[tokio::test]
    async fn test_wrong_typed_envelope_is_400() {
        for body in [r#"{"command": 5}"#, r#"{"command": "kill_process", "params": [1]}"#, "\"isolate\""] {
            let (status, _) = call(app(), post_command(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_status_not_blocked_by_slow_isolation() {
        let network = Arc::new(FakeNetwork::slow(Duration::from_millis(600)));
        let executor = Arc::new(ActionExecutor::new(
            "push-host",
            network.clone(),
            Arc::new(FakeProcesses::default()),
        ));
        let app = create_router(AppState { executor }, Duration::from_secs(10));

        let isolating = tokio::spawn(call(
            app.clone(),
            post_command(r#"{"command": "network_isolate", "params": {"initiated_by": "soc", "reason": "x"}}"#),
        ));
        while network.calls().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let (status, body) = tokio::time::timeout(Duration::from_millis(200), call(app.clone(), get_status()))
            .await
            .expect("status waited on the isolation steps");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isolated"], false);

        let (status, _) = isolating.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(app, get_status()).await;
        assert_eq!(body["isolated"], true);
    }

    #[tokio::test]
    async fn test_unknown_command_is_200() {
        let (status, body) = call(app(), post_command(r#"{"command": "reboot"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": false, "message": "Unknown command: reboot"}));
    }

    #[tokio::test]
    async fn test_kill_process_over_push() {
        let (status, body) = call(
            app(),
            post_command(r#"{"command": "kill_process", "params": {"pid": 4242}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "miner");
    }

    #[tokio::test]
    async fn test_isolate_visible_in_status() {
        let app = app();

        let (status, body) = call(
            app.clone(),
            post_command(
                r#"{"command": "network_isolate", "params": {"initiated_by": "soc", "reason": "c2 beacon"}}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Endpoint push-host successfully isolated from network");

        let (_, body) = call(app, get_status()).await;
        assert_eq!(body["isolated"], true);
    }
}
