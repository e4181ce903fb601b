use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use plan_my_day::{config::LlmConfig, planner::DayPlanner, server};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

/// LLM settings matching the built-in defaults, pointed at a test key
pub fn create_test_llm_config() -> LlmConfig {
    let mut config = LlmConfig::default();
    config.api_keys.paid = Some("test-api-key".to_string());
    config
}

/// Build the full router around a mock client, keeping a handle on the mock
pub fn create_test_app(mock: MockLlmClient) -> (Router, Arc<MockLlmClient>) {
    create_test_app_with_timeout(mock, Duration::from_secs(5))
}

pub fn create_test_app_with_timeout(
    mock: MockLlmClient,
    timeout: Duration,
) -> (Router, Arc<MockLlmClient>) {
    let mock = Arc::new(mock);
    let planner = DayPlanner::new(mock.clone(), &create_test_llm_config())
        .with_request_timeout(timeout);

    (server::router(Arc::new(planner)), mock)
}

pub fn plan_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/plan_my_day")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn schedule_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat-api")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Status plus the parsed JSON body
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

/// Asserts the body is an object with exactly one key and returns its string value
pub fn only_string_field<'a>(body: &'a Value, key: &str) -> &'a str {
    let object = body.as_object().expect("response body is a JSON object");
    assert_eq!(object.len(), 1, "unexpected keys in {}", body);
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field `{}` in {}", key, body))
}
