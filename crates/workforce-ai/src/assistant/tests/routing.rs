use std::sync::Arc;

use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assistant::assistant_router;

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn message_route_returns_a_completed_turn() {
    let service = Arc::new(seeded_service(Arc::new(ScriptedModel::default())));
    let router = assistant_router(service);

    let request = axum::http::Request::post("/api/v1/assistant/messages")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&json!({
                "employee_id": "EMP001",
                "message": "What is my leave balance?",
            }))
            .expect("serialize request"),
        ))
        .expect("build request");

    let response = router.oneshot(request).await.expect("route responds");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["employee_id"], "EMP001");
    assert_eq!(body["language"], "en");
    assert_eq!(body["intent"], "hr_query");
    assert_eq!(body["response"], "Here is what I found.");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn message_route_reports_degraded_turns_with_ok_status() {
    let model = Arc::new(ScriptedModel {
        intent: Some("ewa_request".to_string()),
        ewa_action: None,
        ..ScriptedModel::default()
    });
    let service = Arc::new(seeded_service(model));
    let router = assistant_router(service);

    let request = axum::http::Request::post("/api/v1/assistant/messages")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&json!({
                "employee_id": "EMP001",
                "message": "advance please",
            }))
            .expect("serialize request"),
        ))
        .expect("build request");

    let response = router.oneshot(request).await.expect("route responds");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Unable to process EWA request");
    assert!(body["response"]
        .as_str()
        .expect("response text")
        .starts_with("I'm sorry"));
}

#[tokio::test]
async fn employees_route_lists_the_roster() {
    let service = Arc::new(seeded_service(Arc::new(ScriptedModel::default())));
    let router = assistant_router(service);

    let request = axum::http::Request::get("/api/v1/assistant/employees")
        .body(axum::body::Body::empty())
        .expect("build request");

    let response = router.oneshot(request).await.expect("route responds");
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = read_json_body(response).await;
    let roster = body.as_array().expect("array body");
    assert_eq!(roster.len(), 12);
    assert_eq!(roster[0]["id"], "EMP001");
    assert!(roster[0].get("bank_account_last4").is_none());
    assert!(roster[0].get("hourly_rate").is_none());
}
