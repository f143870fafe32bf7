use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::records::{Employee, EmployeeId};

use super::service::AssistantService;

/// Router builder exposing the conversational endpoint and the roster view.
pub fn assistant_router(service: Arc<AssistantService>) -> Router {
    Router::new()
        .route("/api/v1/assistant/messages", post(message_handler))
        .route("/api/v1/assistant/employees", get(employees_handler))
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub employee_id: String,
    pub message: String,
}

/// Roster entry kept free of pay and banking details.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: String,
    pub preferred_language: String,
}

impl From<&Employee> for RosterEntry {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            role: employee.role.clone(),
            preferred_language: employee.preferred_language.code().to_string(),
        }
    }
}

pub(crate) async fn message_handler(
    State(service): State<Arc<AssistantService>>,
    axum::Json(request): axum::Json<MessageRequest>,
) -> Response {
    // The pipeline blocks on external capabilities, so keep it off the
    // async worker threads.
    let turn = tokio::task::spawn_blocking(move || {
        let employee_id = EmployeeId::new(request.employee_id);
        service.respond(&employee_id, &request.message).view()
    })
    .await;

    match turn {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => {
            tracing::error!(%error, "assistant turn task failed");
            let payload = json!({ "error": "assistant unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn employees_handler(
    State(service): State<Arc<AssistantService>>,
) -> Response {
    match service.roster() {
        Ok(employees) => {
            let roster: Vec<RosterEntry> = employees.iter().map(RosterEntry::from).collect();
            (StatusCode::OK, axum::Json(roster)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
