//! Deterministic rule engines and the shared tool-call contract. Every
//! operation returns either a typed payload or a coded error; the serialized
//! envelope is what flows through the request context to the composer.

pub mod ewa;
pub mod hr;
pub mod policy;

use serde::Serialize;
use serde_json::json;

use crate::records::StoreError;

/// Closed set of error codes surfaced through the tool contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidDates,
    InvalidAmount,
    InsufficientBalance,
    NotEligible,
    ExceedsAvailable,
    Internal,
}

/// Coded failure returned by a rule-engine operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::Internal, "Internal error")
    }
}

impl From<StoreError> for ToolError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => ToolError::not_found("Record not found"),
            StoreError::InsufficientBalance {
                requested,
                available,
            } => ToolError::new(
                ErrorCode::InsufficientBalance,
                format!("Insufficient balance: requested {requested}, available {available}"),
            ),
            StoreError::Conflict | StoreError::Unavailable(_) => ToolError::internal(),
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Serialize a tool result into the uniform `{success, ...}` envelope.
pub fn envelope<T: Serialize>(result: &ToolResult<T>) -> serde_json::Value {
    match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(payload) => json!({ "success": true, "data": payload }),
            Err(error) => {
                tracing::error!(%error, "tool payload failed to serialize");
                failure_envelope(&ToolError::internal())
            }
        },
        Err(error) => failure_envelope(error),
    }
}

fn failure_envelope(error: &ToolError) -> serde_json::Value {
    json!({
        "success": false,
        "error": error.message,
        "code": error.code,
    })
}
