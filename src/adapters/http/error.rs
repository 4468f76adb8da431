use crate::core::PET_NOT_FOUND_MESSAGE;
use crate::utils::error::{FieldViolation, PetError};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Everything a handler can fail with, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Pet(PetError),
    Json(JsonRejection),
    Query(QueryRejection),
}

impl From<PetError> for ApiError {
    fn from(error: PetError) -> Self {
        ApiError::Pet(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Json(rejection)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Query(rejection)
    }
}

fn location(field: &str) -> [&str; 2] {
    match field {
        "limit" => ["query", field],
        _ => ["body", field],
    }
}

fn violation_detail(violation: &FieldViolation) -> serde_json::Value {
    json!({
        "loc": location(&violation.field),
        "msg": violation.message,
        "type": violation.kind.as_str(),
    })
}

fn unprocessable(detail: serde_json::Value) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": detail })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Pet(PetError::ValidationError { violations }) => {
                let detail: Vec<_> = violations.iter().map(violation_detail).collect();
                unprocessable(json!(detail))
            }
            ApiError::Pet(PetError::NotFound { id }) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": { "id": id, "error": PET_NOT_FOUND_MESSAGE } })),
            )
                .into_response(),
            ApiError::Pet(error) => {
                tracing::error!("❌ Request failed: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
            ApiError::Json(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                unprocessable(json!([{
                    "loc": ["body"],
                    "msg": rejection.body_text(),
                    "type": "body_invalid",
                }]))
            }
            ApiError::Query(rejection) => unprocessable(json!([{
                "loc": ["query"],
                "msg": rejection.body_text(),
                "type": "query_invalid",
            }])),
        }
    }
}
