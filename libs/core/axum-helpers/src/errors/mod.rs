pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// This structure is returned for all error responses, providing consistent
/// error information to clients including
/// - `code`: Integer error code for logging/monitoring (e.g., 1001)
/// - `error`: Machine-readable error identifier (e.g., "VALIDATION_ERROR")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Request validation failed",
///   "details": { "limit": [{ "code": "range", "message": null, "params": { "max": 50.0, "min": 1.0, "value": 51 } }] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Errors an HTTP handler can return.
///
/// Input problems (query parsing, validation) map to `422 Unprocessable Entity`;
/// everything the caller cannot fix maps to a 5xx status.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::QueryExtractorRejection(_) | AppError::ValidationError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn into_body(self) -> ErrorResponse {
        match self {
            AppError::QueryExtractorRejection(e) => {
                ErrorResponse::new(ErrorCode::InvalidQuery, e.body_text())
            }
            AppError::ValidationError(e) => ErrorResponse::new(
                ErrorCode::ValidationError,
                ErrorCode::ValidationError.default_message(),
            )
            .with_details(validation_details(&e)),
            AppError::NotFound(msg) => ErrorResponse::new(ErrorCode::NotFound, msg),
            AppError::InternalServerError(msg) => ErrorResponse::new(ErrorCode::InternalError, msg),
            AppError::ServiceUnavailable(msg) => {
                ErrorResponse::new(ErrorCode::ServiceUnavailable, msg)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.into_body();

        if status.is_server_error() {
            tracing::error!(error_code = body.code, "{}: {}", body.error, body.message);
        } else {
            tracing::info!(error_code = body.code, "{}: {}", body.error, body.message);
        }

        (status, Json(body)).into_response()
    }
}

/// Flatten validator field errors into `{ field: [{code, message, params}] }`.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct LimitOnly {
        #[validate(range(min = 1, max = 50))]
        limit: u32,
    }

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_422_with_field_details() {
        let err = LimitOnly { limit: 0 }.validate().unwrap_err();
        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_of(response).await;
        assert_eq!(body.error, "VALIDATION_ERROR");
        assert_eq!(body.code, 1001);
        assert!(body.details.unwrap().get("limit").is_some());
    }

    #[tokio::test]
    async fn test_internal_error_keeps_message() {
        let response = AppError::InternalServerError("pool gone".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, "INTERNAL_ERROR");
        assert_eq!(body.message, "pool gone");
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_query_rejection_is_422_invalid_query() {
        use axum::extract::{FromRequestParts, Query};
        use axum::http::Request;

        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            q: String,
        }

        let (mut parts, _) = Request::builder()
            .uri("/search")
            .body(())
            .unwrap()
            .into_parts();
        let rejection = Query::<Needs>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = AppError::from(rejection).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_of(response).await;
        assert_eq!(body.error, "INVALID_QUERY");
        assert_eq!(body.code, 1002);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
