use std::path::PathBuf;

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CpvError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No records found in {0}")]
    EmptyDataset(PathBuf),

    #[error("Model dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Record/vector count mismatch: {records} records, {vectors} vectors")]
    CountMismatch { records: usize, vectors: usize },

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CpvResult<T> = Result<T, CpvError>;

impl From<lancedb::Error> for CpvError {
    fn from(err: lancedb::Error) -> Self {
        match err {
            lancedb::Error::TableNotFound { name, .. } => CpvError::TableNotFound(name),
            other => CpvError::Store(other.to_string()),
        }
    }
}

impl From<arrow_schema::ArrowError> for CpvError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        CpvError::Store(format!("Arrow error: {}", err))
    }
}

impl From<core_config::ConfigError> for CpvError {
    fn from(err: core_config::ConfigError) -> Self {
        CpvError::Config(err.to_string())
    }
}

/// Convert CpvError to AppError for standardized HTTP error responses
impl From<CpvError> for AppError {
    fn from(err: CpvError) -> Self {
        match err {
            CpvError::Validation(errors) => AppError::ValidationError(errors),
            CpvError::TableNotFound(name) => {
                AppError::ServiceUnavailable(format!("Table {} not found", name))
            }
            CpvError::Store(msg) => {
                AppError::InternalServerError(format!("Vector store error: {}", msg))
            }
            CpvError::Embedding(msg) => {
                AppError::InternalServerError(format!("Embedding error: {}", msg))
            }
            CpvError::Internal(msg) => AppError::InternalServerError(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for CpvError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[derive(Validate)]
    struct QueryOnly {
        #[validate(length(min = 1))]
        q: String,
    }

    #[test]
    fn test_validation_maps_to_422() {
        let err = CpvError::from(QueryOnly { q: String::new() }.validate().unwrap_err());
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_runtime_failures_map_to_500() {
        for err in [
            CpvError::Store("io".into()),
            CpvError::Embedding("onnx".into()),
            CpvError::Internal("worker gone".into()),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = CpvError::DimensionMismatch {
            expected: 384,
            actual: 512,
        };
        assert_eq!(
            err.to_string(),
            "Model dimension mismatch: expected 384, got 512"
        );
    }
}
