use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the matching core. Everything else degrades to sentinels.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The uploaded document could not be decoded to text at all.
    #[error("could not read document: {0}")]
    Extraction(String),

    /// The student has no stored profile to score against.
    #[error("student {0} has no profile")]
    ProfileMissing(Uuid),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Match(MatchError::ProfileMissing(_)) => (
                StatusCode::BAD_REQUEST,
                "PROFILE_INCOMPLETE",
                "Please complete your profile first".to_string(),
            ),
            AppError::Match(MatchError::Extraction(reason)) => {
                tracing::warn!("Document extraction failed: {reason}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNREADABLE_DOCUMENT",
                    "We couldn't read this file, please try another format".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_missing_is_bad_request() {
        let response = AppError::from(MatchError::ProfileMissing(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_extraction_is_unprocessable() {
        let response = AppError::from(MatchError::Extraction("corrupt".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("job".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
