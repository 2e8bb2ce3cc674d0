use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dapur_core::ValidationErrors;
use thiserror::Error;

use crate::api::{ErrorResponse, ValidationErrorResponse};
use crate::auth::{PasswordError, SessionError};
use crate::storage::StorageError;
use crate::store::StoreError;

/// Errors a handler can return. Every variant renders as JSON with a
/// `message` field.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid field")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Forbidden access")]
    Forbidden,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{message}")]
    Malformed { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn recipe_not_found() -> Self {
        ApiError::NotFound("Recipe not found")
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "store operation failed");
        ApiError::Internal("Database operation failed")
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        tracing::error!(error = %e, "failed to create session");
        ApiError::Internal("Failed to create session")
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "failed to hash password");
        ApiError::Internal("Failed to hash password")
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        tracing::error!(error = %e, "failed to store thumbnail");
        ApiError::Internal("Failed to store thumbnail")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(errors) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationErrorResponse {
                        message: self.to_string(),
                        errors: errors.clone(),
                    }),
                )
                    .into_response();
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Malformed { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let response =
            ApiError::from(ValidationErrors::single("title", "The title field is required."))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Invalid field");
        assert_eq!(json["errors"]["title"][0], "The title field is required.");
    }

    #[tokio::test]
    async fn test_store_errors_are_not_leaked() {
        let response =
            ApiError::from(StoreError::Connection("password=secret".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Database operation failed");
    }

    #[tokio::test]
    async fn test_forbidden_message() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["message"], "Forbidden access");
    }
}
