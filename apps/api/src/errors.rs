use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::latex::ParseError;
use crate::templates::GenerationError;
use crate::workspace::edits::EditError;
use crate::workspace::TemplateChangeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::NotFound { .. } => AppError::NotFound(e.to_string()),
            EditError::OutOfRange { .. } => AppError::Validation(e.to_string()),
        }
    }
}

impl From<TemplateChangeError> for AppError {
    fn from(e: TemplateChangeError) -> Self {
        match e {
            TemplateChangeError::UnknownTemplate(_) => AppError::NotFound(e.to_string()),
            TemplateChangeError::ChoiceRequired => AppError::Conflict(e.to_string()),
            TemplateChangeError::Generation(e) => AppError::Generation(e),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::UnprocessableEntity(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_ERROR",
                    e.to_string(),
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
    fn test_domain_errors_map_to_statuses() {
        let status = |e: AppError| e.into_response().status();
        assert_eq!(
            status(TemplateChangeError::ChoiceRequired.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(TemplateChangeError::UnknownTemplate("x".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status(ParseError::Empty.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(EditError::OutOfRange { from: 3, to: 0, len: 1 }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(EditError::NotFound { section: "project", id: "p1".to_string() }.into()),
            StatusCode::NOT_FOUND
        );
    }
}
