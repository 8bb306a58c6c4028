use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use common::ValidationErrors;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

#[derive(Debug)]
pub enum GameServiceError {
    Database(sqlx::Error),
    Validation(ValidationErrors),
    GameNotFound(i32),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::Database(e) => write!(f, "Database error: {}", e),
            GameServiceError::Validation(e) => write!(f, "Validation error: {}", e),
            GameServiceError::GameNotFound(id) => write!(f, "Game {} not found", id),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<sqlx::Error> for GameServiceError {
    fn from(err: sqlx::Error) -> Self {
        GameServiceError::Database(err)
    }
}

impl From<ValidationErrors> for GameServiceError {
    fn from(err: ValidationErrors) -> Self {
        GameServiceError::Validation(err)
    }
}

/// Bodies that are not JSON, or lack/mistype a field, never reach the handler.
/// Every rejection is a 400 validation failure, including a request without
/// an `application/json` content type and a body that could not be read.
impl From<JsonRejection> for GameServiceError {
    fn from(rejection: JsonRejection) -> Self {
        GameServiceError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl IntoResponse for GameServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GameServiceError::Database(e) => {
                log::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal_error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        errors: None,
                    },
                )
            }
            GameServiceError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "validation_failed".to_string(),
                    message: "One or more validation errors occurred.".to_string(),
                    errors: Some(errors),
                },
            ),
            GameServiceError::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "not_found".to_string(),
                    message: format!("Game {} not found", id),
                    errors: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
