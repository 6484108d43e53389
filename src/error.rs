// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::difficulty::Difficulty;

/// Global Application Error Enum.
/// Covers question loading, the session state machine and the HTTP edge.
#[derive(Debug, Error)]
pub enum AppError {
    // 400 Bad Request
    #[error("invalid difficulty '{0}'")]
    InvalidDifficulty(String),

    // 500: the backing file for a tier could not be read
    #[error("question source for '{difficulty}' is unavailable: {reason}")]
    SourceUnavailable { difficulty: Difficulty, reason: String },

    // 500
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    // 500
    #[error("answer '{answer}' of the question at line {line} matches none of its options")]
    InconsistentAnswer { line: usize, answer: String },

    // 500
    #[error("question bank '{0}' contains no questions")]
    EmptyBank(Difficulty),

    // 400
    #[error("an answer must be selected")]
    EmptyAnswer,

    // 409
    #[error("session {0} is already finished")]
    SessionFinished(Uuid),

    // 404
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    // 400
    #[error("{0}")]
    BadRequest(String),

    // 401
    #[error("{0}")]
    AuthError(String),

    // 500
    #[error("{0}")]
    InternalServerError(String),
}

impl AppError {
    /// Stable machine-readable name of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidDifficulty(_) => "invalid_difficulty",
            AppError::SourceUnavailable { .. } => "source_unavailable",
            AppError::MalformedRecord { .. } => "malformed_record",
            AppError::InconsistentAnswer { .. } => "inconsistent_answer",
            AppError::EmptyBank(_) => "empty_bank",
            AppError::EmptyAnswer => "empty_answer",
            AppError::SessionFinished(_) => "session_finished",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::AuthError(_) => "unauthorized",
            AppError::InternalServerError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidDifficulty(_) | AppError::EmptyAnswer | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SessionFinished(_) => StatusCode::CONFLICT,
            AppError::SourceUnavailable { .. }
            | AppError::MalformedRecord { .. }
            | AppError::InconsistentAnswer { .. }
            | AppError::EmptyBank(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// Server-side details are logged, never sent to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let error_message = if status.is_server_error() {
            tracing::error!(code, "Internal Server Error: {}", self);
            match self {
                AppError::InternalServerError(_) => "Internal Server Error".to_string(),
                _ => "Question bank unavailable".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::AuthError(format!("Invalid difficulty token: {}", err))
    }
}
