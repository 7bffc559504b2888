//! HTTP-facing error type
//!
//! Every handler returns `Result<_, ApiError>`. Missing artifacts become
//! `404 {"error": ...}`, client mistakes `400 {"detail": ...}`, and every
//! collaborator failure `500 {"detail": ...}`.

use crate::romanize::RomanizeError;
use crate::simplify::SimplifyError;
use crate::speech::SpeechError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Stable machine-readable error codes, logged alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Romanization,
    Speech,
    Simplification,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::Romanization => "ROMANIZATION_FAILED",
            Self::Speech => "SPEECH_FAILED",
            Self::Simplification => "SIMPLIFICATION_FAILED",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Romanize(#[from] RomanizeError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Simplify(#[from] SimplifyError),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) | Self::Speech(SpeechError::EmptyText) => ErrorCode::InvalidInput,
            Self::Speech(SpeechError::NotFound(_)) => ErrorCode::NotFound,
            Self::Romanize(_) => ErrorCode::Romanization,
            Self::Speech(_) => ErrorCode::Speech,
            Self::Simplify(_) => ErrorCode::Simplification,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Romanization | ErrorCode::Speech | ErrorCode::Simplification => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code = self.code().as_str(), "{}", message);
        } else {
            tracing::debug!(code = self.code().as_str(), "{}", message);
        }

        let body = if status == StatusCode::NOT_FOUND {
            serde_json::json!({ "error": message })
        } else {
            serde_json::json!({ "detail": message })
        };

        (status, Json(body)).into_response()
    }
}
