/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / validation error / auth error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

/// One validation violation. The API always reports these as a list so the
/// client can render every violation at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: &'static str },
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    // Missing profiles are reported as 400 with a message body; the public
    // API has always used that shape and clients depend on it.
    #[error("not found: {message}")]
    NotFound { message: &'static str },
    #[error("conflict")]
    Conflict,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(message: &'static str) -> Self {
        Self::Unauthorized { message }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::NotFound { message }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorsBody {
    errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, Json(MessageBody { message })).into_response()
            }
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorsBody { errors })).into_response()
            }
            AppError::NotFound { message } => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            AppError::Conflict => (
                StatusCode::CONFLICT,
                Json(MessageBody {
                    message: "Profile already exists",
                }),
            )
                .into_response(),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    message: "Server error",
                }),
            )
                .into_response(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict,
            RepoError::Db(e) => {
                tracing::error!(error = ?e, "store failure");
                AppError::Internal
            }
        }
    }
}
