use std::time::Duration;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    auth::{hasher::HashingFailure, TokenError},
    storage::StoreError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not provided")]
    MissingParameter(&'static str),

    #[error("{0} not provided")]
    MissingCredential(&'static str),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("refresh token mismatch")]
    RefreshTokenMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Hashing(#[from] HashingFailure),

    #[error("request timed out after {0:?}")]
    RequestTimeout(Duration),

    #[error("{0}")]
    Internal(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedQuery(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::MalformedQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::MissingCredential(_)
            | AppError::Unauthorized(_)
            | AppError::RefreshTokenMismatch => StatusCode::UNAUTHORIZED,
            AppError::Store(e) => match e {
                StoreError::InvalidUserId | StoreError::InvalidEmail => StatusCode::BAD_REQUEST,
                StoreError::UserNotFound | StoreError::SessionNotFound => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Token(TokenError::Invalid(_)) => StatusCode::UNAUTHORIZED,
            AppError::Token(_)
            | AppError::Hashing(_)
            | AppError::RequestTimeout(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        // Runs inside the request span, which carries method, uri and request id.
        if status.is_server_error() {
            error!(%status, error = %message, "request failed");
        } else {
            warn!(%status, error = %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
