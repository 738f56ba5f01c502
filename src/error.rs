/*
 * Responsibility
 * - ゲートウェイの拒否理由 (GateError) と アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / `{success: false, message}` JSON body)
 * - 内部エラーの詳細はレスポンスに出さない
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: &'static str,
}

impl ErrorResponse {
    fn new(message: &'static str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Why the gateway refused a request.
///
/// Session-store outages never show up here: they are already "no credential".
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("no credential")]
    NoCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error("expired credential")]
    ExpiredCredential,
    #[error("insufficient role")]
    InsufficientRole,
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::InsufficientRole => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GateError::NoCredential => "Unauthorized: Please log in.",
            GateError::MalformedCredential | GateError::ExpiredCredential => {
                "Unauthorized: Invalid or expired token."
            }
            GateError::InsufficientRole => "Forbidden: You do not have permission.",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found."),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
