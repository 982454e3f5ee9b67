//! 게이트웨이 에러 타입
//!
//! 모든 에러는 HTTP 상태 하나와 최소한의 JSON 본문으로 응답합니다.
//! 5xx 에러의 원본 메시지는 로그에만 남깁니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 게이트웨이 에러
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("core error: {0}")]
    Core(#[from] tg_core::Error),
}

impl GatewayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        GatewayError::BadRequest {
            message: message.into(),
        }
    }
}

/// 에러 응답 JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", Some(message.clone()))
            }
            GatewayError::Core(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if e.is_client_error() {
                    tracing::debug!("Request rejected: {}", e);
                    (status, e.code(), Some(e.to_string()))
                } else {
                    tracing::error!("Store error: {:?}", e);
                    (status, e.code(), None)
                }
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                request_id: crate::middleware::current_request_id(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
