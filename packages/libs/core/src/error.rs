//! 공통 에러 타입
//!
//! 게이트웨이 코어 전체에서 사용되는 에러 타입을 정의합니다.
//! 백엔드 스토어의 원본 에러 문자열은 로그에만 남기고 클라이언트에는 코드만 노출합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// 게이트웨이 코어 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Request Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("bad request: {message}")]
    BadRequest { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Not Found
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    #[error("entity not found: {partition}/{row}")]
    EntityNotFound { partition: String, row: String },

    /// 존재하지 않는 사용자와 잘못된 비밀번호를 구분하지 않습니다.
    #[error("credential not found")]
    CredentialNotFound,

    // ─────────────────────────────────────────────────────────────────────────────
    // Token Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("access denied: {reason}")]
    AccessDenied { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Backend Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("signing error: {message}")]
    Signing { message: String },

    #[error("store operation failed: {message}")]
    Store { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// 스토어 에러 생성 헬퍼
    pub fn store(message: impl Into<String>) -> Self {
        Error::Store {
            message: message.into(),
        }
    }

    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::BadRequest { .. } => 400,

            // 401 Unauthorized
            Error::InvalidToken { .. } => 401,

            // 403 Forbidden
            Error::AccessDenied { .. } => 403,

            // 404 Not Found
            Error::TableNotFound { .. }
            | Error::EntityNotFound { .. }
            | Error::CredentialNotFound => 404,

            // 500 Internal Server Error
            Error::Signing { .. } | Error::Store { .. } | Error::Yaml(_) => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    ///
    /// 서명 실패와 스토어 실패는 같은 코드로 보입니다.
    pub fn code(&self) -> &'static str {
        match self {
            Error::BadRequest { .. } => "BAD_REQUEST",
            Error::TableNotFound { .. } => "TABLE_NOT_FOUND",
            Error::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Error::CredentialNotFound => "NOT_FOUND",
            Error::InvalidToken { .. } => "INVALID_TOKEN",
            Error::AccessDenied { .. } => "ACCESS_DENIED",
            Error::Signing { .. } | Error::Store { .. } | Error::Yaml(_) => "INTERNAL_ERROR",
        }
    }

    /// 클라이언트에 메시지를 노출해도 되는지 여부 (4xx만)
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
