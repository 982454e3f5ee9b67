//! 경로 분할과 JSON 본문 추출
//!
//! `/{operation}/{table-or-userid}[/{partition}[/{row}]]` 형태의 경로를
//! 위치 인자 목록으로 바꿉니다. 인자 부족 판단은 세그먼트 수만으로 합니다.

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use serde_json::Value;
use tg_core::marshal::{self, StringProperties};

use crate::error::{GatewayError, Result};

/// 경로 세그먼트
///
/// 앞의 `/` 하나를 떼고 `/`로 나눕니다. 끝의 `/` 때문에 생긴 빈 세그먼트 하나는 버리고,
/// 중간의 빈 세그먼트는 빈 문자열 키로 그대로 둡니다.
pub fn split_path(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

/// 최소 세그먼트 수 확인
pub fn require_segments(segments: &[String], min: usize, operation: &str) -> Result<()> {
    if segments.len() < min {
        return Err(GatewayError::bad_request(format!(
            "{} needs at least {} path segments, got {}",
            operation,
            min,
            segments.len()
        )));
    }
    Ok(())
}

/// 정확한 세그먼트 수 확인
pub fn require_exact_segments(segments: &[String], count: usize, operation: &str) -> Result<()> {
    if segments.len() != count {
        return Err(GatewayError::bad_request(format!(
            "{} needs exactly {} path segments, got {}",
            operation,
            count,
            segments.len()
        )));
    }
    Ok(())
}

/// JSON 본문 → 문자열 맵
///
/// Content-Type이 `application/json`이 아니거나 본문이 비어 있으면 빈 맵입니다.
pub fn json_body(headers: &HeaderMap, body: &Bytes) -> Result<StringProperties> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StringProperties::new());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::bad_request(format!("Invalid JSON body: {}", e)))?;
    Ok(marshal::from_request_body(&value))
}
