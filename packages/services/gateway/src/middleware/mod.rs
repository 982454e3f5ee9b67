//! 게이트웨이 미들웨어
//!
//! 요청마다 ID를 붙이고, 에러 응답 본문과 로그에서 같은 ID를 쓰도록 태스크 로컬에 둡니다.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// 요청 ID 헤더 (요청/응답 공통)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 클라이언트가 보낸 ID의 최대 길이
const MAX_INBOUND_ID_LEN: usize = 128;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 현재 태스크의 요청 ID
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 클라이언트가 준 ID가 쓸 만하면 재사용, 아니면 새로 발급
fn resolve_request_id(req: &Request) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_INBOUND_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = resolve_request_id(&req);
    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut resp = REQUEST_ID
        .scope(id.clone(), next.run(req).instrument(span.clone()))
        .await;

    span.in_scope(|| {
        tracing::info!(
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}
