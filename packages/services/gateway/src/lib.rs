//! Table Gateway
//!
//! 두 개의 HTTP 티어를 제공합니다.
//!
//! - 엔티티 티어: 스키마 없는 테이블/엔티티 CRUD와 토큰 기반 단일 엔티티 접근
//! - 인증 티어: 사용자 자격 증명을 확인하고 단일 엔티티 토큰 발급
//!
//! 두 티어는 같은 [`AppState`]를 공유하므로 한 프로세스 안에서 같은 스토어를 봅니다.

use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use config::Config;
pub use state::AppState;

use handlers::{auth, basic, health};

/// 엔티티 티어 라우터
pub fn create_basic_router(state: Arc<AppState>) -> Router {
    let entity_routes = get(basic::handle_get)
        .post(basic::handle_post)
        .put(basic::handle_put)
        .delete(basic::handle_delete);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/", entity_routes.clone())
        .route("/*path", entity_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        .with_state(state)
}

/// 인증 티어 라우터 (GET만)
pub fn create_auth_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(auth::handle_get))
        .route("/*path", get(auth::handle_get))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        .with_state(state)
}
