//! 라우터 통합 테스트 공용 헬퍼

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tg_core::store::{MemoryStore, SharedKeySigner};
use tg_gateway::{create_auth_router, create_basic_router, AppState, Config};
use tower::ServiceExt;

/// 같은 스토어를 공유하는 두 티어
pub struct Gateway {
    pub basic: Router,
    pub auth: Router,
}

impl Gateway {
    pub fn new() -> Self {
        let store = MemoryStore::new(SharedKeySigner::random());
        let state = Arc::new(AppState::with_client(Config::default(), Arc::new(store)));
        Self {
            basic: create_basic_router(state.clone()),
            auth: create_auth_router(state),
        }
    }

    /// alice/pw1 → DataTable의 P1/R1
    pub async fn with_alice() -> Self {
        let gateway = Self::new();

        let (status, _) = gateway.basic(Method::POST, "/CreateTableAdmin/AuthTable", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = gateway.basic(Method::POST, "/CreateTableAdmin/DataTable", None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = gateway
            .basic(
                Method::PUT,
                "/UpdateEntityAdmin/AuthTable/Userid/alice",
                Some(serde_json::json!({
                    "Password": "pw1",
                    "DataPartition": "P1",
                    "DataRow": "R1"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = gateway
            .basic(
                Method::PUT,
                "/UpdateEntityAdmin/DataTable/P1/R1",
                Some(serde_json::json!({ "Score": "10" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        gateway
    }

    pub async fn basic(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.basic, method, uri, body).await
    }

    pub async fn auth(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.auth, method, uri, body).await
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
