//! 엔티티 티어 라우터 통합 테스트

mod common;

use axum::http::{Method, StatusCode};
use common::Gateway;
use serde_json::json;

#[tokio::test]
async fn test_create_table_twice() {
    let gateway = Gateway::new();

    let (status, _) = gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_update_then_read_entity() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;

    let (status, _) = gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Name": "Kim", "Age": 30 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // 병합: 기존 속성 유지
    let (status, _) = gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Age": 31 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Seoul/kim", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Age": "31", "Name": "Kim" }));
}

#[tokio::test]
async fn test_read_lists() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    let people = [
        ("Seoul", "kim", "Kim"),
        ("Seoul", "lee", "Lee"),
        ("Busan", "park", "Park"),
    ];
    for (partition, row, name) in people {
        let uri = format!("/UpdateEntityAdmin/People/{}/{}", partition, row);
        gateway
            .basic(Method::PUT, &uri, Some(json!({ "Name": name })))
            .await;
    }

    let (status, body) = gateway.basic(Method::GET, "/ReadEntityAdmin/People", None).await;
    assert_eq!(status, StatusCode::OK);
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 3);
    let first = all[0].as_object().unwrap();
    let keys: Vec<&String> = first.keys().collect();
    assert_eq!(keys, vec!["Partition", "Row", "Name"]);

    let (status, body) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Seoul", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // row 와일드카드는 파티션 조회
    let (status, body) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Busan/*", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["Row"], "park");
}

#[tokio::test]
async fn test_read_by_property_names() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Name": "Kim", "Email": "kim@example.com" })),
        )
        .await;
    gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/lee",
            Some(json!({ "Name": "Lee" })),
        )
        .await;

    // 값은 비교하지 않음
    let (status, body) = gateway
        .basic(
            Method::GET,
            "/ReadEntityAdmin/People",
            Some(json!({ "Email": "nobody@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let matched = body.as_array().unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["Row"], "kim");
}

#[tokio::test]
async fn test_missing_table_and_entity() {
    let gateway = Gateway::new();

    let (status, body) = gateway.basic(Method::GET, "/ReadEntityAdmin/Nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TABLE_NOT_FOUND");

    let (status, _) = gateway
        .basic(Method::PUT, "/UpdateEntityAdmin/Nope/P/R", Some(json!({ "A": "1" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    let (status, body) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Seoul/ghost", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "ENTITY_NOT_FOUND");
}

#[tokio::test]
async fn test_bad_requests() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;

    let cases = [
        (Method::GET, "/"),
        (Method::GET, "/ReadEntityAdmin"),
        (Method::GET, "/FrobnicateAdmin/People"),
        (Method::GET, "/CreateTableAdmin/People"),
        (Method::POST, "/CreateTableAdmin"),
        (Method::PUT, "/UpdateEntityAdmin/People/Seoul"),
        (Method::DELETE, "/DeleteEntityAdmin/People/Seoul"),
    ];
    for (method, uri) in cases {
        let (status, body) = gateway.basic(method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_delete_entity() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Name": "Kim" })),
        )
        .await;

    let (status, _) = gateway
        .basic(Method::DELETE, "/DeleteEntityAdmin/People/Seoul/kim", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = gateway
        .basic(Method::DELETE, "/DeleteEntityAdmin/People/Seoul/kim", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_table_then_recreate() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Name": "Kim" })),
        )
        .await;

    let (status, _) = gateway.basic(Method::DELETE, "/DeleteTableAdmin/People", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = gateway.basic(Method::GET, "/ReadEntityAdmin/People", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = gateway.basic(Method::DELETE, "/DeleteTableAdmin/People", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 캐시가 비워져 새 테이블로 열림
    let (status, _) = gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = gateway.basic(Method::GET, "/ReadEntityAdmin/People", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_add_and_update_property() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;
    gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People/Seoul/kim",
            Some(json!({ "Name": "Kim" })),
        )
        .await;
    gateway
        .basic(Method::PUT, "/UpdateEntityAdmin/People/Seoul/lee", Some(json!({})))
        .await;

    let (status, _) = gateway
        .basic(Method::PUT, "/AddPropertyAdmin/People", Some(json!({ "Status": "new" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = gateway.basic(Method::GET, "/ReadEntityAdmin/People", None).await;
    for entity in body.as_array().unwrap() {
        assert_eq!(entity["Status"], "new");
    }

    let (status, _) = gateway
        .basic(
            Method::PUT,
            "/UpdatePropertyAdmin/People",
            Some(json!({ "Name": "Renamed", "Status": "old" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, kim) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Seoul/kim", None)
        .await;
    assert_eq!(kim, json!({ "Name": "Renamed", "Status": "old" }));

    // 없는 속성은 추가하지 않음
    let (_, lee) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People/Seoul/lee", None)
        .await;
    assert_eq!(lee, json!({ "Status": "old" }));
}

#[tokio::test]
async fn test_property_ops_need_body() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;

    let (status, _) = gateway.basic(Method::PUT, "/AddPropertyAdmin/People", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = gateway
        .basic(Method::PUT, "/UpdatePropertyAdmin/People", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = gateway
        .basic(Method::PUT, "/AddPropertyAdmin/Nope", Some(json!({ "A": "1" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let gateway = Gateway::new();

    let (status, body) = gateway.basic(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = gateway.auth(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_empty_partition_key_is_literal() {
    let gateway = Gateway::new();
    gateway.basic(Method::POST, "/CreateTableAdmin/People", None).await;

    let (status, _) = gateway
        .basic(
            Method::PUT,
            "/UpdateEntityAdmin/People//kim",
            Some(json!({ "Name": "Kim" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = gateway
        .basic(Method::GET, "/ReadEntityAdmin/People//kim", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Name": "Kim" }));

    // 끝의 `/`는 세그먼트를 만들지 않음
    let (status, body) = gateway.basic(Method::GET, "/ReadEntityAdmin/People/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Partition"], "");
    assert_eq!(body[0]["Row"], "kim");

    let (status, _) = gateway
        .basic(Method::DELETE, "/DeleteEntityAdmin/People//kim", None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
