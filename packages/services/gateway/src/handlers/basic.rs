//! 엔티티 티어 핸들러
//!
//! 스키마 없는 엔티티에 대한 범용 CRUD입니다.
//! 첫 세그먼트가 작업을, 나머지가 위치 인자(table, partition, row)를 나타냅니다.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tg_core::auth;
use tg_core::marshal;
use tg_core::query::{self, CreateOutcome, ROW_WILDCARD};
use tg_core::store::{SharedAccessPermissions, TableHandle};

use super::path::{json_body, require_exact_segments, require_segments, split_path};
use crate::error::{GatewayError, Result};
use crate::state::AppState;

pub const READ_ENTITY_ADMIN: &str = "ReadEntityAdmin";
pub const READ_ENTITY_AUTH: &str = "ReadEntityAuth";
pub const CREATE_TABLE_ADMIN: &str = "CreateTableAdmin";
pub const UPDATE_ENTITY_ADMIN: &str = "UpdateEntityAdmin";
pub const UPDATE_ENTITY_AUTH: &str = "UpdateEntityAuth";
pub const ADD_PROPERTY_ADMIN: &str = "AddPropertyAdmin";
pub const UPDATE_PROPERTY_ADMIN: &str = "UpdatePropertyAdmin";
pub const DELETE_TABLE_ADMIN: &str = "DeleteTableAdmin";
pub const DELETE_ENTITY_ADMIN: &str = "DeleteEntityAdmin";

/// 엔티티 티어 작업
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    ReadEntity,
    ReadEntityAuth,
    CreateTable,
    UpdateEntity,
    UpdateEntityAuth,
    AddProperty,
    UpdateProperty,
    DeleteTable,
    DeleteEntity,
}

impl Operation {
    fn parse(name: &str) -> Result<Self> {
        Ok(match name {
            READ_ENTITY_ADMIN => Operation::ReadEntity,
            READ_ENTITY_AUTH => Operation::ReadEntityAuth,
            CREATE_TABLE_ADMIN => Operation::CreateTable,
            UPDATE_ENTITY_ADMIN => Operation::UpdateEntity,
            UPDATE_ENTITY_AUTH => Operation::UpdateEntityAuth,
            ADD_PROPERTY_ADMIN => Operation::AddProperty,
            UPDATE_PROPERTY_ADMIN => Operation::UpdateProperty,
            DELETE_TABLE_ADMIN => Operation::DeleteTable,
            DELETE_ENTITY_ADMIN => Operation::DeleteEntity,
            _ => {
                return Err(GatewayError::bad_request(format!(
                    "Unknown operation: {}",
                    name
                )))
            }
        })
    }
}

/// 세그먼트 분할 + 작업 파싱 (테이블 이름까지 필수)
fn parse_request(path: Option<Path<String>>) -> Result<(Operation, Vec<String>)> {
    let segments = path.map(|Path(p)| split_path(&p)).unwrap_or_default();
    require_segments(&segments, 2, "request")?;
    let operation = Operation::parse(&segments[0])?;
    Ok((operation, segments))
}

fn wrong_method(operation: Operation) -> GatewayError {
    GatewayError::bad_request(format!("{:?} is not available for this method", operation))
}

/// 존재하는 테이블만 반환
async fn existing_table(state: &AppState, name: &str) -> Result<TableHandle> {
    let table = state.tables.lookup(name).await?;
    if !table.exists().await? {
        return Err(tg_core::Error::TableNotFound {
            table: name.to_string(),
        }
        .into());
    }
    Ok(table)
}

/// GET: 엔티티 조회
pub async fn handle_get(
    State(state): State<Arc<AppState>>,
    path: Option<Path<String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let (operation, segments) = parse_request(path)?;

    match operation {
        Operation::ReadEntity => {
            let table = existing_table(&state, &segments[1]).await?;
            match &segments[2..] {
                // 테이블 전체 또는 본문의 속성 이름을 모두 가진 엔티티
                [] => {
                    let required: BTreeSet<String> =
                        json_body(&headers, &body)?.into_keys().collect();
                    let entities = if required.is_empty() {
                        query::get_all(table.as_ref()).await?
                    } else {
                        query::get_all_matching_names(table.as_ref(), &required).await?
                    };
                    Ok(Json(marshal::entities_to_json(&entities)).into_response())
                }
                [partition] => {
                    let entities = query::get_by_partition(table.as_ref(), partition).await?;
                    Ok(Json(marshal::entities_to_json(&entities)).into_response())
                }
                [partition, row, ..] if row == ROW_WILDCARD => {
                    let entities = query::get_by_partition(table.as_ref(), partition).await?;
                    Ok(Json(marshal::entities_to_json(&entities)).into_response())
                }
                [partition, row, ..] => {
                    let entity = query::get_one(table.as_ref(), partition, row).await?;
                    Ok(Json(marshal::properties_to_json(&entity.properties)).into_response())
                }
            }
        }
        Operation::ReadEntityAuth => {
            require_exact_segments(&segments, 5, READ_ENTITY_AUTH)?;
            let (token, partition, row) = (&segments[2], &segments[3], &segments[4]);

            let table = existing_table(&state, &segments[1]).await?;
            auth::authorize(
                table.as_ref(),
                token,
                partition,
                row,
                SharedAccessPermissions::READ,
            )?;
            let entity = query::get_one(table.as_ref(), partition, row).await?;
            Ok(Json(marshal::properties_to_json(&entity.properties)).into_response())
        }
        other => Err(wrong_method(other)),
    }
}

/// POST: 테이블 생성
pub async fn handle_post(
    State(state): State<Arc<AppState>>,
    path: Option<Path<String>>,
) -> Result<Response> {
    let (operation, segments) = parse_request(path)?;
    if operation != Operation::CreateTable {
        return Err(wrong_method(operation));
    }

    let name = &segments[1];
    let status = match query::create_table(&state.tables, name).await? {
        CreateOutcome::Created => StatusCode::CREATED,
        CreateOutcome::AlreadyExists => StatusCode::ACCEPTED,
    };
    Ok(status.into_response())
}

/// PUT: 엔티티/속성 갱신
pub async fn handle_put(
    State(state): State<Arc<AppState>>,
    path: Option<Path<String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let (operation, segments) = parse_request(path)?;

    match operation {
        Operation::UpdateEntity => {
            require_segments(&segments, 4, UPDATE_ENTITY_ADMIN)?;
            let updates = json_body(&headers, &body)?;
            let table = existing_table(&state, &segments[1]).await?;

            tracing::info!(
                table = %segments[1],
                partition = %segments[2],
                row = %segments[3],
                "merging entity"
            );
            query::merge_properties(table.as_ref(), &segments[2], &segments[3], &updates).await?;
            Ok(StatusCode::OK.into_response())
        }
        Operation::UpdateEntityAuth => {
            require_exact_segments(&segments, 5, UPDATE_ENTITY_AUTH)?;
            let (token, partition, row) = (&segments[2], &segments[3], &segments[4]);
            let updates = json_body(&headers, &body)?;
            let table = existing_table(&state, &segments[1]).await?;

            auth::authorize(
                table.as_ref(),
                token,
                partition,
                row,
                SharedAccessPermissions::UPDATE,
            )?;
            query::merge_properties(table.as_ref(), partition, row, &updates).await?;
            Ok(StatusCode::OK.into_response())
        }
        Operation::AddProperty | Operation::UpdateProperty => {
            let values = json_body(&headers, &body)?;
            if values.is_empty() {
                return Err(GatewayError::bad_request(
                    "Expected a JSON object with at least one property",
                ));
            }
            let table = existing_table(&state, &segments[1]).await?;

            let touched = if operation == Operation::AddProperty {
                query::add_property_to_all(table.as_ref(), &values).await?
            } else {
                query::update_existing_property(table.as_ref(), &values).await?
            };
            tracing::info!(
                table = %segments[1],
                operation = ?operation,
                touched,
                "property applied table-wide"
            );
            Ok(StatusCode::OK.into_response())
        }
        other => Err(wrong_method(other)),
    }
}

/// DELETE: 테이블/엔티티 삭제
pub async fn handle_delete(
    State(state): State<Arc<AppState>>,
    path: Option<Path<String>>,
) -> Result<Response> {
    let (operation, segments) = parse_request(path)?;

    match operation {
        Operation::DeleteTable => {
            tracing::info!(table = %segments[1], "deleting table");
            query::delete_table(&state.tables, &segments[1]).await?;
            Ok(StatusCode::OK.into_response())
        }
        Operation::DeleteEntity => {
            require_segments(&segments, 4, DELETE_ENTITY_ADMIN)?;
            let table = state.tables.lookup(&segments[1]).await?;

            tracing::info!(
                table = %segments[1],
                partition = %segments[2],
                row = %segments[3],
                "deleting entity"
            );
            query::delete_entity(table.as_ref(), &segments[2], &segments[3]).await?;
            Ok(StatusCode::OK.into_response())
        }
        other => Err(wrong_method(other)),
    }
}
