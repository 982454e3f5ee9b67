//! 엔티티 조회/필터 엔진
//!
//! 테이블 핸들 위에서 동작하는 범용 CRUD입니다.
//! 조회는 모두 전체 스캔 기반이며 호출마다 다시 실행됩니다.

use std::collections::BTreeSet;

use crate::cache::TableCache;
use crate::entity::{Entity, TypedValue};
use crate::error::{Error, Result};
use crate::marshal::{self, StringProperties};
use crate::store::Table;

/// 파티션 전체를 뜻하는 행 선택자
pub const ROW_WILDCARD: &str = "*";

/// 테이블 생성 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// 전체 엔티티
pub async fn get_all(table: &dyn Table) -> Result<Vec<Entity>> {
    table.query_entities().await
}

/// 주어진 속성 이름을 모두 가진 엔티티
///
/// 값은 비교하지 않고 이름만 봅니다. 호출자는 이름+값 일치를 기대할 수 있어
/// 의심스러운 동작이지만 기존 클라이언트 호환을 위해 유지합니다.
/// 빈 집합은 모든 엔티티와 일치합니다.
pub async fn get_all_matching_names(
    table: &dyn Table,
    required: &BTreeSet<String>,
) -> Result<Vec<Entity>> {
    let entities = table.query_entities().await?;
    Ok(entities
        .into_iter()
        .filter(|entity| {
            let matched = required
                .iter()
                .filter(|name| entity.has_property(name))
                .count();
            matched == required.len()
        })
        .collect())
}

/// 파티션 키가 일치하는 엔티티
pub async fn get_by_partition(table: &dyn Table, partition: &str) -> Result<Vec<Entity>> {
    let entities = table.query_entities().await?;
    Ok(entities
        .into_iter()
        .filter(|entity| entity.partition_key == partition)
        .collect())
}

/// 단일 엔티티
pub async fn get_one(table: &dyn Table, partition: &str, row: &str) -> Result<Entity> {
    table
        .retrieve_entity(partition, row)
        .await?
        .ok_or_else(|| Error::EntityNotFound {
            partition: partition.to_string(),
            row: row.to_string(),
        })
}

/// insert-or-merge
///
/// 지정한 속성만 String 타입 값으로 덮어쓰고 나머지는 그대로 둡니다.
/// 엔티티가 없으면 새로 만듭니다.
pub async fn merge_properties(
    table: &dyn Table,
    partition: &str,
    row: &str,
    updates: &StringProperties,
) -> Result<()> {
    let mut entity = Entity::new(partition, row);
    entity.properties = marshal::to_string_properties(updates);
    table.insert_or_merge_entity(entity).await
}

/// 엔티티 삭제
pub async fn delete_entity(table: &dyn Table, partition: &str, row: &str) -> Result<()> {
    table.delete_entity(partition, row).await
}

/// 모든 엔티티에 속성 추가 (이미 있으면 값 교체)
///
/// 엔티티별로 병합하므로 중간에 실패하면 앞선 엔티티만 반영된 채로 남습니다.
pub async fn add_property_to_all(table: &dyn Table, values: &StringProperties) -> Result<usize> {
    let entities = table.query_entities().await?;
    let count = entities.len();
    for entity in entities {
        merge_properties(table, &entity.partition_key, &entity.row_key, values).await?;
    }
    Ok(count)
}

/// 이미 해당 속성을 가진 엔티티만 값 갱신
pub async fn update_existing_property(
    table: &dyn Table,
    values: &StringProperties,
) -> Result<usize> {
    let entities = table.query_entities().await?;
    let mut updated = 0;
    for entity in entities {
        let present: StringProperties = values
            .iter()
            .filter(|(name, _)| entity.has_property(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if present.is_empty() {
            continue;
        }
        merge_properties(table, &entity.partition_key, &entity.row_key, &present).await?;
        updated += 1;
    }
    Ok(updated)
}

/// 테이블 생성 (멱등)
pub async fn create_table(cache: &TableCache, name: &str) -> Result<CreateOutcome> {
    let table = cache.lookup(name).await?;
    if table.create_if_not_exists().await? {
        tracing::info!(table = name, "table created");
        Ok(CreateOutcome::Created)
    } else {
        Ok(CreateOutcome::AlreadyExists)
    }
}

/// 테이블 삭제
///
/// 결과와 관계없이 캐시 엔트리는 항상 제거됩니다.
pub async fn delete_table(cache: &TableCache, name: &str) -> Result<()> {
    let result = match cache.lookup(name).await {
        Ok(table) => table.delete_table().await,
        Err(e) => Err(e),
    };
    cache.delete_entry(name).await;
    if result.is_ok() {
        tracing::info!(table = name, "table deleted");
    }
    result
}

/// 속성 값의 문자열 형태 (없으면 빈 문자열)
pub(crate) fn property_text(entity: &Entity, name: &str) -> String {
    entity
        .property(name)
        .map(TypedValue::to_string)
        .unwrap_or_default()
}
