//! 초기 데이터 (YAML)
//!
//! 시작 시 테이블을 만들고 엔티티를 채웁니다.
//!
//! ```yaml
//! tables:
//!   AuthTable:
//!     - partition: Userid
//!       row: alice
//!       properties:
//!         Password: pw1
//!         DataPartition: P1
//!         DataRow: R1
//!   DataTable:
//!     - partition: P1
//!       row: R1
//!       properties:
//!         Visits: 3
//!         Joined: { type: datetime, value: "2016-03-01T00:00:00Z" }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::cache::TableCache;
use crate::entity::{Entity, TypedValue};
use crate::error::{Error, Result};

/// 시드 파일 루트
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<SeedEntity>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntity {
    pub partition: String,
    pub row: String,
    #[serde(default)]
    pub properties: BTreeMap<String, SeedValue>,
}

/// 속성 값: YAML 스칼라 그대로 또는 타입 명시
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Typed {
        #[serde(rename = "type")]
        type_name: String,
        value: serde_yaml::Value,
    },
}

impl SeedValue {
    /// 스토어 타입 값으로 변환
    pub fn to_typed(&self) -> Result<TypedValue> {
        Ok(match self {
            SeedValue::Bool(v) => TypedValue::Bool(*v),
            SeedValue::Integer(v) => match i32::try_from(*v) {
                Ok(small) => TypedValue::Int32(small),
                Err(_) => TypedValue::Int64(*v),
            },
            SeedValue::Double(v) => TypedValue::Double(*v),
            SeedValue::String(v) => TypedValue::String(v.clone()),
            SeedValue::Typed { type_name, value } => typed_value(type_name, value)?,
        })
    }
}

fn typed_value(type_name: &str, value: &serde_yaml::Value) -> Result<TypedValue> {
    let invalid = || Error::BadRequest {
        message: format!("invalid seed value for type '{}': {:?}", type_name, value),
    };

    match type_name {
        "string" => Ok(TypedValue::String(scalar_text(value).ok_or_else(invalid)?)),
        "int32" => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(TypedValue::Int32)
            .ok_or_else(invalid),
        "int64" => value.as_i64().map(TypedValue::Int64).ok_or_else(invalid),
        "double" => value.as_f64().map(TypedValue::Double).ok_or_else(invalid),
        "bool" => value.as_bool().map(TypedValue::Bool).ok_or_else(invalid),
        "datetime" => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| TypedValue::DateTime(dt.with_timezone(&Utc)))
            .ok_or_else(invalid),
        _ => Ok(TypedValue::Other(scalar_text(value).ok_or_else(invalid)?)),
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl SeedData {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// 테이블 생성 후 엔티티 병합. 적재한 엔티티 수 반환
    pub async fn apply(&self, cache: &TableCache) -> Result<usize> {
        let mut loaded = 0;
        for (name, entities) in &self.tables {
            let table = cache.lookup(name).await?;
            table.create_if_not_exists().await?;

            for seed in entities {
                let mut entity = Entity::new(&seed.partition, &seed.row);
                for (prop, value) in &seed.properties {
                    entity.properties.insert(prop.clone(), value.to_typed()?);
                }
                table.insert_or_merge_entity(entity).await?;
                loaded += 1;
            }
            tracing::info!(table = %name, entities = entities.len(), "seeded table");
        }
        Ok(loaded)
    }
}
