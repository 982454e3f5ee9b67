//! 엔티티와 타입 보존 속성 값
//!
//! 백엔드 스토어가 부여한 타입 태그(EDM 타입)를 그대로 유지합니다.
//! 명시적으로 덮어쓰기 전까지 값의 태그는 바뀌지 않습니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// 속성 맵 (이름 → 타입 값)
///
/// 응답 순서를 결정적으로 만들기 위해 이름순으로 정렬됩니다.
pub type Properties = BTreeMap<String, TypedValue>;

/// 타입이 부여된 속성 값
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    /// 그 외 EDM 타입 (Guid, Binary 등) - 문자열 형태만 보존
    Other(String),
}

impl fmt::Display for TypedValue {
    /// 스토어의 정규 문자열 형태
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) | TypedValue::Other(s) => f.write_str(s),
            TypedValue::Int32(v) => write!(f, "{}", v),
            TypedValue::Int64(v) => write!(f, "{}", v),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Bool(v) => write!(f, "{}", v),
            TypedValue::DateTime(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

/// 엔티티 (파티션 키 + 행 키 + 속성)
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub partition_key: String,
    pub row_key: String,
    pub properties: Properties,
}

impl Entity {
    /// 속성 없는 엔티티 생성
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            properties: Properties::new(),
        }
    }

    /// 속성 추가 (빌더)
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// 속성 조회
    pub fn property(&self, name: &str) -> Option<&TypedValue> {
        self.properties.get(name)
    }

    /// 속성 이름 보유 여부
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}
