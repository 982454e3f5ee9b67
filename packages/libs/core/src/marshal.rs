//! 속성 마샬링
//!
//! 스토어의 타입 속성 ↔ JSON 변환입니다.
//!
//! - 응답 방향: 타입 태그를 보고 JSON 숫자/불리언/문자열로 변환
//! - 요청 방향: 모든 JSON 값을 문자열로 강제 변환 (쓰기 시 타입 정보는 복원하지 않음)
//!
//! 64비트 정수는 JSON 숫자로 그대로 나갑니다. IEEE double로 숫자를 읽는
//! 클라이언트는 2^53을 넘는 값에서 정밀도를 잃습니다 (알려진 제약).

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::entity::{Entity, Properties, TypedValue};

/// 응답 JSON의 파티션 키 필드 이름
pub const PARTITION_FIELD: &str = "Partition";

/// 응답 JSON의 행 키 필드 이름
pub const ROW_FIELD: &str = "Row";

/// 요청 본문에서 추출한 문자열 맵
pub type StringProperties = BTreeMap<String, String>;

/// 타입 값 하나를 JSON으로 변환
pub fn value_to_json(value: &TypedValue) -> Value {
    match value {
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Int32(v) => Value::Number((*v).into()),
        TypedValue::Int64(v) => Value::Number((*v).into()),
        TypedValue::Double(v) => Number::from_f64(*v)
            .map(Value::Number)
            // NaN/Infinity는 JSON 숫자가 될 수 없음
            .unwrap_or_else(|| Value::String(value.to_string())),
        TypedValue::Bool(v) => Value::Bool(*v),
        TypedValue::DateTime(_) | TypedValue::Other(_) => Value::String(value.to_string()),
    }
}

/// 속성 맵을 (이름, JSON 값) 목록으로 변환
pub fn to_response(properties: &Properties) -> Vec<(String, Value)> {
    properties
        .iter()
        .map(|(name, value)| (name.clone(), value_to_json(value)))
        .collect()
}

/// 속성만 담은 JSON 객체
pub fn properties_to_json(properties: &Properties) -> Value {
    Value::Object(to_response(properties).into_iter().collect())
}

/// 키를 앞에 둔 엔티티 JSON 객체 (`Partition`, `Row`, 속성...)
pub fn entity_to_json(entity: &Entity) -> Value {
    let mut obj = Map::new();
    obj.insert(
        PARTITION_FIELD.to_string(),
        Value::String(entity.partition_key.clone()),
    );
    obj.insert(ROW_FIELD.to_string(), Value::String(entity.row_key.clone()));
    for (name, value) in to_response(&entity.properties) {
        obj.insert(name, value);
    }
    Value::Object(obj)
}

/// 엔티티 목록 JSON 배열
pub fn entities_to_json(entities: &[Entity]) -> Value {
    Value::Array(entities.iter().map(entity_to_json).collect())
}

/// 요청 본문 JSON → 문자열 맵
///
/// 문자열은 그대로, 그 외 값은 직렬화된 JSON 텍스트로 강제 변환합니다.
/// 객체가 아니면 빈 맵을 반환합니다.
pub fn from_request_body(body: &Value) -> StringProperties {
    let Value::Object(map) = body else {
        return StringProperties::new();
    };

    map.iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), text)
        })
        .collect()
}

/// 문자열 맵 → String 태그 속성
pub fn to_string_properties(values: &StringProperties) -> Properties {
    values
        .iter()
        .map(|(name, value)| (name.clone(), TypedValue::String(value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_to_response_preserves_types() {
        let entity = Entity::new("P", "R")
            .with_property("Name", "bob")
            .with_property("Count", TypedValue::Int32(3))
            .with_property("Big", TypedValue::Int64(1 << 40))
            .with_property("Ratio", TypedValue::Double(0.25))
            .with_property("Active", TypedValue::Bool(false))
            .with_property(
                "Born",
                TypedValue::DateTime(Utc.with_ymd_and_hms(2000, 1, 2, 3, 4, 5).unwrap()),
            )
            .with_property("Id", TypedValue::Other("c9a6".into()));

        let json = properties_to_json(&entity.properties);
        assert_eq!(
            json,
            json!({
                "Active": false,
                "Big": 1099511627776i64,
                "Born": "2000-01-02T03:04:05Z",
                "Count": 3,
                "Id": "c9a6",
                "Name": "bob",
                "Ratio": 0.25
            })
        );
    }

    #[test]
    fn test_non_finite_double_falls_back_to_string() {
        assert_eq!(value_to_json(&TypedValue::Double(f64::NAN)), json!("NaN"));
    }

    #[test]
    fn test_entity_json_keys_come_first() {
        let entity = Entity::new("P1", "R1").with_property("A", "x");
        let json = entity_to_json(&entity);

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Partition", "Row", "A"]);
    }

    #[test]
    fn test_from_request_body_coerces_to_strings() {
        let body = json!({
            "s": "text",
            "n": 42,
            "f": 1.5,
            "b": true,
            "z": null,
            "o": {"k": [1, 2]}
        });

        let values = from_request_body(&body);
        assert_eq!(values["s"], "text");
        assert_eq!(values["n"], "42");
        assert_eq!(values["f"], "1.5");
        assert_eq!(values["b"], "true");
        assert_eq!(values["z"], "null");
        assert_eq!(values["o"], r#"{"k":[1,2]}"#);
    }

    #[test]
    fn test_from_request_body_non_object() {
        assert!(from_request_body(&json!([1, 2, 3])).is_empty());
        assert!(from_request_body(&json!("x")).is_empty());
    }
}
