//! 자격 증명 검증
//!
//! 자격 증명 테이블은 `Userid` 파티션 하나만 가지며 행 키가 사용자 ID입니다.
//! 보조 인덱스 없이 매 요청마다 전체를 스캔합니다 (규모 한계는 O(n)).

use crate::entity::Entity;
use crate::error::Result;
use crate::query::property_text;
use crate::store::Table;

/// 자격 증명 행이 저장되는 파티션
pub const USERID_PARTITION: &str = "Userid";

/// 비밀번호 속성
pub const PASSWORD_PROPERTY: &str = "Password";

/// 접근 가능한 데이터 엔티티의 파티션 키 속성
pub const DATA_PARTITION_PROPERTY: &str = "DataPartition";

/// 접근 가능한 데이터 엔티티의 행 키 속성
pub const DATA_ROW_PROPERTY: &str = "DataRow";

/// 사용자가 접근할 수 있는 데이터 엔티티 좌표
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLocation {
    pub partition: String,
    pub row: String,
}

impl DataLocation {
    fn from_credential(entity: &Entity) -> Self {
        Self {
            partition: property_text(entity, DATA_PARTITION_PROPERTY),
            row: property_text(entity, DATA_ROW_PROPERTY),
        }
    }
}

/// 사용자 ID와 비밀번호 확인
///
/// 비밀번호가 아예 주어지지 않으면 항상 실패합니다.
/// 사용자가 없을 때와 비밀번호가 틀릴 때 모두 `None`입니다.
pub async fn verify(
    credentials: &dyn Table,
    user_id: &str,
    supplied_password: Option<&str>,
) -> Result<Option<DataLocation>> {
    let Some(supplied) = supplied_password else {
        return Ok(None);
    };

    let entities = credentials.query_entities().await?;
    let found = entities.iter().find(|entity| {
        entity.row_key == user_id
            && entity
                .property(PASSWORD_PROPERTY)
                .is_some_and(|stored| stored.to_string() == supplied)
    });

    Ok(found.map(DataLocation::from_credential))
}
