//! 백엔드 스토어 추상화
//!
//! 파티션 키-값 스토어를 `TableClient`/`Table` 트레이트로 감쌉니다.
//! 게이트웨이는 이 트레이트만 알고, 실제 엔진은 주입됩니다.
//!
//! # 모듈 구조
//!
//! - `memory`: 프로세스 내 스토어 구현
//! - `signing`: 범위 제한 공유 접근 서명 (PASETO v4.local)

mod memory;
mod signing;

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::Entity;
use crate::error::Result;

pub use memory::MemoryStore;
pub use signing::SharedKeySigner;

/// 캐시되는 테이블 핸들
pub type TableHandle = Arc<dyn Table>;

/// 테이블 클라이언트
///
/// 이름으로 테이블 핸들을 엽니다. 핸들을 여는 것은 테이블 존재를 보장하지 않습니다.
#[async_trait]
pub trait TableClient: Send + Sync {
    async fn open_table(&self, name: &str) -> Result<TableHandle>;
}

/// 테이블 핸들
#[async_trait]
pub trait Table: Send + Sync {
    /// 테이블 이름
    fn name(&self) -> &str;

    async fn exists(&self) -> Result<bool>;

    /// 새로 만들었으면 `true`, 이미 있었으면 `false`
    async fn create_if_not_exists(&self) -> Result<bool>;

    /// 테이블이 없으면 `Error::TableNotFound`
    async fn delete_table(&self) -> Result<()>;

    /// 전체 스캔. 호출할 때마다 처음부터 다시 실행됩니다.
    async fn query_entities(&self) -> Result<Vec<Entity>>;

    async fn retrieve_entity(&self, partition: &str, row: &str) -> Result<Option<Entity>>;

    /// 없으면 삽입, 있으면 속성 단위 병합
    async fn insert_or_merge_entity(&self, entity: Entity) -> Result<()>;

    /// 엔티티가 없으면 `Error::EntityNotFound`
    async fn delete_entity(&self, partition: &str, row: &str) -> Result<()>;

    /// 스토어 고유의 서명 프리미티브로 범위 제한 토큰 발급
    fn shared_access_signature(
        &self,
        policy: &SharedAccessPolicy,
        range: &AccessRange,
    ) -> Result<String>;

    /// 이 테이블에 대해 발급된 토큰 검증
    fn verify_shared_access(&self, token: &str) -> Result<SharedAccessGrant>;
}

/// 공유 접근 권한 마스크
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SharedAccessPermissions(u8);

impl SharedAccessPermissions {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(1);
    pub const ADD: Self = Self(1 << 1);
    pub const UPDATE: Self = Self(1 << 2);
    pub const DELETE: Self = Self(1 << 3);

    const LETTERS: [(char, Self); 4] = [
        ('r', Self::READ),
        ('a', Self::ADD),
        ('u', Self::UPDATE),
        ('d', Self::DELETE),
    ];

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `"ru"` 같은 권한 문자열 파싱
    pub fn parse(letters: &str) -> Option<Self> {
        letters.chars().try_fold(Self::NONE, |acc, ch| {
            Self::LETTERS
                .iter()
                .find(|(letter, _)| *letter == ch)
                .map(|(_, flag)| acc | *flag)
        })
    }
}

impl BitOr for SharedAccessPermissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for SharedAccessPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, flag) in Self::LETTERS {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// 이름 없는 공유 접근 정책
#[derive(Debug, Clone, PartialEq)]
pub struct SharedAccessPolicy {
    pub expiry: DateTime<Utc>,
    pub permissions: SharedAccessPermissions,
}

/// 접근 가능한 키 범위 (시작/끝 모두 포함)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRange {
    pub start_partition: String,
    pub start_row: String,
    pub end_partition: String,
    pub end_row: String,
}

impl AccessRange {
    /// 단일 엔티티 범위
    pub fn single(partition: impl Into<String>, row: impl Into<String>) -> Self {
        let partition = partition.into();
        let row = row.into();
        Self {
            start_partition: partition.clone(),
            start_row: row.clone(),
            end_partition: partition,
            end_row: row,
        }
    }

    /// (partition, row)가 범위 안에 있는지 (사전순 비교)
    pub fn covers(&self, partition: &str, row: &str) -> bool {
        let key = (partition, row);
        let start = (self.start_partition.as_str(), self.start_row.as_str());
        let end = (self.end_partition.as_str(), self.end_row.as_str());
        start <= key && key <= end
    }
}

/// 검증된 토큰이 허용하는 내용
#[derive(Debug, Clone, PartialEq)]
pub struct SharedAccessGrant {
    pub table: String,
    pub range: AccessRange,
    pub permissions: SharedAccessPermissions,
    pub expiry: DateTime<Utc>,
}

impl SharedAccessGrant {
    pub fn allows(&self, partition: &str, row: &str, required: SharedAccessPermissions) -> bool {
        self.permissions.contains(required) && self.range.covers(partition, row)
    }
}
