//! 접근 토큰 발급 및 확인
//!
//! 토큰은 항상 엔티티 하나(partition + row)에만 유효하며 24시간 뒤 만료됩니다.
//! 권한은 읽기 또는 읽기+갱신 두 가지뿐입니다.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::store::{AccessRange, SharedAccessPermissions, SharedAccessPolicy, Table};

/// 토큰 유효 기간 (시간)
pub const TOKEN_TTL_HOURS: i64 = 24;

/// 토큰 권한 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// 읽기 전용
    Read,

    /// 읽기 + 갱신
    ReadUpdate,
}

impl AccessLevel {
    /// 스토어 권한 마스크
    pub fn permissions(self) -> SharedAccessPermissions {
        match self {
            AccessLevel::Read => SharedAccessPermissions::READ,
            AccessLevel::ReadUpdate => {
                SharedAccessPermissions::READ | SharedAccessPermissions::UPDATE
            }
        }
    }
}

/// 토큰이 유효한 범위
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScope {
    pub table: String,
    pub partition: String,
    pub row: String,
}

/// 발급된 접근 토큰
///
/// 어디에도 저장되지 않는 값입니다.
#[derive(Debug, Clone)]
pub struct CapabilityToken {
    pub scope: TokenScope,
    pub permissions: SharedAccessPermissions,
    pub expires_at: DateTime<Utc>,
    pub signature: String,
}

/// 단일 엔티티 토큰 발급
pub fn issue(
    table: &dyn Table,
    partition: &str,
    row: &str,
    level: AccessLevel,
) -> Result<CapabilityToken> {
    let policy = SharedAccessPolicy {
        expiry: Utc::now() + Duration::hours(TOKEN_TTL_HOURS),
        permissions: level.permissions(),
    };
    let range = AccessRange::single(partition, row);

    let signature = table
        .shared_access_signature(&policy, &range)
        .map_err(|e| match e {
            Error::Signing { .. } => e,
            other => Error::Signing {
                message: other.to_string(),
            },
        })?;

    tracing::debug!(
        table = table.name(),
        partition,
        row,
        permissions = %policy.permissions,
        expires_at = %policy.expiry,
        "issued capability token"
    );

    Ok(CapabilityToken {
        scope: TokenScope {
            table: table.name().to_string(),
            partition: partition.to_string(),
            row: row.to_string(),
        },
        permissions: policy.permissions,
        expires_at: policy.expiry,
        signature,
    })
}

/// 토큰으로 (partition, row)에 대한 권한 확인
pub fn authorize(
    table: &dyn Table,
    token: &str,
    partition: &str,
    row: &str,
    required: SharedAccessPermissions,
) -> Result<()> {
    let grant = table.verify_shared_access(token)?;

    if !grant.allows(partition, row, required) {
        return Err(Error::AccessDenied {
            reason: format!(
                "token grants '{}' on {}/{}, not '{}' on {}/{}",
                grant.permissions,
                grant.range.start_partition,
                grant.range.start_row,
                required,
                partition,
                row
            ),
        });
    }
    Ok(())
}
