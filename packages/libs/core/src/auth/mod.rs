//! 자격 증명 검증과 접근 토큰 발급
//!
//! # 개요
//!
//! 인증 티어는 사용자 ID + 비밀번호를 확인한 뒤, 그 사용자에게 배정된
//! 데이터 엔티티 하나에만 유효한 토큰을 발급합니다.
//!
//! ```text
//! Start → CredentialLookup ─┬─ Verified → TokenIssued → 200
//!                           ├─ Unverified → 404
//!                           └─ SigningFailed → 500
//! ```
//!
//! 재시도나 중간 상태 저장은 없습니다.

mod credential;
mod token;

pub use credential::{
    verify, DataLocation, DATA_PARTITION_PROPERTY, DATA_ROW_PROPERTY, PASSWORD_PROPERTY,
    USERID_PARTITION,
};
pub use token::{authorize, issue, AccessLevel, CapabilityToken, TokenScope, TOKEN_TTL_HOURS};

use crate::cache::TableCache;
use crate::error::{Error, Result};

/// 토큰 + 데이터 엔티티 좌표
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: CapabilityToken,
    pub location: DataLocation,
}

/// 토큰 발급 서비스
///
/// 자격 증명 테이블과 데이터 테이블 이름을 묶어 둡니다.
pub struct TokenService<'a> {
    cache: &'a TableCache,
    credential_table: &'a str,
    data_table: &'a str,
}

impl<'a> TokenService<'a> {
    pub fn new(cache: &'a TableCache, credential_table: &'a str, data_table: &'a str) -> Self {
        Self {
            cache,
            credential_table,
            data_table,
        }
    }

    /// 읽기 전용 토큰
    pub async fn get_read_token(
        &self,
        user_id: &str,
        password: Option<&str>,
    ) -> Result<CapabilityToken> {
        self.grant(user_id, password, AccessLevel::Read)
            .await
            .map(|grant| grant.token)
    }

    /// 읽기 + 갱신 토큰
    pub async fn get_update_token(
        &self,
        user_id: &str,
        password: Option<&str>,
    ) -> Result<CapabilityToken> {
        self.grant(user_id, password, AccessLevel::ReadUpdate)
            .await
            .map(|grant| grant.token)
    }

    /// 읽기 + 갱신 토큰과 데이터 엔티티 좌표
    pub async fn get_update_data(
        &self,
        user_id: &str,
        password: Option<&str>,
    ) -> Result<TokenGrant> {
        self.grant(user_id, password, AccessLevel::ReadUpdate).await
    }

    async fn grant(
        &self,
        user_id: &str,
        password: Option<&str>,
        level: AccessLevel,
    ) -> Result<TokenGrant> {
        let credentials = self.cache.lookup(self.credential_table).await?;
        let location = verify(credentials.as_ref(), user_id, password)
            .await?
            .ok_or(Error::CredentialNotFound)?;

        let data = self.cache.lookup(self.data_table).await?;
        let token = issue(data.as_ref(), &location.partition, &location.row, level)?;

        Ok(TokenGrant { token, location })
    }
}
