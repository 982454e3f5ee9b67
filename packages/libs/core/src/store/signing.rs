//! 공유 접근 서명
//!
//! 테이블 범위 토큰을 PASETO v4.local로 발급/검증합니다.
//! 같은 입력이라도 nonce와 `jti`가 매번 달라서 토큰 문자열은 항상 다릅니다.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::RngCore;
use rusty_paseto::prelude::*;
use serde_json::Value;

use crate::error::{Error, Result};

use super::{AccessRange, SharedAccessGrant, SharedAccessPermissions, SharedAccessPolicy};

const CLAIM_TABLE: &str = "tn";
const CLAIM_START_PARTITION: &str = "spk";
const CLAIM_START_ROW: &str = "srk";
const CLAIM_END_PARTITION: &str = "epk";
const CLAIM_END_ROW: &str = "erk";
const CLAIM_PERMISSIONS: &str = "sp";
const CLAIM_EXPIRATION: &str = "exp";

/// 대칭 키 서명기
#[derive(Clone)]
pub struct SharedKeySigner {
    key: [u8; 32],
}

impl std::fmt::Debug for SharedKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeySigner").finish_non_exhaustive()
    }
}

impl SharedKeySigner {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// 프로세스 수명 동안만 유효한 랜덤 키
    pub fn random() -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self { key }
    }

    /// 키 문자열 파싱 (hex 64자, base64url, base64, 32바이트 원문)
    pub fn from_key_material(raw: &str) -> Option<Self> {
        parse_key_material(raw).map(Self::new)
    }

    fn symmetric_key(&self) -> PasetoSymmetricKey<V4, Local> {
        PasetoSymmetricKey::<V4, Local>::from(Key::from(self.key))
    }

    /// 토큰 발급
    pub fn sign(
        &self,
        table: &str,
        policy: &SharedAccessPolicy,
        range: &AccessRange,
    ) -> Result<String> {
        let key = self.symmetric_key();
        let token_id = ulid::Ulid::new().to_string();
        let permissions = policy.permissions.to_string();

        let expiration =
            ExpirationClaim::try_from(policy.expiry.to_rfc3339_opts(SecondsFormat::Secs, true))
                .map_err(signing_error)?;
        let table_claim = CustomClaim::try_from((CLAIM_TABLE, table)).map_err(signing_error)?;
        let start_partition =
            CustomClaim::try_from((CLAIM_START_PARTITION, range.start_partition.as_str()))
                .map_err(signing_error)?;
        let start_row = CustomClaim::try_from((CLAIM_START_ROW, range.start_row.as_str()))
            .map_err(signing_error)?;
        let end_partition =
            CustomClaim::try_from((CLAIM_END_PARTITION, range.end_partition.as_str()))
                .map_err(signing_error)?;
        let end_row = CustomClaim::try_from((CLAIM_END_ROW, range.end_row.as_str()))
            .map_err(signing_error)?;
        let permission_claim = CustomClaim::try_from((CLAIM_PERMISSIONS, permissions.as_str()))
            .map_err(signing_error)?;

        let token = PasetoBuilder::<V4, Local>::default()
            .set_claim(expiration)
            .set_claim(TokenIdentifierClaim::from(token_id.as_str()))
            .set_claim(table_claim)
            .set_claim(start_partition)
            .set_claim(start_row)
            .set_claim(end_partition)
            .set_claim(end_row)
            .set_claim(permission_claim)
            .build(&key)
            .map_err(signing_error);
        token
    }

    /// 토큰 검증 및 권한 추출
    ///
    /// 만료(`exp`)는 PASETO 파서가 검사합니다.
    pub fn verify(&self, token: &str) -> Result<SharedAccessGrant> {
        let key = self.symmetric_key();
        let claims = PasetoParser::<V4, Local>::default()
            .parse(token.trim(), &key)
            .map_err(|e| Error::InvalidToken {
                reason: e.to_string(),
            })?;

        let permissions = SharedAccessPermissions::parse(claim_str(&claims, CLAIM_PERMISSIONS)?)
            .ok_or_else(|| Error::InvalidToken {
                reason: "unknown permission letters".to_string(),
            })?;

        let expiry = DateTime::parse_from_rfc3339(claim_str(&claims, CLAIM_EXPIRATION)?)
            .map_err(|e| Error::InvalidToken {
                reason: format!("invalid expiration: {}", e),
            })?
            .with_timezone(&Utc);

        Ok(SharedAccessGrant {
            table: claim_str(&claims, CLAIM_TABLE)?.to_string(),
            range: AccessRange {
                start_partition: claim_str(&claims, CLAIM_START_PARTITION)?.to_string(),
                start_row: claim_str(&claims, CLAIM_START_ROW)?.to_string(),
                end_partition: claim_str(&claims, CLAIM_END_PARTITION)?.to_string(),
                end_row: claim_str(&claims, CLAIM_END_ROW)?.to_string(),
            },
            permissions,
            expiry,
        })
    }
}

fn signing_error(e: impl std::fmt::Display) -> Error {
    Error::Signing {
        message: e.to_string(),
    }
}

fn claim_str<'a>(claims: &'a Value, name: &str) -> Result<&'a str> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidToken {
            reason: format!("missing claim: {}", name),
        })
}

fn parse_key_material(raw: &str) -> Option<[u8; 32]> {
    let trimmed = raw.trim();

    let decoded = if trimmed.len() == 64 {
        decode_hex(trimmed)
    } else {
        [general_purpose::URL_SAFE_NO_PAD, general_purpose::STANDARD]
            .iter()
            .find_map(|engine| engine.decode(trimmed).ok().filter(|b| b.len() == 32))
    };

    // 디코딩이 안 되면 원문 32바이트를 그대로 키로 사용
    decoded
        .as_deref()
        .unwrap_or(trimmed.as_bytes())
        .try_into()
        .ok()
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    input
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}
