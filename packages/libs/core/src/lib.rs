//! tg-core: 테이블 게이트웨이 핵심 라이브러리
//!
//! 엔티티 티어와 인증 티어가 공유하는 타입과 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `store`: 백엔드 키-값 스토어 트레이트, 메모리 구현, 공유 접근 서명
//! - `cache`: 테이블 핸들 캐시
//! - `entity`: 엔티티와 타입 보존 속성 값
//! - `marshal`: 속성 ↔ JSON 변환
//! - `query`: 엔티티 조회/필터/변경
//! - `auth`: 자격 증명 검증 및 접근 토큰 발급
//! - `seed`: YAML 초기 데이터
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod cache;
pub mod entity;
pub mod error;
pub mod marshal;
pub mod query;
pub mod seed;
pub mod store;

pub use cache::TableCache;
pub use entity::{Entity, Properties, TypedValue};
pub use error::{Error, Result};
