//! 게이트웨이 앱 상태

use std::sync::Arc;

use anyhow::Context;
use tg_core::seed::SeedData;
use tg_core::store::{MemoryStore, SharedKeySigner, TableClient};
use tg_core::TableCache;

use crate::config::Config;

/// 앱 상태
///
/// 두 티어의 모든 핸들러가 공유합니다. 테이블 핸들 캐시는 전역 대신 여기서 주입됩니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 테이블 핸들 캐시
    pub tables: TableCache,
}

impl AppState {
    /// 메모리 스토어로 새 상태 생성
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let signer = match &config.signing_key {
            Some(raw) => SharedKeySigner::from_key_material(raw)
                .context("TG_SIGNING_KEY must decode to 32 bytes")?,
            None => {
                tracing::warn!("TG_SIGNING_KEY not set; tokens are valid only for this process");
                SharedKeySigner::random()
            }
        };

        let state = Self::with_client(config.clone(), Arc::new(MemoryStore::new(signer)));

        if let Some(path) = &config.seed_file {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read seed file {}", path.display()))?;
            let loaded = SeedData::from_yaml(&raw)?.apply(&state.tables).await?;
            tracing::info!("Loaded {} seed entities from {}", loaded, path.display());
        }

        Ok(state)
    }

    /// 임의의 테이블 클라이언트로 상태 생성
    pub fn with_client(config: Config, client: Arc<dyn TableClient>) -> Self {
        Self {
            config,
            tables: TableCache::new(client),
        }
    }
}
