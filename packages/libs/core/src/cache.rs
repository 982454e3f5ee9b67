//! 테이블 핸들 캐시
//!
//! 이름별로 연 테이블 핸들을 보관합니다. 두 티어가 같은 캐시를 공유합니다.
//!
//! - 첫 참조 시 생성, 이후에는 캐시된 핸들 반환
//! - 같은 이름에 대한 open 호출은 동시 요청이 있어도 최대 한 번
//! - 한 테이블의 open이 느려도 다른 이름의 조회는 기다리지 않음
//! - 크기 제한/TTL 없음. 명시적 테이블 삭제만 엔트리를 제거

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::error::Result;
use crate::store::{TableClient, TableHandle};

type Slot = Arc<OnceCell<TableHandle>>;

/// 테이블 핸들 캐시
pub struct TableCache {
    client: Arc<dyn TableClient>,
    tables: Mutex<HashMap<String, Slot>>,
}

impl TableCache {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self {
            client,
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// 핸들 조회 (없으면 열어서 캐시)
    ///
    /// 맵 잠금은 슬롯을 꺼내는 동안만 잡고, open은 이름별 슬롯 안에서 기다립니다.
    /// open이 실패하면 에러를 그대로 반환하고 아무것도 캐시하지 않습니다.
    pub async fn lookup(&self, name: &str) -> Result<TableHandle> {
        let slot = {
            let mut tables = self.tables.lock().await;
            Arc::clone(tables.entry(name.to_string()).or_default())
        };

        let opened = slot
            .get_or_try_init(|| async {
                tracing::debug!(table = name, "opening table handle");
                self.client.open_table(name).await
            })
            .await;

        match opened {
            Ok(table) => Ok(Arc::clone(table)),
            Err(e) => {
                self.discard_empty_slot(name, &slot).await;
                Err(e)
            }
        }
    }

    /// 캐시 엔트리 제거 (테이블 삭제 후 호출)
    pub async fn delete_entry(&self, name: &str) {
        if self.tables.lock().await.remove(name).is_some() {
            tracing::debug!(table = name, "dropped cached table handle");
        }
    }

    /// 실패한 open이 남긴 빈 슬롯 정리 (그사이 교체된 슬롯은 건드리지 않음)
    async fn discard_empty_slot(&self, name: &str, slot: &Slot) {
        let mut tables = self.tables.lock().await;
        let stale = tables
            .get(name)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            tables.remove(name);
        }
    }

    #[cfg(test)]
    pub(crate) async fn contains(&self, name: &str) -> bool {
        self.tables
            .lock()
            .await
            .get(name)
            .is_some_and(|slot| slot.initialized())
    }
}
