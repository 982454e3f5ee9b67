//! 프로세스 내 테이블 스토어
//!
//! 테이블마다 (partition, row) 키로 정렬된 맵을 둡니다.
//! 엔티티 단위 변경만 원자적이며, 여러 엔티티에 걸친 트랜잭션은 없습니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::{Error, Result};

use super::{
    AccessRange, SharedAccessGrant, SharedAccessPolicy, SharedKeySigner, Table, TableClient,
    TableHandle,
};

type Rows = BTreeMap<(String, String), Entity>;
type Tables = RwLock<HashMap<String, Rows>>;

/// 메모리 스토어
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Tables>,
    signer: SharedKeySigner,
}

impl MemoryStore {
    pub fn new(signer: SharedKeySigner) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            signer,
        }
    }
}

#[async_trait]
impl TableClient for MemoryStore {
    async fn open_table(&self, name: &str) -> Result<TableHandle> {
        Ok(Arc::new(MemoryTable {
            name: name.to_string(),
            tables: Arc::clone(&self.tables),
            signer: self.signer.clone(),
        }))
    }
}

struct MemoryTable {
    name: String,
    tables: Arc<Tables>,
    signer: SharedKeySigner,
}

impl MemoryTable {
    fn not_found(&self) -> Error {
        Error::TableNotFound {
            table: self.name.clone(),
        }
    }
}

#[async_trait]
impl Table for MemoryTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self) -> Result<bool> {
        Ok(read_tables(&self.tables)?.contains_key(&self.name))
    }

    async fn create_if_not_exists(&self) -> Result<bool> {
        let mut tables = write_tables(&self.tables)?;
        if tables.contains_key(&self.name) {
            return Ok(false);
        }
        tables.insert(self.name.clone(), Rows::new());
        Ok(true)
    }

    async fn delete_table(&self) -> Result<()> {
        write_tables(&self.tables)?
            .remove(&self.name)
            .map(|_| ())
            .ok_or_else(|| self.not_found())
    }

    async fn query_entities(&self) -> Result<Vec<Entity>> {
        let tables = read_tables(&self.tables)?;
        let rows = tables.get(&self.name).ok_or_else(|| self.not_found())?;
        Ok(rows.values().cloned().collect())
    }

    async fn retrieve_entity(&self, partition: &str, row: &str) -> Result<Option<Entity>> {
        let tables = read_tables(&self.tables)?;
        let rows = tables.get(&self.name).ok_or_else(|| self.not_found())?;
        Ok(rows.get(&(partition.to_string(), row.to_string())).cloned())
    }

    async fn insert_or_merge_entity(&self, entity: Entity) -> Result<()> {
        let mut tables = write_tables(&self.tables)?;
        let rows = tables.get_mut(&self.name).ok_or_else(|| self.not_found())?;
        let key = (entity.partition_key.clone(), entity.row_key.clone());
        match rows.get_mut(&key) {
            Some(existing) => existing.properties.extend(entity.properties),
            None => {
                rows.insert(key, entity);
            }
        }
        Ok(())
    }

    async fn delete_entity(&self, partition: &str, row: &str) -> Result<()> {
        let mut tables = write_tables(&self.tables)?;
        let rows = tables.get_mut(&self.name).ok_or_else(|| self.not_found())?;
        rows.remove(&(partition.to_string(), row.to_string()))
            .map(|_| ())
            .ok_or_else(|| Error::EntityNotFound {
                partition: partition.to_string(),
                row: row.to_string(),
            })
    }

    fn shared_access_signature(
        &self,
        policy: &SharedAccessPolicy,
        range: &AccessRange,
    ) -> Result<String> {
        self.signer.sign(&self.name, policy, range)
    }

    fn verify_shared_access(&self, token: &str) -> Result<SharedAccessGrant> {
        let grant = self.signer.verify(token)?;
        if grant.table != self.name {
            return Err(Error::InvalidToken {
                reason: format!("token issued for table '{}'", grant.table),
            });
        }
        Ok(grant)
    }
}

fn read_tables(tables: &Tables) -> Result<RwLockReadGuard<'_, HashMap<String, Rows>>> {
    tables
        .read()
        .map_err(|_| Error::store("memory store lock poisoned"))
}

fn write_tables(tables: &Tables) -> Result<RwLockWriteGuard<'_, HashMap<String, Rows>>> {
    tables
        .write()
        .map_err(|_| Error::store("memory store lock poisoned"))
}
