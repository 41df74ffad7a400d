use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{
    fillable_attributes, render_value, Record, Repository, RepositoryError, RepositoryResult,
    PRIMARY_KEY,
};

/// In-memory repository keyed by an auto-incremented `u64` id.
///
/// Records are materialized through serde: on create the filtered data plus
/// `"id": <next id>` is deserialized into `T`, so `T` needs a numeric `id`
/// field.
pub struct MemoryRepository<T: Record> {
    records: RwLock<BTreeMap<u64, T>>,
    next_id: RwLock<u64>,
    last_with: RwLock<Vec<String>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
            last_with: RwLock::new(Vec::new()),
            _marker: PhantomData,
        }
    }

    /// Seed with existing records; ids that are not numeric are skipped
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let mut map = BTreeMap::new();
        for record in records {
            match record.id().parse::<u64>() {
                Ok(id) => {
                    map.insert(id, record);
                }
                Err(_) => log::warn!("Skipping seed record with non-numeric id {}", record.id()),
            }
        }
        let next = map.keys().next_back().map_or(1, |last| last + 1);
        Self {
            records: RwLock::new(map),
            next_id: RwLock::new(next),
            last_with: RwLock::new(Vec::new()),
            _marker: PhantomData,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Relations requested by the most recent read
    pub async fn last_eager_load(&self) -> Vec<String> {
        self.last_with.read().await.clone()
    }

    async fn remember(&self, with: &[String]) {
        *self.last_with.write().await = with.to_vec();
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository for MemoryRepository<T> {
    type Record = T;

    async fn all(&self, with: &[String]) -> RepositoryResult<Vec<T>> {
        self.remember(with).await;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find(&self, id: &str, with: &[String]) -> RepositoryResult<Option<T>> {
        self.remember(with).await;
        let Ok(key) = id.parse::<u64>() else {
            return Ok(None);
        };
        Ok(self.records.read().await.get(&key).cloned())
    }

    async fn find_by(&self, field: &str, value: &str, with: &[String]) -> RepositoryResult<Option<T>> {
        self.remember(with).await;
        let records = self.records.read().await;
        for record in records.values() {
            let attributes = serde_json::to_value(record)?;
            if attributes.get(field).is_some_and(|v| render_value(v) == value) {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn create(&self, data: Map<String, Value>, unguarded: bool) -> RepositoryResult<T> {
        let mut attributes = fillable_attributes::<T>(data, unguarded);

        let mut next_id = self.next_id.write().await;
        let id = *next_id;
        attributes.insert(PRIMARY_KEY.to_string(), Value::from(id));

        let record: T = serde_json::from_value(Value::Object(attributes))?;
        self.records.write().await.insert(id, record.clone());
        *next_id += 1;

        log::debug!("Created record {}", id);
        Ok(record)
    }

    async fn update(
        &self,
        record: T,
        data: Map<String, Value>,
        unguarded: bool,
    ) -> RepositoryResult<T> {
        let id = record.id();
        let key = id.parse::<u64>().map_err(|_| RepositoryError::Missing(id.clone()))?;

        let mut attributes = match serde_json::to_value(&record)? {
            Value::Object(map) => map,
            other => {
                return Err(RepositoryError::Backend(format!(
                    "record {} does not serialize to an object: {}",
                    id, other
                )))
            }
        };
        attributes.extend(fillable_attributes::<T>(data, unguarded));

        let updated: T = serde_json::from_value(Value::Object(attributes))?;

        let mut records = self.records.write().await;
        match records.get_mut(&key) {
            Some(slot) => *slot = updated.clone(),
            None => return Err(RepositoryError::Missing(id)),
        }
        Ok(updated)
    }

    async fn delete(&self, record: T) -> RepositoryResult<()> {
        let id = record.id();
        let removed = match id.parse::<u64>() {
            Ok(key) => self.records.write().await.remove(&key),
            Err(_) => None,
        };
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::Missing(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payer {
        id: u64,
        name: String,
        #[serde(default)]
        vip: bool,
    }

    impl Record for Payer {
        fn id(&self) -> String {
            self.id.to_string()
        }

        fn fillable() -> &'static [&'static str] {
            &["name"]
        }
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_assigns_incrementing_ids() {
        let repo = MemoryRepository::<Payer>::new();
        let a = repo.create(data(json!({"name": "Ada"})), false).await.unwrap();
        let b = repo.create(data(json!({"name": "Bob"})), false).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn guarded_create_drops_non_fillable() {
        let repo = MemoryRepository::<Payer>::new();
        let payer = repo
            .create(data(json!({"name": "Ada", "vip": true, "id": 99})), false)
            .await
            .unwrap();
        assert_eq!(payer, Payer { id: 1, name: "Ada".into(), vip: false });

        let unguarded = repo.create(data(json!({"name": "Bob", "vip": true})), true).await.unwrap();
        assert!(unguarded.vip);
    }

    #[tokio::test]
    async fn create_with_missing_fields_fails() {
        let repo = MemoryRepository::<Payer>::new();
        let err = repo.create(Map::new(), false).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn find_and_find_by() {
        let repo = MemoryRepository::with_records(vec![
            Payer { id: 3, name: "Ada".into(), vip: false },
            Payer { id: 7, name: "Bob".into(), vip: true },
        ]);

        assert_eq!(repo.find("7", &[]).await.unwrap().map(|p| p.name), Some("Bob".into()));
        assert!(repo.find("8", &[]).await.unwrap().is_none());
        assert!(repo.find("abc", &[]).await.unwrap().is_none());

        let by_name = repo.find_by("name", "Ada", &["tags".to_string()]).await.unwrap();
        assert_eq!(by_name.map(|p| p.id), Some(3));
        assert_eq!(repo.last_eager_load().await, vec!["tags".to_string()]);

        let by_flag = repo.find_by("vip", "true", &[]).await.unwrap();
        assert_eq!(by_flag.map(|p| p.id), Some(7));

        // next id continues after the seeded maximum
        let created = repo.create(data(json!({"name": "Cy"})), false).await.unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn update_overlays_fillable_fields() {
        let repo = MemoryRepository::<Payer>::new();
        let payer = repo.create(data(json!({"name": "Ada"})), false).await.unwrap();

        let updated = repo
            .update(payer, data(json!({"name": "Ada L.", "vip": true, "id": 5})), false)
            .await
            .unwrap();
        assert_eq!(updated, Payer { id: 1, name: "Ada L.".into(), vip: false });
        assert_eq!(repo.find("1", &[]).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = MemoryRepository::<Payer>::new();
        let payer = repo.create(data(json!({"name": "Ada"})), false).await.unwrap();
        repo.delete(payer.clone()).await.unwrap();
        assert!(repo.is_empty().await);
        assert!(matches!(repo.delete(payer).await, Err(RepositoryError::Missing(_))));
    }
}
