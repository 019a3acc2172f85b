//! In-memory `DocumentStore`
//!
//! Used in development and tests. It mirrors the hosted store's observable behavior:
//! ids are assigned on create, updates merge fields and fail on missing records, and
//! deletes of missing records succeed. It can also simulate outages.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{DocumentStore, Fields, StoreError, StoreResult, StoredRecord};

type Collections = HashMap<String, BTreeMap<String, Fields>>;

pub struct InMemoryDocumentStore {
    collections: Arc<Mutex<Collections>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed a collection with records whose ids are chosen by the caller
    pub fn with_records(collection: &str, records: Vec<StoredRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut collections) = store.collections.lock() {
            let target = collections.entry(collection.to_string()).or_default();
            for record in records {
                target.insert(record.id, record.fields);
            }
        }
        store
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful mutating calls (create/update/set/delete)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn before_call(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("simulated outage"));
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Collections>> {
        self.collections.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn query<F>(&self, collection: &str, predicate: F) -> StoreResult<Vec<StoredRecord>>
    where
        F: Fn(&Fields) -> bool,
    {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, fields)| predicate(fields))
                    .map(|(id, fields)| StoredRecord {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_all(&self, collection: &str) -> StoreResult<Vec<StoredRecord>> {
        self.before_call()?;
        self.query(collection, |_| true)
    }

    async fn get_one(&self, collection: &str, id: &str) -> StoreResult<Option<Fields>> {
        self.before_call()?;
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn create(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        self.before_call()?;
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.lock()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Fields) -> StoreResult<()> {
        self.before_call()?;
        let mut collections = self.lock()?;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        for (key, value) in partial {
            record.insert(key, value);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.before_call()?;
        let mut collections = self.lock()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.before_call()?;
        let mut collections = self.lock()?;
        if let Some(records) = collections.get_mut(collection) {
            records.remove(id);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.before_call()?;
        self.query(collection, |fields| fields.get(field) == Some(value))
    }

    async fn query_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.before_call()?;
        self.query(collection, |fields| {
            fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.create("helps", fields(json!({"title": "A"}))).await.unwrap();
        let b = store.create("helps", fields(json!({"title": "B"}))).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.get_all("helps").await.unwrap().len(), 2);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing_record() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create("helps", fields(json!({"title": "A", "parentIds": []})))
            .await
            .unwrap();

        store
            .update("helps", &id, fields(json!({"parentIds": ["p"]})))
            .await
            .unwrap();
        let record = store.get_one("helps", &id).await.unwrap().unwrap();
        assert_eq!(record["title"], json!("A"));
        assert_eq!(record["parentIds"], json!(["p"]));

        let missing = store.update("helps", "nope", Fields::new()).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_queries_by_equality_and_membership() {
        let store = InMemoryDocumentStore::with_records(
            "helps",
            vec![
                StoredRecord {
                    id: "root".into(),
                    fields: fields(json!({"title": "Root", "parentIds": []})),
                },
                StoredRecord {
                    id: "child".into(),
                    fields: fields(json!({"title": "Child", "parentIds": ["root"]})),
                },
            ],
        );

        let roots = store
            .query_field_equals("helps", "parentIds", &json!([]))
            .await
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, "root");

        let children = store
            .query_field_contains("helps", "parentIds", &json!("root"))
            .await
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "child");
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_calls() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get_all("helps").await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert!(store.get_all("helps").await.is_ok());
    }
}
