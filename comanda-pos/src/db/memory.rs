//! In-process document store
//!
//! Keeps insertion order per collection. Used by tests and the offline
//! `STORE_BACKEND=memory` mode.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use super::{Collection, Document, DocumentStore, Fields, RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, IndexMap<String, Fields>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, IndexMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: Collection) -> RepoResult<Vec<Document>> {
        let guard = self.collections.read();
        Ok(guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<Document>> {
        let guard = self.collections.read();
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RepoResult<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn put(&self, collection: Collection, id: &str, fields: Fields) -> RepoResult<()> {
        if id.is_empty() {
            return Err(RepoError::Validation("document id is empty".into()));
        }
        self.collections
            .write()
            .entry(collection)
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, patch: Fields) -> RepoResult<()> {
        let mut guard = self.collections.write();
        let doc = guard
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| RepoError::NotFound(format!("{}/{}", collection, id)))?;
        doc.extend(patch);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RepoResult<()> {
        if let Some(docs) = self.collections.write().get_mut(&collection) {
            docs.shift_remove(id);
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> RepoResult<Vec<Document>> {
        let guard = self.collections.read();
        Ok(guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| fields.get(field) == Some(value))
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.create(Collection::Plates, fields(json!({"nombre": "A"}))).await.unwrap();
        let b = store.create(Collection::Plates, fields(json!({"nombre": "B"}))).await.unwrap();
        assert_ne!(a, b);

        let listed: Vec<_> = store
            .list(Collection::Plates)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(listed, vec![a, b]);
        assert_eq!(store.count(Collection::Orders), 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(Collection::Orders, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Inventory, fields(json!({"nombre": "arroz", "cantidad": 5})))
            .await
            .unwrap();
        store
            .update(Collection::Inventory, &id, fields(json!({"cantidad": 7.5})))
            .await
            .unwrap();
        let doc = store.get(Collection::Inventory, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["nombre"], json!("arroz"));
        assert_eq!(doc.fields["cantidad"], json!(7.5));

        let err = store
            .update(Collection::Inventory, "missing", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_delete_and_find() {
        let store = MemoryStore::new();
        store
            .put(
                Collection::Employees,
                "uid-1",
                fields(json!({"email": "a@x.co", "rol": "gerente"})),
            )
            .await
            .unwrap();
        store
            .put(
                Collection::Employees,
                "uid-2",
                fields(json!({"email": "b@x.co", "rol": "mesero"})),
            )
            .await
            .unwrap();

        let found = store
            .find_by_field(Collection::Employees, "email", &json!("b@x.co"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "uid-2");

        store.delete(Collection::Employees, "uid-1").await.unwrap();
        store.delete(Collection::Employees, "uid-1").await.unwrap();
        assert_eq!(store.count(Collection::Employees), 1);
    }
}
