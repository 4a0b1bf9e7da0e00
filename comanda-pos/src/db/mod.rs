//! Document store
//!
//! `DocumentStore` is the persistence boundary: untyped JSON documents
//! grouped in collections. Two implementations exist, an in-process store
//! and Firestore. Typed access goes through `repository`.
//!
//! Writers are not coordinated at this level: last write wins. The inventory
//! repository serializes its own read-modify-write updates.

pub mod firestore;
pub mod memory;
pub mod repository;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use repository::{RepoError, RepoResult};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Document fields
pub type Fields = Map<String, Value>;

/// The five collections used by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Plates,
    Inventory,
    Customers,
    Orders,
    Employees,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Plates,
        Collection::Inventory,
        Collection::Customers,
        Collection::Orders,
        Collection::Employees,
    ];

    /// Collection name in the database
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Plates => "platos",
            Collection::Inventory => "inventario",
            Collection::Customers => "clientes",
            Collection::Orders => "pedidos",
            Collection::Employees => "empleados",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Deserialize the fields into a record
    pub fn decode<T: DeserializeOwned>(&self) -> RepoResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            RepoError::Decode(format!("document {}: {}", self.id, e))
        })
    }
}

/// Serialize a record into document fields
pub fn encode<T: Serialize>(record: &T) -> RepoResult<Fields> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RepoError::Decode(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(RepoError::Decode(e.to_string())),
    }
}

/// Untyped CRUD over collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection
    async fn list(&self, collection: Collection) -> RepoResult<Vec<Document>>;

    /// One document; `None` when absent
    async fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<Document>>;

    /// Insert a document under a new unique id, returning the id
    async fn create(&self, collection: Collection, fields: Fields) -> RepoResult<String>;

    /// Create or fully replace the document with the given id
    async fn put(&self, collection: Collection, id: &str, fields: Fields) -> RepoResult<()>;

    /// Overwrite the listed fields of an existing document
    ///
    /// Fails with `NotFound` if the document does not exist.
    async fn update(&self, collection: Collection, id: &str, patch: Fields) -> RepoResult<()>;

    /// Remove a document; removing a missing document is not an error
    async fn delete(&self, collection: Collection, id: &str) -> RepoResult<()>;

    /// Documents whose top-level `field` equals `value`
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> RepoResult<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::Plate;

    #[test]
    fn test_collection_names() {
        let names: Vec<_> = Collection::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["platos", "inventario", "clientes", "pedidos", "empleados"]);
    }

    #[test]
    fn test_encode_decode_record() {
        let plate = Plate::new("Ajiaco", 18000.0).with_ingredient("papa", 0.3);
        let fields = encode(&plate).unwrap();
        assert_eq!(fields["nombre"], json!("Ajiaco"));
        assert!(!fields.contains_key("id"));

        let doc = Document::new("p-1", fields);
        let decoded: Plate = doc.decode().unwrap();
        assert_eq!(decoded.name, "Ajiaco");
        assert_eq!(decoded.ingredients["papa"], 0.3);
    }

    #[test]
    fn test_decode_error_names_document() {
        let mut fields = Fields::new();
        fields.insert("precio".into(), json!("caro"));
        let err = Document::new("p-9", fields).decode::<Plate>().unwrap_err();
        assert!(err.to_string().contains("p-9"));
    }
}
