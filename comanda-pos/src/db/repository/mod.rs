//! Repository Module
//!
//! Typed access to the document store, one repository per collection.

pub mod customer;
pub mod employee;
pub mod inventory;
pub mod order;
pub mod plate;

// Re-exports
pub use customer::CustomerRepository;
pub use employee::EmployeeRepository;
pub use inventory::InventoryRepository;
pub use order::OrderRepository;
pub use plate::PlateRepository;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{AppError, ErrorCode};
use thiserror::Error;

use super::{Collection, Document, DocumentStore, encode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed document: {0}")]
    Decode(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) | RepoError::Decode(msg) => AppError::store(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with store reference
#[derive(Clone)]
pub struct BaseRepository {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
}

impl BaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// List and decode every document, skipping (and logging) malformed ones
    pub async fn list_as<T: DeserializeOwned>(&self) -> RepoResult<Vec<(String, T)>> {
        let docs = self.store.list(self.collection).await?;
        Ok(decode_all(self.collection, docs))
    }

    pub async fn get_as<T: DeserializeOwned>(&self, id: &str) -> RepoResult<Option<T>> {
        match self.store.get(self.collection, id).await? {
            Some(doc) => doc.decode().map(Some),
            None => Ok(None),
        }
    }

    pub async fn find_as<T: DeserializeOwned>(
        &self,
        field: &str,
        value: serde_json::Value,
    ) -> RepoResult<Vec<(String, T)>> {
        let docs = self.store.find_by_field(self.collection, field, &value).await?;
        Ok(decode_all(self.collection, docs))
    }

    pub async fn create_from<T: Serialize>(&self, record: &T) -> RepoResult<String> {
        self.store.create(self.collection, encode(record)?).await
    }

    pub async fn put_from<T: Serialize>(&self, id: &str, record: &T) -> RepoResult<()> {
        self.store.put(self.collection, id, encode(record)?).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(self.collection, id).await
    }
}

fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    docs: Vec<Document>,
) -> Vec<(String, T)> {
    docs.into_iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some((doc.id, record)),
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}
