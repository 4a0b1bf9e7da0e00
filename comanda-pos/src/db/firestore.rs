//! Firestore-backed document store

use async_trait::async_trait;
use comanda_client::{ClientError, FirestoreClient, RawDocument};
use serde_json::Value;

use super::{Collection, Document, DocumentStore, Fields, RepoError, RepoResult};

impl From<ClientError> for RepoError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(msg) => RepoError::NotFound(msg),
            ClientError::InvalidResponse(msg) => RepoError::Decode(msg),
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Document::new(raw.id, raw.fields)
    }
}

#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: FirestoreClient,
}

impl FirestoreStore {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FirestoreClient {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list(&self, collection: Collection) -> RepoResult<Vec<Document>> {
        let docs = self.client.list(collection.name()).await?;
        Ok(docs.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<Document>> {
        let doc = self.client.get(collection.name(), id).await?;
        Ok(doc.map(Document::from))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RepoResult<String> {
        let doc = self.client.create(collection.name(), &fields, None).await?;
        tracing::debug!(collection = %collection, id = %doc.id, "Document created");
        Ok(doc.id)
    }

    async fn put(&self, collection: Collection, id: &str, fields: Fields) -> RepoResult<()> {
        self.client.patch(collection.name(), id, &fields, None).await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, patch: Fields) -> RepoResult<()> {
        let mask: Vec<String> = patch.keys().cloned().collect();
        self.client
            .patch(collection.name(), id, &patch, Some(&mask))
            .await
            .map_err(|e| match e {
                // currentDocument.exists=false answers 404
                ClientError::NotFound(_) => RepoError::NotFound(format!("{}/{}", collection, id)),
                other => other.into(),
            })?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> RepoResult<()> {
        self.client.delete(collection.name(), id).await?;
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> RepoResult<Vec<Document>> {
        let docs = self
            .client
            .find_by_field(collection.name(), field, value)
            .await?;
        Ok(docs.into_iter().map(Document::from).collect())
    }
}
