//! Firestore REST v1 client
//!
//! Thin wrapper over the documents API. Fields go in and come out as plain
//! JSON maps; `value` does the typed-value encoding.

pub mod value;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::http::{TokenSlot, build_client, handle_response};
use crate::{ClientConfig, ClientError, ClientResult};

/// Page size for collection listing
const PAGE_SIZE: u32 = 300;

/// A decoded document
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Last path segment of the document name
    pub id: String,
    pub fields: Map<String, Value>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    update_time: Option<String>,
}

impl WireDocument {
    fn decode(self) -> ClientResult<RawDocument> {
        let id = document_id(&self.name)
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!("bad document name: {}", self.name))
            })?
            .to_string();
        Ok(RawDocument {
            id,
            fields: value::decode_fields(&self.fields)?,
            create_time: self.create_time,
            update_time: self.update_time,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// One element of a `runQuery` response stream
#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    document: Option<WireDocument>,
}

/// `projects/p/databases/d/documents/pedidos/abc` -> `abc`
fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

/// Firestore documents client
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: Client,
    root: String,
    token: TokenSlot,
}

impl FirestoreClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            root: config.documents_root(),
            token: TokenSlot::new(config.token.clone()),
        })
    }

    /// Share the token with another holder (the login flow)
    pub fn with_token_slot(mut self, slot: TokenSlot) -> Self {
        self.token = slot;
        self
    }

    pub fn token_slot(&self) -> TokenSlot {
        self.token.clone()
    }

    /// Replace the ID token used for subsequent calls (login/logout)
    pub fn set_token(&self, token: Option<String>) {
        self.token.set(token);
    }

    pub fn has_token(&self) -> bool {
        self.token.get().is_some()
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.root, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.root, collection, id)
    }

    /// All documents of a collection, following page tokens
    pub async fn list(&self, collection: &str) -> ClientResult<Vec<RawDocument>> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = self.token.authorize(request).send().await?;
            let page: ListResponse = handle_response(response).await?;

            for doc in page.documents {
                documents.push(doc.decode()?);
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(collection, count = documents.len(), "Listed documents");
        Ok(documents)
    }

    /// Fetch one document; `None` when it does not exist
    pub async fn get(&self, collection: &str, id: &str) -> ClientResult<Option<RawDocument>> {
        let request = self.client.get(self.document_url(collection, id));
        let response = self.token.authorize(request).send().await?;
        match handle_response::<WireDocument>(response).await {
            Ok(doc) => doc.decode().map(Some),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a document; the server assigns the id unless `document_id` is given
    pub async fn create(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
        document_id: Option<&str>,
    ) -> ClientResult<RawDocument> {
        let mut request = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": value::encode_fields(fields) }));
        if let Some(id) = document_id {
            request = request.query(&[("documentId", id)]);
        }
        let response = self.token.authorize(request).send().await?;
        let doc: WireDocument = handle_response(response).await?;
        doc.decode()
    }

    /// Patch a document
    ///
    /// With `mask`, only the listed fields are written (and must exist on the
    /// document). Without it the whole document is replaced, or created.
    pub async fn patch(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
        mask: Option<&[String]>,
    ) -> ClientResult<RawDocument> {
        let mut request = self
            .client
            .patch(self.document_url(collection, id))
            .json(&json!({ "fields": value::encode_fields(fields) }));
        if let Some(paths) = mask {
            let params: Vec<(&str, &str)> = paths
                .iter()
                .map(|p| ("updateMask.fieldPaths", p.as_str()))
                .collect();
            request = request
                .query(&params)
                .query(&[("currentDocument.exists", "true")]);
        }
        let response = self.token.authorize(request).send().await?;
        let doc: WireDocument = handle_response(response).await?;
        doc.decode()
    }

    /// Delete a document; deleting a missing document succeeds
    pub async fn delete(&self, collection: &str, id: &str) -> ClientResult<()> {
        let request = self.client.delete(self.document_url(collection, id));
        let response = self.token.authorize(request).send().await?;
        handle_response::<Value>(response).await.map(|_| ())
    }

    /// Documents whose `field` equals `value`
    pub async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> ClientResult<Vec<RawDocument>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": value::encode(value)
                    }
                }
            }
        });
        let request = self
            .client
            .post(format!("{}:runQuery", self.root))
            .json(&body);
        let response = self.token.authorize(request).send().await?;
        let results: Vec<QueryResult> = handle_response(response).await?;

        results
            .into_iter()
            .filter_map(|r| r.document)
            .map(WireDocument::decode)
            .collect()
    }
}
