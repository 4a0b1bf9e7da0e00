//! Common HTTP plumbing for the Google REST APIs

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{ClientError, ClientResult};

/// Build a reqwest client with the configured timeout
pub(crate) fn build_client(timeout_secs: u64) -> ClientResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(ClientError::from)
}

/// Bearer token shared by every clone of a client
#[derive(Debug, Clone, Default)]
pub struct TokenSlot(Arc<RwLock<Option<String>>>);

impl TokenSlot {
    pub fn new(token: Option<String>) -> Self {
        Self(Arc::new(RwLock::new(token)))
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write() = token;
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().clone()
    }

    /// Attach `Authorization: Bearer ...` when a token is present
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Google error envelope: `{"error": {"code": 400, "message": "...", "status": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract the human message from an error body, falling back to the raw text
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        Ok(envelope) => envelope.error.status.unwrap_or_default(),
        Err(_) => body.trim().to_string(),
    }
}

/// Map a non-success status to a client error
pub(crate) fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Handle the HTTP response
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> ClientResult<T> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await?;
        tracing::debug!(status = status.as_u16(), body = %text, "Request failed");
        return Err(status_error(status, &text));
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        // DELETE and some PATCH calls answer with an empty body
        return serde_json::from_str("{}").map_err(Into::into);
    }
    serde_json::from_str(&text).map_err(Into::into)
}
