//! Client configuration

/// Identity Toolkit REST endpoint
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Firestore REST endpoint
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore database used when none is configured
pub const DEFAULT_DATABASE: &str = "(default)";

/// Configuration for the Firebase project (identity + document store)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Web API key of the Firebase project
    pub api_key: String,

    /// Project id (e.g., "mi-restaurante-1234")
    pub project_id: String,

    /// Firestore database id
    pub database: String,

    /// ID token for authenticated Firestore calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    pub identity_url: String,
    pub firestore_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            token: None,
            timeout: 30,
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the ID token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Point both services at another host (emulators)
    pub fn with_base_urls(
        mut self,
        identity_url: impl Into<String>,
        firestore_url: impl Into<String>,
    ) -> Self {
        self.identity_url = identity_url.into();
        self.firestore_url = firestore_url.into();
        self
    }

    /// `.../projects/{project}/databases/{database}/documents`
    pub fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.firestore_url.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }
}
