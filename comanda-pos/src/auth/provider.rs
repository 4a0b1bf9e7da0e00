//! Identity providers
//!
//! `FirebaseIdentity` talks to Identity Toolkit. `LocalIdentity` keeps
//! accounts in memory for the offline mode and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use comanda_client::{AuthResponse, ClientError, IdentityClient};
use parking_lot::RwLock;
use shared::{AppError, AppResult, ErrorCode};

/// An authenticated account
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    /// Opaque bearer token for the document store
    pub token: String,
}

impl From<AuthResponse> for Identity {
    fn from(resp: AuthResponse) -> Self {
        Self {
            uid: resp.local_id,
            email: resp.email,
            token: resp.id_token,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Password login
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// Register a new account
    async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity>;
}

/// Map identity failures to invalid-credentials vs anything else
fn identity_error(err: ClientError) -> AppError {
    match err {
        ClientError::InvalidCredentials(reason) => {
            AppError::invalid_credentials().with_detail("reason", reason)
        }
        ClientError::Api { message, .. } => AppError::identity(message),
        other => AppError::identity(other.to_string()),
    }
}

pub struct FirebaseIdentity {
    client: IdentityClient,
}

impl FirebaseIdentity {
    pub fn new(client: IdentityClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let resp = self
            .client
            .sign_in_with_password(email, password)
            .await
            .map_err(identity_error)?;
        let mut identity = Identity::from(resp);
        if identity.email.is_empty() {
            identity.email = email.to_string();
        }
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity> {
        let resp = self
            .client
            .sign_up(email, password)
            .await
            .map_err(identity_error)?;
        Ok(Identity::from(resp))
    }
}

/// In-memory accounts
#[derive(Debug, Default)]
pub struct LocalIdentity {
    /// email -> (uid, password)
    accounts: RwLock<HashMap<String, (String, String)>>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with a fixed uid
    pub fn with_account(self, uid: &str, email: &str, password: &str) -> Self {
        self.accounts
            .write()
            .insert(email.to_lowercase(), (uid.to_string(), password.to_string()));
        self
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let accounts = self.accounts.read();
        match accounts.get(&email.to_lowercase()) {
            Some((uid, stored)) if stored == password => Ok(Identity {
                uid: uid.clone(),
                email: email.to_string(),
                token: format!("local-{}", uid),
            }),
            Some(_) => {
                Err(AppError::invalid_credentials().with_detail("reason", "INVALID_PASSWORD"))
            }
            None => Err(AppError::invalid_credentials().with_detail("reason", "EMAIL_NOT_FOUND")),
        }
    }

    async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity> {
        if password.chars().count() < 6 {
            return Err(AppError::with_message(
                ErrorCode::IdentityProviderError,
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        let key = email.to_lowercase();
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&key) {
            return Err(AppError::with_message(ErrorCode::IdentityProviderError, "EMAIL_EXISTS"));
        }
        let uid = uuid::Uuid::new_v4().simple().to_string();
        accounts.insert(key, (uid.clone(), password.to_string()));
        Ok(Identity {
            token: format!("local-{}", uid),
            uid,
            email: email.to_string(),
        })
    }
}
