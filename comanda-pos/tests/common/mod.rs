//! Shared fixtures: in-memory store, fake identity provider, scripted model

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use comanda_pos::advisory::{AdvisoryService, LanguageModel};
use comanda_pos::auth::{Identity, IdentityProvider};
use comanda_pos::db::{Collection, Document, DocumentStore, Fields, MemoryStore, RepoResult};
use serde_json::Value;
use comanda_pos::{AppState, Config};
use parking_lot::Mutex;
use shared::{AppError, AppResult, Employee, InventoryItem, Plate, Role};

pub const PASSWORD: &str = "clave123";

/// Accepts `PASSWORD` for any email; uid is derived from the email
#[derive(Default)]
pub struct FakeIdentity {
    pub created: Mutex<Vec<String>>,
}

pub fn uid_for(email: &str) -> String {
    format!("uid-{}", email.split('@').next().unwrap_or(email))
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        if password != PASSWORD {
            return Err(AppError::invalid_credentials().with_detail("reason", "INVALID_PASSWORD"));
        }
        Ok(Identity {
            uid: uid_for(email),
            email: email.to_string(),
            token: "fake-token".to_string(),
        })
    }

    async fn create_account(&self, email: &str, _password: &str) -> AppResult<Identity> {
        self.created.lock().push(email.to_string());
        Ok(Identity {
            uid: uid_for(email),
            email: email.to_string(),
            token: "fake-token".to_string(),
        })
    }
}

/// Answers every prompt with the same text and records the prompts
pub struct ScriptedModel {
    reply: AppResult<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(AppError::advisory("quota exceeded")),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply.clone()
    }
}

pub fn config(pairs: &[(&str, &str)]) -> Config {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(std::iter::once(("STORE_BACKEND".to_string(), "memory".to_string())))
        .collect();
    Config::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

/// `MemoryStore` that sleeps before each call, so concurrent tasks
/// interleave at every store access
#[derive(Default)]
pub struct YieldingStore {
    inner: MemoryStore,
}

impl YieldingStore {
    async fn pause(&self) {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn list(&self, collection: Collection) -> RepoResult<Vec<Document>> {
        self.pause().await;
        self.inner.list(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> RepoResult<Option<Document>> {
        self.pause().await;
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> RepoResult<String> {
        self.pause().await;
        self.inner.create(collection, fields).await
    }

    async fn put(&self, collection: Collection, id: &str, fields: Fields) -> RepoResult<()> {
        self.pause().await;
        self.inner.put(collection, id, fields).await
    }

    async fn update(&self, collection: Collection, id: &str, patch: Fields) -> RepoResult<()> {
        self.pause().await;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> RepoResult<()> {
        self.pause().await;
        self.inner.delete(collection, id).await
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> RepoResult<Vec<Document>> {
        self.pause().await;
        self.inner.find_by_field(collection, field, value).await
    }
}

pub fn state_on(store: Arc<dyn DocumentStore>) -> AppState {
    comanda_pos::init_logger();
    AppState::from_parts(
        config(&[]),
        store,
        Arc::new(FakeIdentity::default()),
        AdvisoryService::disabled(),
    )
}

pub fn state_with(config: Config, advisory: AdvisoryService) -> AppState {
    comanda_pos::init_logger();
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    AppState::from_parts(config, store, Arc::new(FakeIdentity::default()), advisory)
}

pub fn state() -> AppState {
    state_with(config(&[]), AdvisoryService::disabled())
}

pub async fn add_employee(state: &AppState, email: &str, role: Role) {
    state
        .employees
        .upsert(&Employee::new(uid_for(email), email, role))
        .await
        .unwrap();
}

/// Hamburguesa (pan, carne) and Limonada (limón), with matching stock
pub async fn seed_menu(state: &AppState) -> (Plate, Plate) {
    let burger = state
        .plates
        .create(
            Plate::new("Hamburguesa", 15000.0)
                .with_ingredient("pan", 1.0)
                .with_ingredient("carne", 0.2),
        )
        .await
        .unwrap();
    let lemonade = state
        .plates
        .create(Plate::new("Limonada", 5000.0).with_ingredient("limón", 0.1))
        .await
        .unwrap();
    let stock = [("pan", 10.0, "unidades"), ("carne", 2.0, "kg"), ("limón", 1.0, "kg")];
    for (name, qty, unit) in stock {
        state
            .inventory
            .create(InventoryItem::new(name, qty, unit).unwrap())
            .await
            .unwrap();
    }
    (burger, lemonade)
}

pub async fn login(state: &AppState, email: &str) {
    state.auth.login(email, PASSWORD).await.unwrap();
}
