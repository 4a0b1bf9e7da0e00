//! Application state
//!
//! Holds every service the view-models need. Cloning is cheap: everything
//! inside is an `Arc` or a repository over a shared store.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | config | loaded configuration |
//! | store | document store backend |
//! | plates .. employees | typed repositories over `store` |
//! | auth | login, session and employee administration |
//! | advisory | language model advice, disabled without an API key |

use std::sync::Arc;

use comanda_client::{ClientConfig, FirestoreClient, GeminiConfig, IdentityClient};
use shared::AppResult;

use super::config::{Config, StoreBackend};
use super::seed;
use crate::advisory::{AdvisoryService, GeminiModel};
use crate::auth::{AuthService, FirebaseIdentity, IdentityProvider};
use crate::db::repository::{
    CustomerRepository, EmployeeRepository, InventoryRepository, OrderRepository, PlateRepository,
};
use crate::db::{DocumentStore, FirestoreStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub plates: PlateRepository,
    pub inventory: InventoryRepository,
    pub customers: CustomerRepository,
    pub orders: OrderRepository,
    pub employees: EmployeeRepository,
    pub auth: Arc<AuthService>,
    pub advisory: AdvisoryService,
}

impl AppState {
    /// Wire services from explicit parts
    ///
    /// Used by `initialize` and by tests that bring their own fakes.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        advisory: AdvisoryService,
    ) -> Self {
        let employees = EmployeeRepository::new(store.clone());
        let auth = AuthService::new(identity, employees.clone(), config.unprovisioned_policy);
        Self::assemble(config, store, employees, auth, advisory)
    }

    fn assemble(
        config: Config,
        store: Arc<dyn DocumentStore>,
        employees: EmployeeRepository,
        auth: AuthService,
        advisory: AdvisoryService,
    ) -> Self {
        Self {
            plates: PlateRepository::new(store.clone()),
            inventory: InventoryRepository::new(store.clone()),
            customers: CustomerRepository::new(store.clone()),
            orders: OrderRepository::new(store.clone()),
            employees,
            auth: Arc::new(auth),
            advisory,
            store,
            config,
        }
    }

    /// Build the state for the configured backend
    ///
    /// The memory backend is seeded with a demo menu, stock and two accounts.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let advisory = build_advisory(config);

        let state = match (config.backend, &config.firebase) {
            (StoreBackend::Memory, _) => {
                let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
                let state = Self::from_parts(
                    config.clone(),
                    store,
                    Arc::new(seed::demo_identity()),
                    advisory,
                );
                seed::seed_demo(&state.plates, &state.inventory, &state.employees).await?;
                state
            }
            (StoreBackend::Firestore, Some(firebase)) => {
                let client_config = ClientConfig::new(&firebase.api_key, &firebase.project_id)
                    .with_database(&firebase.database)
                    .with_timeout(config.request_timeout_secs);
                let firestore = FirestoreClient::new(&client_config)?;
                let token_slot = firestore.token_slot();
                let identity = FirebaseIdentity::new(IdentityClient::new(&client_config)?);

                let store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(firestore));
                let employees = EmployeeRepository::new(store.clone());
                let auth = AuthService::new(
                    Arc::new(identity),
                    employees.clone(),
                    config.unprovisioned_policy,
                )
                .with_token_slot(token_slot);
                Self::assemble(config.clone(), store, employees, auth, advisory)
            }
            (StoreBackend::Firestore, None) => {
                return Err(super::config::ConfigError::Missing("FIREBASE_PROJECT_ID").into());
            }
        };

        tracing::info!(
            backend = ?config.backend,
            advisory = state.advisory.is_enabled(),
            policy = ?state.auth.policy(),
            "Application state initialized"
        );
        Ok(state)
    }
}

fn build_advisory(config: &Config) -> AdvisoryService {
    let Some(gemini) = &config.gemini else {
        tracing::info!("GEMINI_API_KEY not set, advisory disabled");
        return AdvisoryService::disabled();
    };
    let model_config = GeminiConfig::new(&gemini.api_key)
        .with_model(&gemini.model)
        .with_temperature(gemini.temperature)
        .with_timeout(config.request_timeout_secs);
    match GeminiModel::new(model_config) {
        Ok(model) => AdvisoryService::new(Arc::new(model)),
        Err(e) => {
            tracing::warn!(error = %e, "Language model unavailable, advisory disabled");
            AdvisoryService::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        Config::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".into()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_backend_is_seeded() {
        let state = AppState::initialize(&memory_config()).await.unwrap();
        assert!(!state.advisory.is_enabled());
        assert_eq!(state.plates.find_all().await.unwrap().len(), 4);
        assert!(!state.inventory.find_all().await.unwrap().is_empty());

        let session = state
            .auth
            .login(seed::DEMO_MANAGER.1, seed::DEMO_MANAGER.2)
            .await
            .unwrap();
        assert!(session.is_manager());
    }
}
