//! Login screen

use std::sync::Arc;

use shared::Role;
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::auth::{AuthService, Session};
use crate::core::AppState;
use crate::state::Observable;

pub struct LoginViewModel {
    auth: Arc<AuthService>,
    pub status: ViewStatus,
    /// Set after a successful login, cleared on logout
    pub session: Observable<Option<Session>>,
}

impl LoginViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            status: ViewStatus::default(),
            session: Observable::new(state.auth.current()),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.status.clear();
        let Some(session) = self
            .status
            .track("Error de inicio de sesión", self.auth.login(email, password))
            .await
        else {
            return false;
        };

        if session.provisioned {
            self.status.info(format!("Bienvenido, {}", session.email));
        } else {
            self.status.info(format!(
                "Bienvenido, {}. Sin registro de empleado: acceso como {}.",
                session.email,
                Role::lowest_privilege().as_str()
            ));
        }
        self.session.set(Some(session));
        true
    }

    pub fn spawn_login(self: &Arc<Self>, email: String, password: String) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.login(&email, &password).await })
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.session.set(None);
        self.status.info("Sesión cerrada.");
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(|s| s.as_ref().map(|s| s.role))
    }
}
