//! Login, role resolution and employee administration

use std::str::FromStr;
use std::sync::Arc;

use comanda_client::TokenSlot;
use parking_lot::RwLock;
use shared::{AppError, AppResult, Employee, EmployeeCreate, ErrorCode, Role};

use super::provider::{Identity, IdentityProvider};
use crate::db::repository::EmployeeRepository;

/// What to do with an authenticated account that has no employee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnprovisionedPolicy {
    /// Let them in with the lowest-privilege role
    #[default]
    LowestPrivilege,
    /// Refuse the login
    Deny,
}

impl FromStr for UnprovisionedPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest-privilege" | "lowest_privilege" | "server" => Ok(Self::LowestPrivilege),
            "deny" => Ok(Self::Deny),
            other => Err(AppError::config(format!("unknown unprovisioned policy: {}", other))),
        }
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    /// False when the role came from the unprovisioned fallback
    pub provisioned: bool,
}

impl Session {
    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }
}

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    employees: EmployeeRepository,
    policy: UnprovisionedPolicy,
    token_slot: Option<TokenSlot>,
    session: RwLock<Option<Session>>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        employees: EmployeeRepository,
        policy: UnprovisionedPolicy,
    ) -> Self {
        Self {
            identity,
            employees,
            policy,
            token_slot: None,
            session: RwLock::new(None),
        }
    }

    /// Publish the session token to the document store client
    pub fn with_token_slot(mut self, slot: TokenSlot) -> Self {
        self.token_slot = Some(slot);
        self
    }

    pub fn policy(&self) -> UnprovisionedPolicy {
        self.policy
    }

    /// Authenticate and resolve the role
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "email and password are required",
            ));
        }

        let identity = self.identity.sign_in(email, password).await?;
        // the role lookup itself needs the token
        self.publish_token(Some(identity.token.clone()));

        let session = match self.resolve_role(&identity).await {
            Ok((role, provisioned)) => Session {
                uid: identity.uid,
                email: identity.email,
                role,
                token: identity.token,
                provisioned,
            },
            Err(e) => {
                self.publish_token(None);
                return Err(e);
            }
        };

        tracing::info!(uid = %session.uid, role = %session.role, "Login succeeded");
        *self.session.write() = Some(session.clone());
        Ok(session)
    }

    /// Employee record by uid, then by email, then the unprovisioned policy
    async fn resolve_role(&self, identity: &Identity) -> AppResult<(Role, bool)> {
        if let Some(employee) = self.employees.find_by_uid(&identity.uid).await? {
            return Ok((employee.role, true));
        }
        if let Some(employee) = self.employees.find_by_email(&identity.email).await? {
            return Ok((employee.role, true));
        }

        match self.policy {
            UnprovisionedPolicy::LowestPrivilege => {
                let role = Role::lowest_privilege();
                tracing::warn!(
                    uid = %identity.uid,
                    role = %role,
                    "Authenticated user has no employee record, granting lowest-privilege role"
                );
                Ok((role, false))
            }
            UnprovisionedPolicy::Deny => {
                tracing::warn!(
                    uid = %identity.uid,
                    "Authenticated user has no employee record, login denied"
                );
                Err(AppError::with_message(
                    ErrorCode::EmployeeNotProvisioned,
                    format!("{} has no employee record", identity.email),
                )
                .with_detail("uid", identity.uid.as_str()))
            }
        }
    }

    pub fn logout(&self) {
        if let Some(session) = self.session.write().take() {
            tracing::info!(uid = %session.uid, "Logged out");
        }
        self.publish_token(None);
    }

    pub fn current(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn require_session(&self) -> AppResult<Session> {
        self.current().ok_or_else(AppError::not_authenticated)
    }

    pub fn require_manager(&self) -> AppResult<Session> {
        let session = self.require_session()?;
        if !session.is_manager() {
            return Err(AppError::new(ErrorCode::ManagerRequired));
        }
        Ok(session)
    }

    fn publish_token(&self, token: Option<String>) {
        if let Some(slot) = &self.token_slot {
            slot.set(token);
        }
    }

    // ========== Employee administration (manager only) ==========

    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.require_manager()?;
        Ok(self.employees.find_all().await?)
    }

    /// Create the identity account and its employee record
    pub async fn create_employee(&self, data: EmployeeCreate) -> AppResult<Employee> {
        self.require_manager()?;
        let email = data.email.trim();
        if email.is_empty() || data.password.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "email and password are required",
            ));
        }

        let account = self.identity.create_account(email, &data.password).await?;
        let employee = Employee::new(account.uid, email, data.role);
        self.employees.upsert(&employee).await?;
        tracing::info!(uid = %employee.uid, role = %employee.role, "Employee created");
        Ok(employee)
    }

    pub async fn update_role(&self, uid: &str, role: Role) -> AppResult<()> {
        self.require_manager()?;
        if uid.is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, "uid is required"));
        }
        self.employees.update_role(uid, role).await?;
        tracing::info!(uid, role = %role, "Employee role updated");
        Ok(())
    }

    /// Remove the employee record; the identity account is left in place
    pub async fn delete_employee(&self, uid: &str) -> AppResult<()> {
        let session = self.require_manager()?;
        if uid.is_empty() {
            return Err(AppError::with_message(ErrorCode::RequiredField, "uid is required"));
        }
        if uid == session.uid {
            return Err(AppError::validation("you cannot delete your own account"));
        }
        self.employees.delete(uid).await?;
        tracing::info!(uid, "Employee deleted");
        Ok(())
    }
}
