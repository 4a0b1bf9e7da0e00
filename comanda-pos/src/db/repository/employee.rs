//! Employee Repository
//!
//! Employee documents are keyed by the identity provider uid.

use std::sync::Arc;

use serde_json::json;
use shared::{Employee, Role};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{Collection, DocumentStore, Fields};

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Employees),
        }
    }

    /// All employees ordered by email
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let mut employees: Vec<Employee> = self
            .base
            .list_as::<Employee>()
            .await?
            .into_iter()
            .map(|(uid, employee)| Employee { uid, ..employee })
            .collect();
        employees.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(employees)
    }

    pub async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .base
            .get_as::<Employee>(uid)
            .await?
            .map(|employee| Employee { uid: uid.to_string(), ..employee }))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .base
            .find_as::<Employee>("email", json!(email))
            .await?
            .into_iter()
            .next()
            .map(|(uid, employee)| Employee { uid, ..employee }))
    }

    /// Create or replace the employee document for `employee.uid`
    pub async fn upsert(&self, employee: &Employee) -> RepoResult<()> {
        if employee.uid.is_empty() {
            return Err(RepoError::Validation("employee uid is required".into()));
        }
        self.base.put_from(&employee.uid, employee).await
    }

    pub async fn update_role(&self, uid: &str, role: Role) -> RepoResult<()> {
        let mut patch = Fields::new();
        patch.insert("rol".into(), json!(role));
        self.base
            .store()
            .update(Collection::Employees, uid, patch)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => {
                    RepoError::NotFound(format!("Employee {} not found", uid))
                }
                other => other,
            })
    }

    pub async fn delete(&self, uid: &str) -> RepoResult<()> {
        self.base.delete(uid).await
    }
}
