//! Customer Repository

use std::sync::Arc;

use serde_json::json;
use shared::Customer;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{Collection, DocumentStore, Fields};

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Customers),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        Ok(self
            .base
            .list_as::<Customer>()
            .await?
            .into_iter()
            .map(|(id, customer)| Customer { id, ..customer })
            .collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .base
            .get_as::<Customer>(id)
            .await?
            .map(|customer| Customer { id: id.to_string(), ..customer }))
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .base
            .find_as::<Customer>("email", json!(email))
            .await?
            .into_iter()
            .next()
            .map(|(id, customer)| Customer { id, ..customer }))
    }

    /// Existing customer with this email, or a new one
    pub async fn get_or_create_by_email(&self, email: &str, name: &str) -> RepoResult<Customer> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() || name.is_empty() {
            return Err(RepoError::Validation("email and name are required".into()));
        }

        if let Some(existing) = self.find_by_email(email).await? {
            return Ok(existing);
        }

        let customer = Customer::new(name, email);
        let id = self.base.create_from(&customer).await?;
        tracing::info!(customer_id = %id, "Customer created");
        Ok(Customer { id, ..customer })
    }

    /// Append an order id to the customer's history (no-op if already there)
    ///
    /// Read-modify-write; concurrent appends to the same customer may race.
    pub async fn append_order(&self, customer_id: &str, order_id: &str) -> RepoResult<()> {
        let mut customer = self
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", customer_id)))?;

        if !customer.record_order(order_id) {
            return Ok(());
        }

        let mut patch = Fields::new();
        patch.insert("historial_pedidos".into(), json!(customer.order_ids));
        self.base
            .store()
            .update(Collection::Customers, customer_id, patch)
            .await
    }
}
