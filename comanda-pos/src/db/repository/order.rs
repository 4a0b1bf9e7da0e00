//! Order Repository
//!
//! Every order document is normalized into `OrderRecord` here; callers never
//! see raw fields.

use std::sync::Arc;

use shared::{Order, OrderRecord};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{Collection, DocumentStore};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Orders),
        }
    }

    /// All orders, in store order
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        Ok(self
            .base
            .list_as::<OrderRecord>()
            .await?
            .into_iter()
            .map(|(id, record)| Order::from_record(OrderRecord { id, ..record }))
            .collect())
    }

    /// All orders, newest first
    pub async fn history(&self) -> RepoResult<Vec<Order>> {
        let mut orders = self.find_all().await?;
        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at()));
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        Ok(self
            .base
            .get_as::<OrderRecord>(id)
            .await?
            .map(|record| Order::from_record(OrderRecord { id: id.to_string(), ..record })))
    }

    /// Persist a new order and freeze it with the assigned id
    pub async fn save(&self, order: &mut Order) -> RepoResult<String> {
        if order.is_persisted() {
            return Err(RepoError::Validation(format!(
                "order {} is already saved",
                order.id().unwrap_or_default()
            )));
        }
        if order.is_empty() {
            return Err(RepoError::Validation("order has no items".into()));
        }

        let id = self.base.create_from(&order.to_record()).await?;
        order.mark_persisted(id.clone());
        tracing::info!(order_id = %id, total = order.total(), "Order saved");
        Ok(id)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.base.delete(id).await?;
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
