//! Inventory Repository

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;
use shared::{AppError, InventoryItem};
use tokio::sync::Mutex;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{Collection, DocumentStore, Fields};

/// Stock that could not be covered when consuming ingredients
#[derive(Debug, Clone, PartialEq)]
pub struct Shortfall {
    pub ingredient: String,
    pub missing: f64,
}

/// Clones share one write lock: stock writes read the current level and
/// write it back, and they run one at a time within the process.
#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
    write_lock: Arc<Mutex<()>>,
}

fn quantity_patch(quantity: f64) -> Fields {
    let mut patch = Fields::new();
    patch.insert("cantidad".into(), json!(quantity));
    patch
}

fn validation(err: AppError) -> RepoError {
    RepoError::Validation(err.message)
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Inventory),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        Ok(self
            .base
            .list_as::<InventoryItem>()
            .await?
            .into_iter()
            .map(|(id, item)| InventoryItem { id, ..item })
            .collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<InventoryItem>> {
        Ok(self
            .base
            .get_as::<InventoryItem>(id)
            .await?
            .map(|item| InventoryItem { id: id.to_string(), ..item }))
    }

    pub async fn create(&self, item: InventoryItem) -> RepoResult<InventoryItem> {
        if item.name.trim().is_empty() {
            return Err(RepoError::Validation("item name is required".into()));
        }
        let id = self.base.create_from(&item).await?;
        Ok(InventoryItem { id, ..item })
    }

    /// Replace the stock level of an item
    pub async fn set_quantity(&self, id: &str, quantity: f64) -> RepoResult<InventoryItem> {
        let _guard = self.write_lock.lock().await;
        let mut item = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {} not found", id)))?;
        item.set_quantity(quantity).map_err(validation)?;
        self.base
            .store()
            .update(Collection::Inventory, id, quantity_patch(item.quantity))
            .await?;
        Ok(item)
    }

    /// Add or remove stock; rejected without writing if it would go negative
    pub async fn adjust(&self, id: &str, delta: f64) -> RepoResult<InventoryItem> {
        let _guard = self.write_lock.lock().await;
        let mut item = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Inventory item {} not found", id)))?;
        item.adjust(delta).map_err(validation)?;
        self.base
            .store()
            .update(Collection::Inventory, id, quantity_patch(item.quantity))
            .await?;
        Ok(item)
    }

    /// Deduct ingredient usage by item name (case-insensitive), saturating at zero
    ///
    /// Ingredients with no matching inventory item are reported as a full
    /// shortfall.
    pub async fn consume(&self, usage: &BTreeMap<String, f64>) -> RepoResult<Vec<Shortfall>> {
        if usage.is_empty() {
            return Ok(Vec::new());
        }
        let _guard = self.write_lock.lock().await;
        let mut items = self.find_all().await?;
        let mut shortfalls = Vec::new();

        for (ingredient, amount) in usage {
            let key = ingredient.to_lowercase();
            match items.iter_mut().find(|i| i.name.to_lowercase() == key) {
                Some(item) => {
                    let missing = item.consume(*amount);
                    self.base
                        .store()
                        .update(
                            Collection::Inventory,
                            &item.id,
                            quantity_patch(item.quantity),
                        )
                        .await?;
                    if missing > 0.0 {
                        shortfalls.push(Shortfall {
                            ingredient: ingredient.clone(),
                            missing,
                        });
                    }
                }
                None => shortfalls.push(Shortfall {
                    ingredient: ingredient.clone(),
                    missing: *amount,
                }),
            }
        }
        Ok(shortfalls)
    }
}
