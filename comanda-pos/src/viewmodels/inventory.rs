//! Inventory screen

use std::sync::Arc;

use shared::{AppError, InventoryItem};
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::advisory::AdvisoryService;
use crate::advisory::prompts::LOW_STOCK_THRESHOLD;
use crate::core::AppState;
use crate::db::repository::InventoryRepository;
use crate::state::Observable;

pub struct InventoryViewModel {
    inventory: InventoryRepository,
    advisory: AdvisoryService,
    pub status: ViewStatus,
    pub items: Observable<Vec<InventoryItem>>,
    /// Last shopping-list answer from the advisory model
    pub advice: Observable<String>,
}

impl InventoryViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            inventory: state.inventory.clone(),
            advisory: state.advisory.clone(),
            status: ViewStatus::default(),
            items: Observable::default(),
            advice: Observable::default(),
        }
    }

    pub async fn load(&self) {
        let items = self
            .status
            .track("Error cargando inventario", async {
                Ok::<_, AppError>(self.inventory.find_all().await?)
            })
            .await;
        if let Some(items) = items {
            self.items.set(items);
        }
    }

    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.load().await })
    }

    pub async fn create_item(&self, name: &str, quantity: f64, unit: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || unit.trim().is_empty() {
            self.status.error("Nombre y unidad son requeridos.");
            return false;
        }
        let created = self
            .status
            .track("Error al crear ítem", async {
                let item = InventoryItem::new(name, quantity, unit.trim())?;
                Ok::<_, AppError>(self.inventory.create(item).await?)
            })
            .await;
        if created.is_none() {
            return false;
        }
        self.status.info(format!("Ítem '{}' creado con éxito.", name));
        self.load().await;
        true
    }

    /// Replace the stock level of an item
    pub async fn set_quantity(&self, id: &str, quantity: f64) -> bool {
        let updated = self
            .status
            .track("Error actualizando stock", async {
                Ok::<_, AppError>(self.inventory.set_quantity(id, quantity).await?)
            })
            .await;
        let Some(item) = updated else {
            return false;
        };
        self.status.info(format!(
            "Stock de {} actualizado a {}.",
            item.name, item.quantity
        ));
        self.load().await;
        true
    }

    /// Add or remove stock; rejected if the result would be negative
    pub async fn adjust(&self, id: &str, delta: f64) -> bool {
        let updated = self
            .status
            .track("Error actualizando stock", async {
                Ok::<_, AppError>(self.inventory.adjust(id, delta).await?)
            })
            .await;
        let Some(item) = updated else {
            return false;
        };
        self.status.info(format!(
            "Stock de {} actualizado a {} {}.",
            item.name, item.quantity, item.unit
        ));
        self.load().await;
        true
    }

    pub fn spawn_adjust(self: &Arc<Self>, id: String, delta: f64) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.adjust(&id, delta).await })
    }

    /// Items under the low-stock threshold
    pub fn low_stock(&self) -> Vec<InventoryItem> {
        self.items.with(|items| {
            items
                .iter()
                .filter(|i| i.is_low(LOW_STOCK_THRESHOLD))
                .cloned()
                .collect()
        })
    }

    /// Ask the advisory model for a prioritized shopping list
    pub async fn request_shopping_list(&self) {
        self.advice.set("Procesando... por favor espere.".into());
        let items = self.items.get();
        let answer = self.advisory.low_inventory(&items).await;
        self.advice.set(answer);
    }

    pub fn spawn_shopping_list(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.request_shopping_list().await })
    }
}
