//! Order history screen

use std::sync::Arc;

use shared::{AppError, Order};
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::core::AppState;
use crate::db::repository::OrderRepository;
use crate::state::Observable;

pub struct HistoryViewModel {
    orders: OrderRepository,
    pub status: ViewStatus,
    /// Newest first
    pub orders_list: Observable<Vec<Order>>,
    /// Index into `orders_list`
    pub selected: Observable<Option<usize>>,
}

impl HistoryViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.orders.clone(),
            status: ViewStatus::default(),
            orders_list: Observable::default(),
            selected: Observable::default(),
        }
    }

    /// Reload the list and clear the selection
    pub async fn load(&self) {
        let orders = self
            .status
            .track("Error al cargar historial", async {
                Ok::<_, AppError>(self.orders.history().await?)
            })
            .await;
        if let Some(orders) = orders {
            self.orders_list.set(orders);
            self.selected.set(None);
        }
    }

    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.load().await })
    }

    /// Select by index; out of range clears the selection
    pub fn select(&self, index: usize) {
        let len = self.orders_list.with(Vec::len);
        self.selected.set((index < len).then_some(index));
    }

    pub fn selected_order(&self) -> Option<Order> {
        let index = self.selected.get()?;
        self.orders_list.with(|orders| orders.get(index).cloned())
    }

    /// Delete the selected order
    ///
    /// The selection is taken when the delete starts, so a second call
    /// made before the first finishes finds nothing selected.
    pub async fn delete_selected(&self) -> bool {
        let index = self.selected.replace(None);
        let Some(id) = index
            .and_then(|i| self.orders_list.with(|orders| orders.get(i).cloned()))
            .and_then(|o| o.id().map(str::to_string))
        else {
            self.status
                .error("Por favor, seleccione un pedido para eliminar.");
            return false;
        };

        let deleted = self
            .status
            .track("Error al eliminar el pedido", async {
                Ok::<_, AppError>(self.orders.delete(&id).await?)
            })
            .await;
        if deleted.is_none() {
            self.selected.set(index);
            return false;
        }
        tracing::info!(order_id = %id, "Order deleted");
        self.status
            .info(format!("Pedido {} eliminado con éxito.", id));
        self.load().await;
        true
    }

    pub fn spawn_delete_selected(self: &Arc<Self>) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.delete_selected().await })
    }
}
