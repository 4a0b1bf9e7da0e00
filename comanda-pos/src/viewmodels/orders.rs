//! Orders screen
//!
//! Start an order for a customer, build the cart from the menu with a +/-
//! stepper and finalize it. Finalizing is three separate writes (order,
//! customer history, stock) with no rollback; a failure after the order is
//! saved is reported but the order stays saved.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{AppError, AppResult, Customer, ErrorCode, Order, Plate};
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::auth::AuthService;
use crate::core::AppState;
use crate::db::repository::{
    CustomerRepository, InventoryRepository, OrderRepository, PlateRepository,
};
use crate::state::Observable;

/// Ingredient amounts consumed by an order, keyed by ingredient name
///
/// Lines whose plate is not on `menu` consume nothing.
pub fn ingredient_usage(order: &Order, menu: &[Plate]) -> BTreeMap<String, f64> {
    let mut usage = BTreeMap::new();
    for line in order.lines() {
        let Some(plate) = menu.iter().find(|p| p.id == line.plate_id) else {
            continue;
        };
        for (ingredient, per_unit) in &plate.ingredients {
            *usage.entry(ingredient.clone()).or_insert(0.0) +=
                per_unit * f64::from(line.quantity);
        }
    }
    usage
}

pub struct OrdersViewModel {
    auth: Arc<AuthService>,
    plates: PlateRepository,
    customers: CustomerRepository,
    orders: OrderRepository,
    inventory: InventoryRepository,
    pub status: ViewStatus,
    /// Menu sorted by name
    pub menu: Observable<Vec<Plate>>,
    pub customer: Observable<Option<Customer>>,
    /// The order being built; `None` until one is started
    pub cart: Observable<Option<Order>>,
    /// Raised while a finalize is writing the cart
    pub finalizing: Observable<bool>,
}

impl OrdersViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            plates: state.plates.clone(),
            customers: state.customers.clone(),
            orders: state.orders.clone(),
            inventory: state.inventory.clone(),
            status: ViewStatus::default(),
            menu: Observable::default(),
            customer: Observable::default(),
            cart: Observable::default(),
            finalizing: Observable::default(),
        }
    }

    pub async fn load_menu(&self) {
        let plates = self
            .status
            .track("Error al cargar el menú", async {
                Ok::<_, AppError>(self.plates.find_all().await?)
            })
            .await;
        if let Some(plates) = plates {
            self.menu.set(plates);
        }
    }

    pub fn spawn_load_menu(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.load_menu().await })
    }

    /// Find or create the customer and open an empty order
    pub async fn start_order(&self, email: &str, name: &str) -> bool {
        if email.trim().is_empty() || name.trim().is_empty() {
            self.status
                .error("Email y Nombre son requeridos para iniciar.");
            return false;
        }

        let customer = self
            .status
            .track("Error al iniciar pedido", async {
                Ok::<_, AppError>(self.customers.get_or_create_by_email(email, name).await?)
            })
            .await;
        let Some(customer) = customer else {
            self.customer.set(None);
            self.cart.set(None);
            return false;
        };

        tracing::debug!(customer_id = %customer.id, "Order started");
        self.status
            .info(format!("Pedido iniciado para {}.", customer.name));
        self.cart.set(Some(Order::for_customer(&customer)));
        self.customer.set(Some(customer));
        true
    }

    pub fn spawn_start_order(self: &Arc<Self>, email: String, name: String) -> JoinHandle<bool> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.start_order(&email, &name).await })
    }

    /// Apply a change to a copy of the cart; the cart is replaced only on success
    fn edit_cart<F>(&self, context: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Order) -> AppResult<()>,
    {
        if self.finalizing.get() {
            self.status.error("El pedido ya se está guardando.");
            return false;
        }
        let Some(mut order) = self.cart.get() else {
            self.status
                .error("Inicie un pedido antes de añadir platos.");
            return false;
        };
        match edit(&mut order) {
            Ok(()) => {
                self.cart.set(Some(order));
                true
            }
            Err(e) => {
                self.status.fail(context, &e);
                false
            }
        }
    }

    fn menu_plate(&self, plate_id: &str) -> AppResult<Plate> {
        self.menu
            .with(|menu| menu.iter().find(|p| p.id == plate_id).cloned())
            .ok_or_else(|| {
                AppError::new(ErrorCode::PlateNotFound).with_detail("plate_id", plate_id)
            })
    }

    pub fn add_plate(&self, plate_id: &str, quantity: i32) -> bool {
        let plate = match self.menu_plate(plate_id) {
            Ok(plate) => plate,
            Err(e) => {
                self.status.fail("Error al agregar plato", &e);
                return false;
            }
        };
        self.edit_cart("Error al agregar plato", |order| {
            order.add_plate(&plate, quantity)
        })
    }

    /// Stepper "+": one more unit, adding the plate if it is not in the cart
    pub fn increment(&self, plate_id: &str) -> bool {
        let current = self.quantity_of(plate_id);
        if current == 0 {
            return self.add_plate(plate_id, 1);
        }
        self.set_quantity(plate_id, current + 1)
    }

    /// Stepper "-": one less unit; the line goes away at zero
    pub fn decrement(&self, plate_id: &str) -> bool {
        let current = self.quantity_of(plate_id);
        if current == 0 {
            return false;
        }
        self.set_quantity(plate_id, current - 1)
    }

    pub fn set_quantity(&self, plate_id: &str, quantity: i32) -> bool {
        self.edit_cart("Error al cambiar cantidad", |order| {
            order.set_item_quantity(plate_id, quantity)
        })
    }

    pub fn quantity_of(&self, plate_id: &str) -> i32 {
        self.cart.with(|cart| {
            cart.as_ref()
                .and_then(|o| o.line(plate_id))
                .map_or(0, |l| l.quantity)
        })
    }

    pub fn cancel_order(&self) {
        self.cart.set(None);
        self.customer.set(None);
        self.status.info("Pedido cancelado.");
    }

    /// Save the cart, record it in the customer's history and draw stock
    ///
    /// Returns the new order id. A call made while another finalize is
    /// still writing is rejected, so one cart is saved at most once.
    pub async fn finalize(&self) -> Option<String> {
        if let Err(e) = self.auth.require_session() {
            self.status.fail("Error al finalizar el pedido", &e);
            return None;
        }
        if self.finalizing.replace(true) {
            self.status.error("El pedido ya se está guardando.");
            return None;
        }
        let order_id = self.save_cart().await;
        self.finalizing.set(false);
        order_id
    }

    async fn save_cart(&self) -> Option<String> {
        let Some(mut order) = self.cart.get().filter(|o| !o.is_empty()) else {
            self.status
                .error("No hay nada en el pedido para finalizar.");
            return None;
        };

        self.status.busy.set(true);
        let order_id = match self.orders.save(&mut order).await {
            Ok(id) => id,
            Err(e) => {
                self.status.busy.set(false);
                self.status
                    .fail("Error al finalizar el pedido", &AppError::from(e));
                return None;
            }
        };

        let mut warnings = Vec::new();
        if let Err(e) = self
            .customers
            .append_order(order.customer_id(), &order_id)
            .await
        {
            tracing::error!(
                order_id = %order_id,
                error = %e,
                "Order saved but customer history not updated"
            );
            warnings.push("no se actualizó el historial del cliente".to_string());
        }

        let usage = self.menu.with(|menu| ingredient_usage(&order, menu));
        match self.inventory.consume(&usage).await {
            Ok(shortfalls) if !shortfalls.is_empty() => {
                for s in &shortfalls {
                    tracing::warn!(
                        order_id = %order_id,
                        ingredient = %s.ingredient,
                        missing = s.missing,
                        "Stock shortfall"
                    );
                }
                let names: Vec<&str> =
                    shortfalls.iter().map(|s| s.ingredient.as_str()).collect();
                warnings.push(format!("stock insuficiente de {}", names.join(", ")));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    order_id = %order_id,
                    error = %e,
                    "Order saved but stock not updated"
                );
                warnings.push("no se actualizó el inventario".to_string());
            }
        }

        self.cart.set(None);
        self.customer.set(None);
        self.status.busy.set(false);

        let message = format!("¡Pedido {} finalizado y guardado con éxito!", order_id);
        if warnings.is_empty() {
            self.status.info(message);
        } else {
            self.status
                .error(format!("{} Aviso: {}.", message, warnings.join("; ")));
        }
        Some(order_id)
    }

    pub fn spawn_finalize(self: &Arc<Self>) -> JoinHandle<Option<String>> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.finalize().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_usage_scales_by_quantity() {
        let mut burger = Plate::new("Hamburguesa", 15000.0)
            .with_ingredient("pan", 1.0)
            .with_ingredient("carne", 0.2);
        burger.id = "p-1".into();
        let mut soup = Plate::new("Sopa", 8000.0).with_ingredient("carne", 0.1);
        soup.id = "p-2".into();

        let mut order = Order::new("c-1", "Ana");
        order.add_plate(&burger, 3).unwrap();
        order.add_plate(&soup, 2).unwrap();
        order.add_item("p-9", "Fuera de carta", 1000.0, 1).unwrap();

        let usage = ingredient_usage(&order, &[burger, soup]);
        assert_eq!(usage.get("pan"), Some(&3.0));
        assert!((usage["carne"] - 0.8).abs() < 1e-9);
        assert_eq!(usage.len(), 2);
    }
}
