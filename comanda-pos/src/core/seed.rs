//! Demo data for the in-memory backend

use shared::{AppResult, Employee, InventoryItem, Plate, Role};

use crate::auth::LocalIdentity;
use crate::db::repository::{EmployeeRepository, InventoryRepository, PlateRepository};

pub const DEMO_MANAGER: (&str, &str, &str) = ("uid-gerente", "gerente@comanda.local", "gerente123");
pub const DEMO_SERVER: (&str, &str, &str) = ("uid-mesero", "mesero@comanda.local", "mesero123");

/// Accounts matching the seeded employee records
pub fn demo_identity() -> LocalIdentity {
    LocalIdentity::new()
        .with_account(DEMO_MANAGER.0, DEMO_MANAGER.1, DEMO_MANAGER.2)
        .with_account(DEMO_SERVER.0, DEMO_SERVER.1, DEMO_SERVER.2)
}

pub async fn seed_demo(
    plates: &PlateRepository,
    inventory: &InventoryRepository,
    employees: &EmployeeRepository,
) -> AppResult<()> {
    let menu = [
        Plate::new("Hamburguesa", 15000.0)
            .with_description("Carne de res, queso y pan artesanal")
            .with_ingredient("pan", 1.0)
            .with_ingredient("carne", 0.2)
            .with_ingredient("queso", 0.05),
        Plate::new("Ensalada César", 12000.0)
            .with_ingredient("lechuga", 0.15)
            .with_ingredient("pollo", 0.1),
        Plate::new("Sopa del día", 8000.0).with_ingredient("verduras", 0.3),
        Plate::new("Limonada", 5000.0).with_ingredient("limón", 0.1),
    ];
    for plate in menu {
        plates.create(plate).await?;
    }

    let stock = [
        ("pan", 40.0, "unidades"),
        ("carne", 8.0, "kg"),
        ("queso", 3.0, "kg"),
        ("lechuga", 5.0, "kg"),
        ("pollo", 6.0, "kg"),
        ("verduras", 12.0, "kg"),
        ("limón", 4.0, "kg"),
    ];
    for (name, quantity, unit) in stock {
        inventory.create(InventoryItem::new(name, quantity, unit)?).await?;
    }

    employees
        .upsert(&Employee::new(DEMO_MANAGER.0, DEMO_MANAGER.1, Role::Manager))
        .await?;
    employees
        .upsert(&Employee::new(DEMO_SERVER.0, DEMO_SERVER.1, Role::Server))
        .await?;

    tracing::info!("Demo data seeded");
    Ok(())
}
