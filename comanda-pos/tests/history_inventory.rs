//! History and inventory screens

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use comanda_pos::advisory::AdvisoryService;
use comanda_pos::viewmodels::{HistoryViewModel, InventoryViewModel, Notice};
use parking_lot::Mutex;
use shared::Order;

async fn save_order(state: &comanda_pos::AppState, name: &str, hour: u32) -> String {
    let mut order = Order::new(format!("c-{}", name), name)
        .with_created_at(Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap());
    order.add_item("p-1", "Sopa", 8000.0, 1).unwrap();
    state.orders.save(&mut order).await.unwrap()
}

#[tokio::test]
async fn test_history_is_newest_first_and_delete_reloads() {
    let state = common::state();
    let older = save_order(&state, "Ana", 9).await;
    let newer = save_order(&state, "Luis", 13).await;

    let vm = Arc::new(HistoryViewModel::new(&state));
    vm.spawn_load().await.unwrap();
    let ids: Vec<_> = vm
        .orders_list
        .get()
        .iter()
        .map(|o| o.id().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![newer.clone(), older.clone()]);

    vm.select(0);
    assert_eq!(vm.selected_order().unwrap().customer_name(), "Luis");

    assert!(vm.spawn_delete_selected().await.unwrap());
    assert_eq!(
        vm.status.notice.get(),
        Some(Notice::Info(format!("Pedido {} eliminado con éxito.", newer)))
    );
    assert_eq!(vm.orders_list.get().len(), 1);
    assert!(vm.selected.get().is_none());
    assert!(state.orders.find_by_id(&newer).await.unwrap().is_none());
}

#[tokio::test]
async fn test_back_to_back_deletes_remove_one_order() {
    let state = common::state_on(Arc::new(common::YieldingStore::default()));
    save_order(&state, "Ana", 9).await;
    save_order(&state, "Luis", 13).await;
    let vm = Arc::new(HistoryViewModel::new(&state));
    vm.load().await;
    vm.select(0);

    let first = vm.spawn_delete_selected();
    let second = vm.spawn_delete_selected();
    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|deleted| **deleted).count(), 1);

    let left = state.orders.find_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].customer_name(), "Ana");
}

#[tokio::test]
async fn test_delete_without_selection_is_rejected() {
    let state = common::state();
    save_order(&state, "Ana", 9).await;
    let vm = HistoryViewModel::new(&state);
    vm.load().await;

    vm.select(5);
    assert!(vm.selected.get().is_none());
    assert!(!vm.delete_selected().await);
    assert!(vm.status.notice.get().unwrap().is_error());
    assert_eq!(state.orders.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_notice_subscribers_see_every_message() {
    let state = common::state();
    let vm = HistoryViewModel::new(&state);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = vm.status.notice.subscribe(move |notice| {
        if let Some(notice) = notice {
            sink.lock().push(notice.text().to_string());
        }
    });

    vm.delete_selected().await;
    assert_eq!(
        seen.lock().as_slice(),
        ["Por favor, seleccione un pedido para eliminar."]
    );
}

#[tokio::test]
async fn test_inventory_create_adjust_and_low_stock() {
    let state = common::state();
    common::seed_menu(&state).await;
    let vm = Arc::new(InventoryViewModel::new(&state));
    vm.spawn_load().await.unwrap();
    assert_eq!(vm.items.get().len(), 3);

    let mut low: Vec<_> = vm.low_stock().into_iter().map(|i| i.name).collect();
    low.sort();
    assert_eq!(low, vec!["carne", "limón"]);

    assert!(vm.create_item("Arroz", 25.0, "kg").await);
    assert_eq!(vm.status.notice.get().unwrap().text(), "Ítem 'Arroz' creado con éxito.");
    assert_eq!(vm.items.get().len(), 4);

    let carne = vm.items.get().into_iter().find(|i| i.name == "carne").unwrap();
    assert!(vm.spawn_adjust(carne.id.clone(), 10.0).await.unwrap());
    assert!(vm.low_stock().iter().all(|i| i.name != "carne"));

    // would go negative: rejected, stock untouched
    assert!(!vm.adjust(&carne.id, -50.0).await);
    assert!(vm.status.notice.get().unwrap().is_error());
    let stored = state.inventory.find_by_id(&carne.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 12.0);
}

#[tokio::test]
async fn test_concurrent_adjusts_are_both_applied() {
    let state = common::state_on(Arc::new(common::YieldingStore::default()));
    common::seed_menu(&state).await;
    let vm = Arc::new(InventoryViewModel::new(&state));
    vm.load().await;
    let carne = vm.items.get().into_iter().find(|i| i.name == "carne").unwrap();

    let first = vm.spawn_adjust(carne.id.clone(), 1.0);
    let second = vm.spawn_adjust(carne.id.clone(), 2.0);
    assert!(first.await.unwrap());
    assert!(second.await.unwrap());

    let stored = state.inventory.find_by_id(&carne.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 5.0);
}

#[tokio::test]
async fn test_inventory_rejects_blank_name() {
    let state = common::state();
    let vm = InventoryViewModel::new(&state);
    assert!(!vm.create_item("  ", 3.0, "kg").await);
    assert!(state.inventory.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shopping_list_uses_loaded_items() {
    let model = common::ScriptedModel::replying("1. carne\n2. limón");
    let state = common::state_with(common::config(&[]), AdvisoryService::new(model.clone()));
    common::seed_menu(&state).await;
    let vm = Arc::new(InventoryViewModel::new(&state));
    vm.load().await;

    vm.spawn_shopping_list().await.unwrap();
    assert_eq!(vm.advice.get(), "1. carne\n2. limón");
    assert!(model.prompts.lock()[0].contains("- carne: 2 kg"));
}
