//! Order taking end to end: start, stepper, finalize

mod common;

use std::sync::Arc;

use comanda_pos::viewmodels::{HistoryViewModel, OrdersViewModel};
use shared::Role;

#[tokio::test]
async fn test_finalize_saves_order_appends_history_and_clears_cart() {
    let state = common::state();
    common::add_employee(&state, "mesero@resto.co", Role::Server).await;
    common::login(&state, "mesero@resto.co").await;
    let (burger, lemonade) = common::seed_menu(&state).await;

    let vm = Arc::new(OrdersViewModel::new(&state));
    vm.spawn_load_menu().await.unwrap();
    assert_eq!(vm.menu.get().len(), 2);

    assert!(vm.start_order("ana@mail.co", "Ana").await);
    assert!(vm.add_plate(&burger.id, 2));
    assert!(vm.increment(&lemonade.id));
    assert!(vm.increment(&lemonade.id));
    assert!(vm.decrement(&lemonade.id));

    let cart = vm.cart.get().unwrap();
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.total(), 35000.0);

    let order_id = vm.spawn_finalize().await.unwrap().expect("order saved");

    // cart and customer cleared, success notice
    assert!(vm.cart.get().is_none());
    assert!(vm.customer.get().is_none());
    let notice = vm.status.notice.get().unwrap();
    assert!(!notice.is_error(), "{:?}", notice);
    assert!(notice.text().contains(&order_id));

    // order persisted with the same lines
    let saved = state.orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(saved.total(), 35000.0);
    assert_eq!(saved.customer_name(), "Ana");

    // history appended
    let customer = state.customers.find_by_email("ana@mail.co").await.unwrap().unwrap();
    assert_eq!(customer.order_ids, vec![order_id.clone()]);

    // 2 burgers and 1 lemonade drew their ingredients
    let stock = state.inventory.find_all().await.unwrap();
    let qty = |name: &str| stock.iter().find(|i| i.name == name).unwrap().quantity;
    assert_eq!(qty("pan"), 8.0);
    assert!((qty("carne") - 1.6).abs() < 1e-9);
    assert!((qty("limón") - 0.9).abs() < 1e-9);

    let history = HistoryViewModel::new(&state);
    history.load().await;
    assert_eq!(history.orders_list.get().len(), 1);
}

#[tokio::test]
async fn test_stock_shortfall_still_saves_order() {
    let state = common::state();
    common::add_employee(&state, "mesero@resto.co", Role::Server).await;
    common::login(&state, "mesero@resto.co").await;
    let (burger, _) = common::seed_menu(&state).await;

    let vm = OrdersViewModel::new(&state);
    vm.load_menu().await;
    vm.start_order("ana@mail.co", "Ana").await;
    vm.add_plate(&burger.id, 12);

    let order_id = vm.finalize().await.unwrap();
    assert!(state.orders.find_by_id(&order_id).await.unwrap().is_some());
    assert!(vm.cart.get().is_none());

    let notice = vm.status.notice.get().unwrap();
    assert!(notice.is_error());
    // carne and pan both ran short
    assert!(notice.text().contains("stock insuficiente de carne, pan"));

    let stock = state.inventory.find_all().await.unwrap();
    let pan = stock.into_iter().find(|i| i.name == "pan").unwrap();
    assert_eq!(pan.quantity, 0.0);
}

#[tokio::test]
async fn test_stepper_to_zero_removes_line() {
    let state = common::state();
    let (burger, _) = common::seed_menu(&state).await;
    let vm = OrdersViewModel::new(&state);
    vm.load_menu().await;
    vm.start_order("luis@mail.co", "Luis").await;

    assert!(vm.increment(&burger.id));
    assert!(vm.decrement(&burger.id));
    assert_eq!(vm.quantity_of(&burger.id), 0);
    assert!(vm.cart.get().unwrap().is_empty());

    // re-adding starts a fresh line
    assert!(vm.add_plate(&burger.id, 1));
    assert_eq!(vm.quantity_of(&burger.id), 1);
}

#[tokio::test]
async fn test_invalid_quantity_leaves_cart_untouched() {
    let state = common::state();
    let (burger, _) = common::seed_menu(&state).await;
    let vm = OrdersViewModel::new(&state);
    vm.load_menu().await;
    vm.start_order("luis@mail.co", "Luis").await;
    vm.add_plate(&burger.id, 1);

    assert!(!vm.add_plate(&burger.id, 0));
    assert!(vm.status.notice.get().unwrap().is_error());
    assert_eq!(vm.quantity_of(&burger.id), 1);
    assert_eq!(vm.cart.get().unwrap().total(), 15000.0);
}

#[tokio::test]
async fn test_add_without_started_order_is_rejected() {
    let state = common::state();
    let (burger, _) = common::seed_menu(&state).await;
    let vm = OrdersViewModel::new(&state);
    vm.load_menu().await;

    assert!(!vm.add_plate(&burger.id, 1));
    assert!(vm.cart.get().is_none());
    assert!(vm.status.notice.get().unwrap().is_error());
}

#[tokio::test]
async fn test_finalize_requires_login_and_items() {
    let state = common::state();
    common::seed_menu(&state).await;
    let vm = OrdersViewModel::new(&state);
    vm.start_order("ana@mail.co", "Ana").await;

    // not logged in
    assert!(vm.finalize().await.is_none());
    assert!(vm.status.notice.get().unwrap().is_error());

    // logged in but the cart is empty
    common::add_employee(&state, "mesero@resto.co", Role::Server).await;
    common::login(&state, "mesero@resto.co").await;
    assert!(vm.finalize().await.is_none());
    assert!(vm.cart.get().is_some());
    assert!(state.orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_start_order_requires_email_and_name() {
    let state = common::state();
    let vm = OrdersViewModel::new(&state);
    assert!(!vm.start_order("", "Ana").await);
    assert!(vm.cart.get().is_none());
    assert!(state.customers.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_finalize_while_saving_is_rejected() {
    let state = common::state_on(Arc::new(common::YieldingStore::default()));
    common::add_employee(&state, "mesero@resto.co", Role::Server).await;
    common::login(&state, "mesero@resto.co").await;
    let (burger, _) = common::seed_menu(&state).await;

    let vm = Arc::new(OrdersViewModel::new(&state));
    vm.load_menu().await;
    vm.start_order("ana@mail.co", "Ana").await;
    vm.add_plate(&burger.id, 1);

    // second press lands while the first save is still waiting on the store
    let first = vm.spawn_finalize();
    tokio::task::yield_now().await;
    assert!(vm.finalizing.get());
    assert!(!vm.increment(&burger.id));
    let second = vm.spawn_finalize();
    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().flatten().count(), 1);
    assert!(!vm.finalizing.get());

    assert_eq!(state.orders.find_all().await.unwrap().len(), 1);
    let customer = state.customers.find_by_email("ana@mail.co").await.unwrap().unwrap();
    assert_eq!(customer.order_ids.len(), 1);
    let stock = state.inventory.find_all().await.unwrap();
    let pan = stock.iter().find(|i| i.name == "pan").unwrap();
    assert_eq!(pan.quantity, 9.0);
}
