//! Finance screen: report, trend and advisory

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use comanda_pos::AppState;
use comanda_pos::advisory::AdvisoryService;
use comanda_pos::advisory::service::{NO_ORDERS, SERVICE_ERROR, SERVICE_UNAVAILABLE};
use comanda_pos::viewmodels::FinanceViewModel;
use shared::Order;

async fn save(state: &AppState, customer: &str, day: u32, items: &[(&str, &str, f64, i32)]) {
    let mut order = Order::new(format!("c-{}", customer), customer)
        .with_created_at(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap());
    for (id, name, price, qty) in items {
        order.add_item(*id, *name, *price, *qty).unwrap();
    }
    state.orders.save(&mut order).await.unwrap();
}

/// 15000 + 8000 on Jan 1st, 12000 on Jan 2nd
async fn seed_orders(state: &AppState) {
    save(state, "Ana", 1, &[("p-1", "Hamburguesa", 15000.0, 1)]).await;
    save(state, "Luis", 1, &[("p-2", "Sopa", 8000.0, 1)]).await;
    save(
        state,
        "Ana",
        2,
        &[("p-1", "Hamburguesa", 7000.0, 1), ("p-3", "Limonada", 5000.0, 1)],
    )
    .await;
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

#[tokio::test]
async fn test_report_kpis_and_trend() {
    let state = common::state();
    seed_orders(&state).await;
    let vm = FinanceViewModel::new(&state);

    vm.generate_report_as_of(jan(2)).await;

    let report = vm.report.get().unwrap();
    assert_eq!(report.order_count, 3);
    assert_eq!(report.gross_revenue, 35000.0);
    assert_eq!(report.average_order_value, 11666.67);
    assert_eq!(report.min_ticket, Some(8000.0));
    assert_eq!(report.max_ticket, Some(15000.0));
    assert_eq!(report.unique_customers, 2);

    let trend = vm.trend.get();
    assert_eq!(trend.len(), 2);
    assert_eq!((trend[0].date, trend[0].revenue), (jan(1), 23000.0));
    assert_eq!((trend[1].date, trend[1].revenue), (jan(2), 12000.0));

    let top = vm.top_products.get();
    assert_eq!(top[0].name, "Hamburguesa");
    assert_eq!(top[0].quantity, 2);
    assert_eq!(vm.status.notice.get().unwrap().text(), "Reporte financiero generado.");
}

#[tokio::test]
async fn test_trend_window_is_trailing() {
    let state = common::state_with(
        common::config(&[("REPORT_TREND_DAYS", "1")]),
        AdvisoryService::disabled(),
    );
    seed_orders(&state).await;
    let vm = FinanceViewModel::new(&state);

    vm.generate_report_as_of(jan(2)).await;
    let trend = vm.trend.get();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].date, jan(2));
}

#[tokio::test]
async fn test_empty_history_reports_zero() {
    let state = common::state();
    let vm = Arc::new(FinanceViewModel::new(&state));
    vm.spawn_report().await.unwrap();

    let report = vm.report.get().unwrap();
    assert_eq!(report.order_count, 0);
    assert_eq!(report.average_order_value, 0.0);
    assert!(vm.trend.get().is_empty());
}

#[tokio::test]
async fn test_promotion_parses_name_and_message() {
    let model = common::ScriptedModel::replying("Hamburguesa|¡Pídela ya!");
    let state = common::state_with(common::config(&[]), AdvisoryService::new(model.clone()));
    seed_orders(&state).await;
    let vm = Arc::new(FinanceViewModel::new(&state));

    vm.spawn_promotion().await.unwrap();
    let promotion = vm.promotion.get().unwrap();
    assert_eq!(promotion.name, "Hamburguesa");
    assert_eq!(promotion.message, "¡Pídela ya!");
    assert!(model.prompts.lock()[0].contains("- Hamburguesa: 2 vendidos"));
}

#[tokio::test]
async fn test_ask_sends_sales_and_inventory() {
    let model = common::ScriptedModel::replying("Compre más pan.");
    let state = common::state_with(common::config(&[]), AdvisoryService::new(model.clone()));
    seed_orders(&state).await;
    common::seed_menu(&state).await;
    let vm = Arc::new(FinanceViewModel::new(&state));

    vm.spawn_ask("¿Qué debo comprar?".into()).await.unwrap();
    assert_eq!(vm.answer.get(), "Compre más pan.");

    let prompts = model.prompts.lock();
    assert!(prompts[0].contains("- Sopa: 1 vendidos"));
    assert!(prompts[0].contains("- pan: 10 unidades"));
    assert!(prompts[0].contains("'¿Qué debo comprar?'"));
}

#[tokio::test]
async fn test_advisory_failures_degrade_to_text() {
    let state = common::state_with(
        common::config(&[]),
        AdvisoryService::new(common::ScriptedModel::failing()),
    );
    seed_orders(&state).await;
    let vm = FinanceViewModel::new(&state);
    vm.sales_recommendation().await;
    assert_eq!(vm.answer.get(), SERVICE_ERROR);

    let disabled = FinanceViewModel::new(&common::state());
    disabled.best_seller_analysis().await;
    assert_eq!(disabled.answer.get(), NO_ORDERS);

    let state = common::state();
    seed_orders(&state).await;
    let disabled = FinanceViewModel::new(&state);
    disabled.best_seller_analysis().await;
    assert_eq!(disabled.answer.get(), SERVICE_UNAVAILABLE);
    assert!(!disabled.status.notice.get().unwrap().is_error());
}
