//! Finance screen
//!
//! KPIs, trailing daily trend and best sellers over the full order history,
//! plus the advisory requests. Every request re-reads the orders, so a
//! slow answer that arrives late simply overwrites the previous one.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use shared::{AppError, AppResult, DailyRevenue, InventoryItem, ProductSales, SalesReport};
use tokio::task::JoinHandle;

use super::ViewStatus;
use crate::advisory::{AdvisoryService, Suggestion};
use crate::core::AppState;
use crate::db::repository::{InventoryRepository, OrderRepository};
use crate::state::Observable;

/// Name used when the promotion answer has no `name|` part
pub const DEFAULT_PROMOTION_NAME: &str = "Promoción del día";

pub struct FinanceViewModel {
    orders: OrderRepository,
    inventory: InventoryRepository,
    advisory: AdvisoryService,
    trend_days: u32,
    top_n: usize,
    pub status: ViewStatus,
    pub report: Observable<Option<SalesReport>>,
    pub trend: Observable<Vec<DailyRevenue>>,
    pub top_products: Observable<Vec<ProductSales>>,
    /// Last free-text answer from the advisory model
    pub answer: Observable<String>,
    pub promotion: Observable<Option<Suggestion>>,
}

impl FinanceViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.orders.clone(),
            inventory: state.inventory.clone(),
            advisory: state.advisory.clone(),
            trend_days: state.config.report_trend_days,
            top_n: state.config.report_top_n,
            status: ViewStatus::default(),
            report: Observable::default(),
            trend: Observable::default(),
            top_products: Observable::default(),
            answer: Observable::new("Esperando consulta...".to_string()),
            promotion: Observable::default(),
        }
    }

    async fn fetch_report(&self) -> AppResult<SalesReport> {
        let orders = self.orders.find_all().await?;
        Ok(SalesReport::from_orders(&orders))
    }

    pub async fn generate_report(&self) {
        self.generate_report_as_of(Utc::now().date_naive()).await
    }

    /// Build the report with the trend window ending on `as_of`
    pub async fn generate_report_as_of(&self, as_of: NaiveDate) {
        self.status.info("Calculando reporte financiero...");
        let Some(report) = self
            .status
            .track("Error al generar el reporte", self.fetch_report())
            .await
        else {
            return;
        };

        tracing::debug!(
            orders = report.order_count,
            gross = report.gross_revenue,
            "Sales report computed"
        );
        self.trend.set(report.trend(as_of, self.trend_days));
        self.top_products.set(report.top_products(self.top_n));
        self.report.set(Some(report));
        self.status.info("Reporte financiero generado.");
    }

    pub fn spawn_report(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.generate_report().await })
    }

    /// Report for an advisory request; failures become the answer text
    async fn report_for_advice(&self) -> Option<SalesReport> {
        match self.fetch_report().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load orders for advisory");
                self.answer
                    .set(format!("Ocurrió un error en el análisis de IA: {}", e));
                self.status.error("Error en la consulta de IA.");
                None
            }
        }
    }

    fn begin_advice(&self) {
        self.status.info("Consultando a la IA...");
        self.answer.set("Procesando... por favor espere.".into());
    }

    fn finish_advice(&self, answer: String) {
        self.answer.set(answer);
        self.status.info("Consulta de IA finalizada.");
    }

    pub async fn best_seller_analysis(&self) {
        self.begin_advice();
        if let Some(report) = self.report_for_advice().await {
            let answer = self.advisory.best_seller_analysis(&report).await;
            self.finish_advice(answer);
        }
    }

    pub async fn sales_recommendation(&self) {
        self.begin_advice();
        if let Some(report) = self.report_for_advice().await {
            let answer = self.advisory.sales_recommendation(&report).await;
            self.finish_advice(answer);
        }
    }

    pub async fn suggest_promotion(&self) {
        self.begin_advice();
        if let Some(report) = self.report_for_advice().await {
            let suggestion = self
                .advisory
                .promotion(&report, DEFAULT_PROMOTION_NAME)
                .await;
            let text = format!("{}: {}", suggestion.name, suggestion.message);
            self.promotion.set(Some(suggestion));
            self.finish_advice(text);
        }
    }

    /// Free-form question with sales and inventory as context
    pub async fn ask(&self, question: &str) {
        self.begin_advice();
        let Some(report) = self.report_for_advice().await else {
            return;
        };
        let items: Vec<InventoryItem> = match self.inventory.find_all().await {
            Ok(items) => items,
            Err(e) => {
                let e = AppError::from(e);
                tracing::warn!(error = %e, "Inventory unavailable, asking without it");
                Vec::new()
            }
        };
        let answer = self.advisory.ask(question, &report, &items).await;
        self.finish_advice(answer);
    }

    pub fn spawn_ask(self: &Arc<Self>, question: String) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.ask(&question).await })
    }

    pub fn spawn_best_sellers(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.best_seller_analysis().await })
    }

    pub fn spawn_recommendation(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.sales_recommendation().await })
    }

    pub fn spawn_promotion(self: &Arc<Self>) -> JoinHandle<()> {
        let vm = Arc::clone(self);
        tokio::spawn(async move { vm.suggest_promotion().await })
    }
}
