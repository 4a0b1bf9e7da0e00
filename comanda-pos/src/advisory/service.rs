//! Advisory service
//!
//! Formats aggregated business data into prompts and returns the model's
//! text. Failures never propagate: the caller always gets a string.

use std::sync::Arc;

use shared::{InventoryItem, SalesReport, sales_summary_text};

use super::model::LanguageModel;
use super::prompts;

/// Shown when no model is configured
pub const SERVICE_UNAVAILABLE: &str = "El servicio de IA no está disponible.";
/// Shown when the model call fails
pub const SERVICE_ERROR: &str = "No fue posible obtener una respuesta del servicio de IA.";
pub const NO_ORDERS: &str = "No hay pedidos para analizar.";
pub const NO_INVENTORY: &str = "No hay items en el inventario.";
pub const EMPTY_QUESTION: &str = "Escriba una pregunta.";

/// A `name|message` answer
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub message: String,
}

/// Split on the first `|`; without one the whole text is the message
pub fn parse_name_message(response: &str, default_name: &str) -> Suggestion {
    match response.split_once('|') {
        Some((name, message)) => Suggestion {
            name: name.trim().to_string(),
            message: message.trim().to_string(),
        },
        None => Suggestion {
            name: default_name.to_string(),
            message: response.trim().to_string(),
        },
    }
}

#[derive(Clone, Default)]
pub struct AdvisoryService {
    model: Option<Arc<dyn LanguageModel>>,
}

impl AdvisoryService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Every call answers `SERVICE_UNAVAILABLE`
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    async fn complete(&self, prompt: &str) -> String {
        let Some(model) = &self.model else {
            return SERVICE_UNAVAILABLE.to_string();
        };
        match model.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Language model call failed");
                SERVICE_ERROR.to_string()
            }
        }
    }

    /// Most and least sold plates with a short recommendation
    pub async fn best_seller_analysis(&self, report: &SalesReport) -> String {
        if report.products.is_empty() {
            return NO_ORDERS.to_string();
        }
        self.complete(&prompts::best_sellers(&sales_summary_text(report)))
            .await
    }

    /// Strategy to raise sales, anchored on the best and worst sellers
    pub async fn sales_recommendation(&self, report: &SalesReport) -> String {
        let best = report.top_products(1).into_iter().next();
        let (Some(best), Some(worst)) = (best, report.least_sold()) else {
            return NO_ORDERS.to_string();
        };
        let prompt = prompts::sales_strategy(&best.name, &worst.name, &sales_summary_text(report));
        self.complete(&prompt).await
    }

    /// Prioritized shopping list for low stock
    pub async fn low_inventory(&self, items: &[InventoryItem]) -> String {
        if items.is_empty() {
            return NO_INVENTORY.to_string();
        }
        self.complete(&prompts::low_inventory(&prompts::inventory_text(items)))
            .await
    }

    /// Free-form question answered from sales and inventory context
    pub async fn ask(
        &self,
        question: &str,
        report: &SalesReport,
        items: &[InventoryItem],
    ) -> String {
        let question = question.trim();
        if question.is_empty() {
            return EMPTY_QUESTION.to_string();
        }
        let prompt = prompts::question(
            question,
            &sales_summary_text(report),
            &prompts::inventory_text(items),
        );
        self.complete(&prompt).await
    }

    /// Plate to promote plus a customer-facing message
    ///
    /// `default_name` is used when the model ignores the format.
    pub async fn promotion(&self, report: &SalesReport, default_name: &str) -> Suggestion {
        if report.products.is_empty() {
            return Suggestion {
                name: default_name.to_string(),
                message: NO_ORDERS.to_string(),
            };
        }
        let response = self
            .complete(&prompts::promotion(&sales_summary_text(report)))
            .await;
        parse_name_message(&response, default_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::{AppError, AppResult, Order};

    struct Scripted {
        reply: AppResult<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for Scripted {
        async fn generate(&self, prompt: &str) -> AppResult<String> {
            self.prompts.lock().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn report() -> SalesReport {
        let mut a = Order::new("c-1", "Ana");
        a.add_item("p-1", "Hamburguesa", 15000.0, 3).unwrap();
        let mut b = Order::new("c-2", "Luis");
        b.add_item("p-2", "Ensalada", 12000.0, 1).unwrap();
        SalesReport::from_orders(&[a, b])
    }

    #[test]
    fn test_parse_name_message() {
        assert_eq!(
            parse_name_message("Hamburguesa|¡Pídela ya!", "Especial"),
            Suggestion {
                name: "Hamburguesa".into(),
                message: "¡Pídela ya!".into()
            }
        );
        assert_eq!(
            parse_name_message("no delimiter text", "Especial"),
            Suggestion {
                name: "Especial".into(),
                message: "no delimiter text".into()
            }
        );
        // only the first delimiter splits
        assert_eq!(parse_name_message("A|b|c", "X").message, "b|c");
    }

    #[tokio::test]
    async fn test_disabled_service_returns_fallback() {
        let service = AdvisoryService::disabled();
        assert!(!service.is_enabled());
        assert_eq!(service.best_seller_analysis(&report()).await, SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_model_failure_degrades() {
        let model = Arc::new(Scripted {
            reply: Err(AppError::advisory("503")),
            prompts: Mutex::new(Vec::new()),
        });
        let service = AdvisoryService::new(model);
        assert_eq!(service.sales_recommendation(&report()).await, SERVICE_ERROR);
    }

    #[tokio::test]
    async fn test_prompts_carry_aggregates() {
        let model = Scripted::ok("Hamburguesa|¡Pídela ya!");
        let service = AdvisoryService::new(model.clone());

        let suggestion = service.promotion(&report(), "Especial").await;
        assert_eq!(suggestion.name, "Hamburguesa");

        service.sales_recommendation(&report()).await;
        let prompts = model.prompts.lock();
        assert!(prompts[0].contains("- Hamburguesa: 3 vendidos"));
        assert!(prompts[1].contains("El plato más vendido es 'Hamburguesa'"));
        assert!(prompts[1].contains("El plato menos vendido es 'Ensalada'"));
    }

    #[tokio::test]
    async fn test_empty_inputs_skip_the_model() {
        let model = Scripted::ok("unused");
        let service = AdvisoryService::new(model.clone());
        let empty = SalesReport::default();

        assert_eq!(service.best_seller_analysis(&empty).await, NO_ORDERS);
        assert_eq!(service.low_inventory(&[]).await, NO_INVENTORY);
        assert_eq!(service.ask("   ", &empty, &[]).await, EMPTY_QUESTION);
        assert!(model.prompts.lock().is_empty());
    }
}
