//! Prompt templates
//!
//! Every template takes pre-aggregated text, never raw documents.

use shared::InventoryItem;

/// Stock below this is "low" in the shopping-list prompt
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

/// `- <name>: <qty> <unit>` per item
pub fn inventory_text(items: &[InventoryItem]) -> String {
    items
        .iter()
        .map(|i| format!("- {}: {} {}", i.name, i.quantity, i.unit))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn best_sellers(sales: &str) -> String {
    format!(
        "Eres un analista de negocios de restaurante.\n\
         Basado en el siguiente conteo de platos vendidos:\n\
         {sales}\n\n\
         Por favor, responde:\n\
         1. ¿Cuál es el plato más vendido?\n\
         2. ¿Cuál es el plato menos vendido?\n\
         3. Dame una recomendación corta basada en esta información."
    )
}

pub fn sales_strategy(best: &str, worst: &str, sales: &str) -> String {
    format!(
        "Eres un estratega de marketing y ventas para un restaurante.\n\
         El plato más vendido es '{best}'.\n\
         El plato menos vendido es '{worst}'.\n\
         Los datos completos de ventas son:\n\
         {sales}\n\n\
         Tu objetivo es generar una estrategia simple y práctica para aumentar las ventas totales del restaurante.\n\
         1. Propón una promoción creativa que use el plato más vendido como gancho.\n\
         2. Sugiere una acción para impulsar el plato menos vendido (ej. un bundle o un cambio de nombre).\n\
         3. Da una idea para mejorar la experiencia del cliente que impulse la repetición de compra."
    )
}

pub fn low_inventory(inventory: &str) -> String {
    format!(
        "Eres un gerente de inventario.\n\
         Revisa la siguiente lista de inventario:\n\
         {inventory}\n\n\
         Por favor, identifica los items que están bajos (ej. menos de {LOW_STOCK_THRESHOLD} unidades/kg).\n\
         Dame una lista de compras priorizada."
    )
}

pub fn question(question: &str, sales: &str, inventory: &str) -> String {
    let sales = if sales.is_empty() {
        "No hay datos de ventas disponibles."
    } else {
        sales
    };
    let inventory = if inventory.is_empty() {
        "No hay datos de inventario disponibles."
    } else {
        inventory
    };
    format!(
        "Eres un asistente de análisis para un restaurante. Tienes acceso a los siguientes datos:\n\
         --- DATOS DE VENTAS ---\n\
         {sales}\n\
         --- DATOS DE INVENTARIO ---\n\
         {inventory}\n\
         --- FIN DE DATOS ---\n\n\
         Por favor, responde concisa y profesionalmente a la siguiente pregunta del usuario, \
         usando solo los datos proporcionados: '{question}'"
    )
}

/// Asks for exactly `PLATO|MENSAJE`
pub fn promotion(sales: &str) -> String {
    format!(
        "Eres el encargado de promociones de un restaurante.\n\
         Ventas por plato:\n\
         {sales}\n\n\
         Elige un plato para promocionar hoy y escribe un mensaje corto y llamativo para los clientes.\n\
         Responde únicamente con el formato: NOMBRE_DEL_PLATO|MENSAJE"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_text() {
        let items = vec![
            InventoryItem::new("arroz", 12.5, "kg").unwrap(),
            InventoryItem::new("huevos", 30.0, "unidades").unwrap(),
        ];
        assert_eq!(inventory_text(&items), "- arroz: 12.5 kg\n- huevos: 30 unidades");
    }

    #[test]
    fn test_question_fills_missing_context() {
        let prompt = question("¿Qué compro?", "", "");
        assert!(prompt.contains("No hay datos de ventas disponibles."));
        assert!(prompt.contains("No hay datos de inventario disponibles."));
        assert!(prompt.ends_with("'¿Qué compro?'"));
    }

    #[test]
    fn test_low_inventory_mentions_threshold() {
        assert!(low_inventory("- sal: 1 kg").contains("menos de 10 unidades/kg"));
    }
}
