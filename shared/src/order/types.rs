//! Persisted order shapes
//!
//! `OrderRecord` is the one normalized shape every order document is decoded
//! into at the store boundary. Reporting and history only ever see this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 100_000_000.0;

/// One line of an order: plate reference plus name/price snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "plato_id", default)]
    pub plate_id: String,
    /// Plate name at the time of ordering
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// Plate price at the time of ordering
    #[serde(rename = "precio_unitario", default)]
    pub unit_price: f64,
    #[serde(rename = "cantidad", default)]
    pub quantity: i32,
}

/// Stored order document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Document id
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "cliente_id", default)]
    pub customer_id: String,
    #[serde(rename = "cliente_nombre", default)]
    pub customer_name: String,
    #[serde(rename = "creado_en", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    /// Total as written at save time; readers recompute it from `items`
    #[serde(default)]
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reads_stored_document() {
        let json = serde_json::json!({
            "cliente_id": "c-1",
            "cliente_nombre": "Lucía",
            "creado_en": "2024-01-01T18:30:00Z",
            "items": [
                { "plato_id": "p-1", "nombre": "Sopa", "precio_unitario": 5000, "cantidad": 2 }
            ],
            "total": 10000
        });
        let record: OrderRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.customer_id, "c-1");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].unit_price, 5000.0);
        assert_eq!(record.items[0].quantity, 2);
        assert_eq!(record.created_at.to_rfc3339(), "2024-01-01T18:30:00+00:00");
    }

    #[test]
    fn test_record_accepts_fractional_seconds() {
        let json = serde_json::json!({ "creado_en": "2024-03-05T10:00:00.123456Z" });
        let record: OrderRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.created_at.date_naive().to_string(), "2024-03-05");
        assert!(record.items.is_empty());
    }
}
