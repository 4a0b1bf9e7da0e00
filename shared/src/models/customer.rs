//! Customer Model

use serde::{Deserialize, Serialize};

use super::default_name;

/// Customer with its order history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "nombre", default = "default_name")]
    pub name: String,
    #[serde(default = "default_name")]
    pub email: String,
    /// Order ids, append-only
    #[serde(rename = "historial_pedidos", default)]
    pub order_ids: Vec<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
            order_ids: Vec::new(),
        }
    }

    /// Record an order in the history; returns false if it was already there
    pub fn record_order(&mut self, order_id: &str) -> bool {
        if self.order_ids.iter().any(|id| id == order_id) {
            return false;
        }
        self.order_ids.push(order_id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_order_is_append_only_and_unique() {
        let mut customer = Customer::new("Lucía", "lucia@mail.com");
        assert!(customer.record_order("o-1"));
        assert!(customer.record_order("o-2"));
        assert!(!customer.record_order("o-1"));
        assert_eq!(customer.order_ids, vec!["o-1", "o-2"]);
    }

    #[test]
    fn test_customer_stored_fields() {
        let json = serde_json::json!({
            "nombre": "Lucía",
            "email": "lucia@mail.com",
            "historial_pedidos": ["o-1"]
        });
        let customer: Customer = serde_json::from_value(json).unwrap();
        assert_eq!(customer.order_ids, vec!["o-1"]);
    }
}
