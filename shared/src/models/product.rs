//! Plate Model (menu item)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::default_name;

/// Menu plate
///
/// Edited only through a full replace of the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    /// Document id (not part of the stored fields)
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "nombre", default = "default_name")]
    pub name: String,
    /// Price in currency unit
    #[serde(rename = "precio", default)]
    pub price: f64,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    /// Inventory consumed per unit sold, keyed by inventory item name
    #[serde(rename = "insumos", default)]
    pub ingredients: BTreeMap<String, f64>,
}

impl Plate {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            price,
            description: String::new(),
            ingredients: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ingredient(mut self, name: impl Into<String>, quantity: f64) -> Self {
        self.ingredients.insert(name.into(), quantity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_reads_stored_fields() {
        let json = serde_json::json!({
            "nombre": "Hamburguesa",
            "precio": 12500.0,
            "insumos": { "pan": 1.0, "carne": 0.2 }
        });
        let plate: Plate = serde_json::from_value(json).unwrap();
        assert_eq!(plate.name, "Hamburguesa");
        assert_eq!(plate.price, 12500.0);
        assert_eq!(plate.description, "");
        assert_eq!(plate.ingredients.get("carne"), Some(&0.2));
        assert!(plate.id.is_empty());
    }

    #[test]
    fn test_plate_defaults_for_missing_fields() {
        let plate: Plate = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(plate.name, "N/A");
        assert_eq!(plate.price, 0.0);
        assert!(plate.ingredients.is_empty());
    }

    #[test]
    fn test_plate_id_not_serialized() {
        let mut plate = Plate::new("Sopa", 5000.0).with_description("del día");
        plate.id = "p-1".to_string();
        let json = serde_json::to_value(&plate).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["descripcion"], "del día");
    }
}
