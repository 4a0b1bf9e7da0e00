//! Inventory Model

use serde::{Deserialize, Serialize};

use super::default_name;
use crate::error::{AppError, AppResult, ErrorCode};

/// Stock item
///
/// `quantity` never goes below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "nombre", default = "default_name")]
    pub name: String,
    #[serde(rename = "cantidad", default)]
    pub quantity: f64,
    /// "kg", "litros", "unidades"
    #[serde(rename = "unidad", default = "default_name")]
    pub unit: String,
}

fn validate_quantity(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{} must be a finite number, got {}", field, value),
        ));
    }
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InsufficientStock,
            format!("{} must be non-negative, got {}", field, value),
        ));
    }
    Ok(())
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> AppResult<Self> {
        validate_quantity(quantity, "quantity")?;
        Ok(Self {
            id: String::new(),
            name: name.into(),
            quantity,
            unit: unit.into(),
        })
    }

    /// Replace the stock level
    pub fn set_quantity(&mut self, quantity: f64) -> AppResult<()> {
        validate_quantity(quantity, "quantity")?;
        self.quantity = quantity;
        Ok(())
    }

    /// Add (or with a negative delta, remove) stock; rejected if the result is negative
    pub fn adjust(&mut self, delta: f64) -> AppResult<f64> {
        if !delta.is_finite() {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("delta must be a finite number, got {}", delta),
            ));
        }
        let next = self.quantity + delta;
        if next < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "cannot remove {} {} of '{}', only {} left",
                    -delta, self.unit, self.name, self.quantity
                ),
            ));
        }
        self.quantity = next;
        Ok(next)
    }

    /// Remove up to `amount`, saturating at zero. Returns the shortfall.
    pub fn consume(&mut self, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        if amount > self.quantity {
            let shortfall = amount - self.quantity;
            self.quantity = 0.0;
            shortfall
        } else {
            self.quantity -= amount;
            0.0
        }
    }

    /// Below the threshold used by the low-stock advisory
    pub fn is_low(&self, threshold: f64) -> bool {
        self.quantity < threshold
    }
}
