//! Order aggregate
//!
//! In-memory cart for one customer visit. Lines are kept in insertion order,
//! one line per plate, every quantity > 0. The total is never stored on the
//! aggregate: `total()` always sums the current lines.
//!
//! Once an order has an id (it was saved) it is history and every mutation
//! fails with `OrderFinalized`.

use chrono::{DateTime, Utc};

use super::money::{lines_total, to_decimal, to_f64};
use super::types::{MAX_PRICE, MAX_QUANTITY, OrderLine, OrderRecord};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{Customer, Plate};

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: Option<String>,
    customer_id: String,
    customer_name: String,
    created_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity must be positive, got {}", quantity),
        ));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity exceeds maximum allowed value {}", MAX_QUANTITY),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("unit_price must be a finite number, got {}", price),
        ));
    }
    if price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("unit_price must be non-negative, got {}", price),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("unit_price exceeds maximum allowed value {}", MAX_PRICE),
        ));
    }
    Ok(())
}

impl Order {
    /// Start an empty order for a customer, stamped with the current time
    pub fn new(customer_id: impl Into<String>, customer_name: impl Into<String>) -> Self {
        Self {
            id: None,
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            created_at: Utc::now(),
            lines: Vec::new(),
        }
    }

    pub fn for_customer(customer: &Customer) -> Self {
        Self::new(customer.id.clone(), customer.name.clone())
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, plate_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.plate_id == plate_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ(unit_price × quantity), rounded to 2 decimals
    pub fn total(&self) -> f64 {
        to_f64(lines_total(&self.lines))
    }

    fn ensure_open(&self) -> AppResult<()> {
        match &self.id {
            Some(id) => Err(AppError::with_message(
                ErrorCode::OrderFinalized,
                format!("order {} is already saved", id),
            )
            .with_detail("order_id", id.as_str())),
            None => Ok(()),
        }
    }

    /// Add `quantity` units of a plate
    ///
    /// Merges into the existing line for the same plate (keeping that
    /// line's name and price snapshot), otherwise appends a new line.
    pub fn add_item(
        &mut self,
        plate_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: i32,
    ) -> AppResult<()> {
        self.ensure_open()?;
        validate_quantity(quantity)?;
        validate_price(unit_price)?;

        let plate_id = plate_id.into();
        if let Some(line) = self.lines.iter_mut().find(|l| l.plate_id == plate_id) {
            let merged = line.quantity.saturating_add(quantity);
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        self.lines.push(OrderLine {
            plate_id,
            name: name.into(),
            unit_price,
            quantity,
        });
        Ok(())
    }

    /// Add a catalog plate, snapshotting its current name and price
    pub fn add_plate(&mut self, plate: &Plate, quantity: i32) -> AppResult<()> {
        self.add_item(plate.id.clone(), plate.name.clone(), plate.price, quantity)
    }

    /// Set a line's quantity; zero or less removes the line
    pub fn set_item_quantity(&mut self, plate_id: &str, quantity: i32) -> AppResult<()> {
        self.ensure_open()?;
        let position = self.lines.iter().position(|l| l.plate_id == plate_id);

        if quantity <= 0 {
            if let Some(idx) = position {
                self.lines.remove(idx);
            }
            return Ok(());
        }

        validate_quantity(quantity)?;
        match position {
            Some(idx) => {
                self.lines[idx].quantity = quantity;
                Ok(())
            }
            None => Err(AppError::with_message(
                ErrorCode::ValidationFailed,
                format!("plate {} is not in the order", plate_id),
            )
            .with_detail("plate_id", plate_id)),
        }
    }

    /// Remove a line; returns whether it was present
    pub fn remove_item(&mut self, plate_id: &str) -> AppResult<bool> {
        self.ensure_open()?;
        let before = self.lines.len();
        self.lines.retain(|l| l.plate_id != plate_id);
        Ok(self.lines.len() != before)
    }

    /// Record the id assigned by the store; the order is frozen from here on
    pub fn mark_persisted(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id.clone().unwrap_or_default(),
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            created_at: self.created_at,
            items: self.lines.clone(),
            total: self.total(),
        }
    }

    /// Rebuild from a stored record
    ///
    /// The stored `total` is ignored. Lines with a non-positive quantity are
    /// dropped so a corrupt document cannot break the line invariant.
    pub fn from_record(record: OrderRecord) -> Self {
        let record_id = record.id;
        let lines = record
            .items
            .into_iter()
            .filter(|line| {
                let keep = line.quantity > 0;
                if !keep {
                    tracing::warn!(
                        order_id = %record_id,
                        plate_id = %line.plate_id,
                        quantity = line.quantity,
                        "Dropping non-positive order line from stored order"
                    );
                }
                keep
            })
            .collect();

        let order = Self {
            id: (!record_id.is_empty()).then_some(record_id),
            customer_id: record.customer_id,
            customer_name: record.customer_name,
            created_at: record.created_at,
            lines,
        };

        if to_decimal(record.total) != lines_total(&order.lines) {
            tracing::debug!(
                order_id = order.id().unwrap_or_default(),
                stored_total = record.total,
                total = order.total(),
                "Stored order total differs from line sum"
            );
        }
        order
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self::from_record(record)
    }
}
