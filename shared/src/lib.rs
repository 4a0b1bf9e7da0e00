//! Shared types for Comanda
//!
//! Domain records, the order aggregate, sales reporting and the unified
//! error system used by the client and application crates.

pub mod error;
pub mod models;
pub mod order;
pub mod report;

// Re-exports
pub use error::{AppError, AppResult, ErrorClass, ErrorCode};
pub use models::{Customer, Employee, EmployeeCreate, InventoryItem, Plate, Role};
pub use order::{Order, OrderLine, OrderRecord};
pub use report::{DailyRevenue, ProductSales, SalesReport, sales_summary_text};
pub use serde::{Deserialize, Serialize};
