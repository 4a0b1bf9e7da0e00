//! Order module
//!
//! - `Order`: the in-progress cart aggregate (lines + derived total)
//! - `OrderRecord` / `OrderLine`: the stored document shape
//! - `money`: decimal-backed arithmetic shared with reporting

pub mod aggregate;
pub mod money;
pub mod types;

// Re-exports
pub use aggregate::Order;
pub use types::{MAX_PRICE, MAX_QUANTITY, OrderLine, OrderRecord};
