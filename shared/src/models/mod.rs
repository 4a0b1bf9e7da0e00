//! Data models
//!
//! Records stored in the document database. Ids live outside the stored
//! fields (`#[serde(skip)]`) and are filled in by the repositories; field
//! names follow the existing collections (`nombre`, `precio`, ...).

pub mod customer;
pub mod employee;
pub mod inventory;
pub mod product;
pub mod role;

// Re-exports
pub use customer::*;
pub use employee::*;
pub use inventory::*;
pub use product::*;
pub use role::*;

/// Placeholder for missing text fields in stored documents
pub(crate) fn default_name() -> String {
    "N/A".to_string()
}
