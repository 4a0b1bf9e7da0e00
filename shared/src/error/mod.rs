//! Unified error system for Comanda
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ErrorClass`]: Propagation taxonomy (validation, not found, external service, configuration)
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorClass, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::InvalidQuantity, "quantity must be positive");
//! assert_eq!(err.class(), ErrorClass::Validation);
//!
//! let err = AppError::not_found("Plate").with_detail("id", "p-1");
//! assert!(err.is_not_found());
//! ```

mod category;
mod codes;
mod types;

pub use category::{ErrorCategory, ErrorClass};
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
