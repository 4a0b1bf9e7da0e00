//! Error classification
//!
//! Two orthogonal views of an [`ErrorCode`]:
//! - [`ErrorCategory`]: the domain the code belongs to (by code range)
//! - [`ErrorClass`]: how the caller must react to it (the propagation taxonomy)

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 4xxx: Order errors
/// - 6xxx: Catalog and inventory errors
/// - 8xxx: Employee errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Catalog,
    Employee,
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Order,
            6000..7000 => Self::Catalog,
            8000..9000 => Self::Employee,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Order => "order",
            Self::Catalog => "catalog",
            Self::Employee => "employee",
            Self::System => "system",
        }
    }
}

/// Propagation class of an error
///
/// - `Validation`: bad user input, shown inline, state unchanged
/// - `NotFound`: missing document, callers usually treat it as an empty result
/// - `ExternalService`: identity/store/LLM call failed, shown as a toast
/// - `Configuration`: missing credentials at startup, fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Validation,
    NotFound,
    ExternalService,
    Configuration,
}

impl ErrorClass {
    /// Only configuration errors terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the propagation class for this error code
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorCode::NotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::OrderItemNotFound
            | ErrorCode::PlateNotFound
            | ErrorCode::InventoryItemNotFound
            | ErrorCode::CustomerNotFound
            | ErrorCode::EmployeeNotFound => ErrorClass::NotFound,

            ErrorCode::InvalidCredentials
            | ErrorCode::IdentityProviderError
            | ErrorCode::InternalError
            | ErrorCode::StoreError
            | ErrorCode::NetworkError
            | ErrorCode::AdvisoryError
            | ErrorCode::Unknown => ErrorClass::ExternalService,

            ErrorCode::ConfigError => ErrorClass::Configuration,

            _ => ErrorClass::Validation,
        }
    }
}
