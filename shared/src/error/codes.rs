//! Unified error codes for Comanda
//!
//! Error codes are organized by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog and inventory errors
//! - 8xxx: Employee errors
//! - 9xxx: System errors (external services, configuration)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire so view-model messages and logs can carry
/// a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Identity provider rejected the request for another reason
    IdentityProviderError = 1003,
    /// Authenticated user has no employee record and the policy denies access
    EmployeeNotProvisioned = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Manager role required
    ManagerRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been persisted and is read-only
    OrderFinalized = 4002,
    /// Order line not found
    OrderItemNotFound = 4006,
    /// Order is empty
    OrderEmpty = 4007,
    /// Quantity is not positive or exceeds the limit
    InvalidQuantity = 4008,
    /// Price is negative or not finite
    InvalidPrice = 4009,
    /// No order has been started
    OrderNotStarted = 4010,

    // ==================== 6xxx: Catalog / Inventory ====================
    /// Plate not found
    PlateNotFound = 6001,
    /// Inventory item not found
    InventoryItemNotFound = 6101,
    /// Stock would become negative
    InsufficientStock = 6102,
    /// Customer not found
    CustomerNotFound = 6201,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Unknown role value
    InvalidRole = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Document store call failed
    StoreError = 9002,
    /// Network error reaching an external service
    NetworkError = 9003,
    /// Language model call failed
    AdvisoryError = 9004,
    /// Missing or invalid configuration
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::IdentityProviderError => "Identity provider error",
            ErrorCode::EmployeeNotProvisioned => "User has no employee record",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ManagerRequired => "Manager role required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderFinalized => "Order has already been saved",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::InvalidQuantity => "Quantity must be positive",
            ErrorCode::InvalidPrice => "Price must be a non-negative number",
            ErrorCode::OrderNotStarted => "No order has been started",

            // Catalog / Inventory
            ErrorCode::PlateNotFound => "Plate not found",
            ErrorCode::InventoryItemNotFound => "Inventory item not found",
            ErrorCode::InsufficientStock => "Stock cannot become negative",
            ErrorCode::CustomerNotFound => "Customer not found",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::InvalidRole => "Invalid role",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StoreError => "Document store error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::AdvisoryError => "Language model error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::IdentityProviderError),
            1004 => Ok(ErrorCode::EmployeeNotProvisioned),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ManagerRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderFinalized),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidQuantity),
            4009 => Ok(ErrorCode::InvalidPrice),
            4010 => Ok(ErrorCode::OrderNotStarted),

            // Catalog / Inventory
            6001 => Ok(ErrorCode::PlateNotFound),
            6101 => Ok(ErrorCode::InventoryItemNotFound),
            6102 => Ok(ErrorCode::InsufficientStock),
            6201 => Ok(ErrorCode::CustomerNotFound),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::InvalidRole),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StoreError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::AdvisoryError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
