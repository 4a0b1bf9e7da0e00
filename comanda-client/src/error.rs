//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or token rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Wrong email/password or disabled account
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Service not configured (missing key)
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, ClientError::InvalidCredentials(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for shared::AppError {
    fn from(err: ClientError) -> Self {
        use shared::{AppError, ErrorCode};

        let message = err.to_string();
        match err {
            ClientError::InvalidCredentials(_) => AppError::invalid_credentials(),
            ClientError::Unauthorized => AppError::not_authenticated(),
            ClientError::Forbidden(msg) => AppError::permission_denied(msg),
            ClientError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            ClientError::NotConfigured(msg) => AppError::config(msg),
            ClientError::Http(_) => AppError::with_message(ErrorCode::NetworkError, message),
            ClientError::InvalidResponse(_)
            | ClientError::Api { .. }
            | ClientError::Serialization(_) => {
                AppError::with_message(ErrorCode::InternalError, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AppError, ErrorClass, ErrorCode};

    #[test]
    fn test_into_app_error() {
        let err: AppError = ClientError::InvalidCredentials("INVALID_PASSWORD".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.class(), ErrorClass::ExternalService);

        let err: AppError = ClientError::NotFound("pedidos/x".into()).into();
        assert_eq!(err.class(), ErrorClass::NotFound);

        let err: AppError = ClientError::Api {
            status: 503,
            message: "UNAVAILABLE".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(err.message.contains("503"));
    }
}
