//! Custom error types for fic-expenses
//!
//! A single error enum covers local configuration and validation problems as
//! well as failures reported by the remote API.

use thiserror::Error;

/// The main error type for fic-expenses operations
#[derive(Error, Debug)]
pub enum FicError {
    /// Configuration-related errors (invalid period kind, missing credentials,
    /// missing payment account). Raised before any remote call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The API rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API quota has been exhausted
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Any other failed API call; `status` is absent for transport failures
    #[error("API error{}: {message}", status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl FicError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a generic API error with an HTTP status
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Authentication failures stop a batch; every other error only fails
    /// the item it came from.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<std::io::Error> for FicError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FicError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for FicError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type alias for fic-expenses operations
pub type FicResult<T> = Result<T, FicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FicError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = FicError::expense_not_found("42");
        assert_eq!(err.to_string(), "Expense not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            FicError::api(500, "boom").to_string(),
            "API error (500): boom"
        );
        let transport = FicError::Api {
            status: None,
            message: "connection refused".into(),
        };
        assert_eq!(transport.to_string(), "API error: connection refused");
    }

    #[test]
    fn test_auth_classification() {
        assert!(FicError::Auth("bad token".into()).is_auth());
        assert!(!FicError::api(500, "x").is_auth());
        assert!(!FicError::RateLimited("x".into()).is_auth());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FicError = io_err.into();
        assert!(matches!(err, FicError::Io(_)));
    }
}
