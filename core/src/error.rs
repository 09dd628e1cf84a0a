use serde::Serialize;
use thiserror::Error;

/// Unified error type for the phone compare library.
///
/// This enum provides structured error information that can be
/// serialized to JSON for front ends to handle appropriately.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend returned {status} for {url}")]
    Backend { status: u16, url: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl AppError {
    /// Create a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a Backend error from a non-success HTTP status
    pub fn backend(status: u16, url: impl Into<String>) -> Self {
        Self::Backend {
            status,
            url: url.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a Not Found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (user can retry or take action)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Backend may be briefly unreachable
            // 5xx responses may be transient
            // Storage and IO issues may be transient
            Self::Network { .. } | Self::Storage { .. } | Self::Io { .. } => true,
            Self::Backend { status, .. } => *status >= 500,
            // The user can fix the input and try again
            Self::Validation { .. } | Self::Conflict { .. } | Self::Unauthorized { .. } => true,
            // Retrying won't change these
            Self::NotFound { .. } | Self::Forbidden { .. } | Self::Parse { .. } => false,
        }
    }
}

// Convert from HttpError
impl From<crate::sources::http::HttpError> for AppError {
    fn from(err: crate::sources::http::HttpError) -> Self {
        use crate::sources::http::HttpError;
        match err {
            HttpError::Request(e) => AppError::network(e.to_string()),
            HttpError::Status { status, url } => AppError::backend(status, url),
            HttpError::Decode(e) => AppError::parse(format!("backend response: {e}")),
            HttpError::InvalidBaseUrl(url) => {
                AppError::parse(format!("invalid backend URL: {url}"))
            }
        }
    }
}

// Convert from StorageError
impl From<crate::session::storage::StorageError> for AppError {
    fn from(err: crate::session::storage::StorageError) -> Self {
        use crate::session::storage::StorageError;
        match err {
            StorageError::Io(e) => AppError::storage(format!("IO: {e}")),
            StorageError::Json(e) => AppError::storage(format!("JSON: {e}")),
            StorageError::Home => AppError::storage("Could not determine home directory"),
        }
    }
}

// Convert from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}

// Convert to String for CLI command errors
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::backend(502, "http://localhost:3001/products");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Backend\""));
        assert!(json.contains("\"status\":502"));
        assert!(json.contains("\"url\":\"http://localhost:3001/products\""));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::network("connection refused").is_recoverable());
        assert!(AppError::backend(503, "/products").is_recoverable());
        assert!(!AppError::backend(400, "/products").is_recoverable());
        assert!(AppError::conflict("username taken").is_recoverable());
        assert!(!AppError::not_found("product 7").is_recoverable());
        assert!(!AppError::forbidden("admin only").is_recoverable());
    }

    #[test]
    fn test_helper_constructors() {
        let err = AppError::validation("product name is required");
        match err {
            AppError::Validation { message } => {
                assert_eq!(message, "product name is required");
            }
            _ => panic!("Wrong variant"),
        }

        let err = AppError::not_found("resource");
        match err {
            AppError::NotFound { resource } => {
                assert_eq!(resource, "resource");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            AppError::unauthorized("login required").to_string(),
            "Unauthorized: login required"
        );
        assert_eq!(
            AppError::backend(404, "/users/9").to_string(),
            "Backend returned 404 for /users/9"
        );
    }
}
