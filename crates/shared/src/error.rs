//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every engine operation fails with one of these categories. The variants
/// map one-to-one onto stable error codes and HTTP status codes; the caller
/// (UI layer) is responsible for display.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing required field, rejected before any persistence.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wrong lifecycle state (e.g., finalizing a non-draft invoice).
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Conflict: duplicate invoice for shipment, numbering race, double posting.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Statutory compliance violation (e.g., Section 269ST cash limit).
    #[error("Compliance violation: {0}")]
    Compliance(String),

    /// Debits and credits do not balance. Never silently corrected.
    #[error("Unbalanced journal entry: {0}")]
    Unbalanced(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Precondition(_) | Self::Conflict(_) => 409,
            Self::Compliance(_) | Self::Unbalanced(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Precondition(_) => "PRECONDITION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::Compliance(_) => "COMPLIANCE_VIOLATION",
            Self::Unbalanced(_) => "UNBALANCED_ENTRY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Precondition(String::new()).status_code(), 409);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Compliance(String::new()).status_code(), 422);
        assert_eq!(AppError::Unbalanced(String::new()).status_code(), 422);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Precondition(String::new()).error_code(),
            "PRECONDITION_FAILED"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Compliance(String::new()).error_code(),
            "COMPLIANCE_VIOLATION"
        );
        assert_eq!(
            AppError::Unbalanced(String::new()).error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Precondition("msg".into()).to_string(),
            "Precondition failed: msg"
        );
        assert_eq!(AppError::Conflict("msg".into()).to_string(), "Conflict: msg");
        assert_eq!(
            AppError::Compliance("msg".into()).to_string(),
            "Compliance violation: msg"
        );
        assert_eq!(
            AppError::Unbalanced("msg".into()).to_string(),
            "Unbalanced journal entry: msg"
        );
        assert_eq!(AppError::NotFound("msg".into()).to_string(), "Not found: msg");
    }
}
