//! GST calculation error types.

use thiserror::Error;

/// Errors that can occur during GST calculation.
///
/// A wrong GST type is a compliance defect, not a degraded-mode feature:
/// missing inputs always fail the line computation instead of defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GstError {
    /// Place-of-supply state is missing or blank.
    #[error("Missing {side} state for GST type determination")]
    MissingState {
        /// Which party's state is missing ("customer" or "company").
        side: &'static str,
    },

    /// No GST rate configured for the HSN/SAC code.
    #[error("No GST rate configured for HSN/SAC '{hsn}'")]
    RateNotFound {
        /// The HSN/SAC code that has no configured rate.
        hsn: String,
    },

    /// GST rate must not be negative.
    #[error("GST rate must not be negative: {0}")]
    NegativeRate(String),
}

impl GstError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingState { .. } => "MISSING_STATE",
            Self::RateNotFound { .. } => "GST_RATE_NOT_FOUND",
            Self::NegativeRate(_) => "NEGATIVE_GST_RATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GstError::MissingState { side: "customer" }.error_code(),
            "MISSING_STATE"
        );
        assert_eq!(
            GstError::RateNotFound { hsn: "9983".into() }.error_code(),
            "GST_RATE_NOT_FOUND"
        );
        assert_eq!(
            GstError::NegativeRate("-5".into()).error_code(),
            "NEGATIVE_GST_RATE"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            GstError::MissingState { side: "company" }.to_string(),
            "Missing company state for GST type determination"
        );
        assert_eq!(
            GstError::RateNotFound { hsn: "8473".into() }.to_string(),
            "No GST rate configured for HSN/SAC '8473'"
        );
    }
}
