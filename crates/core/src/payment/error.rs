//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating or recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Payment amount exceeds the invoice's outstanding balance.
    #[error("Payment of {amount} exceeds balance due of {balance_due}")]
    ExceedsBalance {
        /// The attempted payment amount.
        amount: Decimal,
        /// Outstanding balance at validation time.
        balance_due: Decimal,
    },

    /// Payments are only accepted against finalized invoices.
    #[error("Invoice is not finalized; payments require a finalized invoice")]
    InvoiceNotFinalized,

    /// The invoice is already fully paid.
    #[error("Invoice is already fully paid")]
    InvoiceAlreadyPaid,

    /// Section 269ST: cash receipts above the statutory limit are prohibited.
    #[error("Cash receipt of {amount} exceeds the statutory limit of {limit} (Section 269ST)")]
    CashLimitExceeded {
        /// The attempted cash amount.
        amount: Decimal,
        /// The statutory limit.
        limit: Decimal,
    },
}

impl PaymentError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::ExceedsBalance { .. } => "EXCEEDS_BALANCE",
            Self::InvoiceNotFinalized => "INVOICE_NOT_FINALIZED",
            Self::InvoiceAlreadyPaid => "INVOICE_ALREADY_PAID",
            Self::CashLimitExceeded { .. } => "CASH_LIMIT_EXCEEDED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PaymentError::NonPositiveAmount(dec!(0)).error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            PaymentError::CashLimitExceeded {
                amount: dec!(300000),
                limit: dec!(200000)
            }
            .error_code(),
            "CASH_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_cash_limit_display_mentions_269st() {
        let err = PaymentError::CashLimitExceeded {
            amount: dec!(250000),
            limit: dec!(200000),
        };
        assert!(err.to_string().contains("Section 269ST"));
    }
}
