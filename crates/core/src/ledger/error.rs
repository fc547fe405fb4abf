//! Ledger error types for validation and posting errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during journal entry validation and posting.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A journal entry needs at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Debits and credits do not balance.
    ///
    /// Never silently corrected; the entry is rejected before persistence.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A line has both debit and credit nonzero.
    #[error("Journal line must not carry both a debit and a credit")]
    BothDebitAndCredit,

    /// A line has neither debit nor credit.
    #[error("Journal line must carry a debit or a credit")]
    EmptyLine,

    /// A line amount is negative; reversals swap sides instead.
    #[error("Journal line amounts must not be negative")]
    NegativeAmount,

    /// A journal entry already exists for this source document.
    #[error("Journal entry already posted for {source_type} {source_id}")]
    AlreadyPosted {
        /// Source document type.
        source_type: String,
        /// Source document id.
        source_id: Uuid,
    },

    /// Ledger account not found.
    #[error("Ledger account not found: {0}")]
    AccountNotFound(Uuid),

    /// Ledger account is deactivated.
    #[error("Ledger account {0} is inactive")]
    AccountInactive(Uuid),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::BothDebitAndCredit => "BOTH_DEBIT_AND_CREDIT",
            Self::EmptyLine => "EMPTY_JOURNAL_LINE",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AlreadyPosted { .. } => "ALREADY_POSTED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::InsufficientLines.error_code(), "INSUFFICIENT_LINES");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50)
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::AlreadyPosted {
                source_type: "invoice".into(),
                source_id: Uuid::nil()
            }
            .error_code(),
            "ALREADY_POSTED"
        );
    }

    #[test]
    fn test_unbalanced_display() {
        let err = LedgerError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
