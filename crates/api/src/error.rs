//! Maps engine and repository errors onto HTTP responses.
//!
//! Every rejection renders as `{ "error": { "code", "message" } }` with a
//! stable category code from [`AppError`]: 400 validation, 404 not found,
//! 409 conflict/precondition, 422 compliance/unbalanced, 500 internal.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use khata_core::invoice::InvoiceError;
use khata_core::ledger::LedgerError;
use khata_core::payment::PaymentError;
use khata_db::repositories::{
    AccountError, CreditNoteError, InvoiceRepoError, JournalError, PaymentRepoError, SequenceError,
};
use khata_shared::AppError;

/// Handler-level error; carries an [`AppError`] and renders it as JSON.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.error_code(), message = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": {
                "code": self.0.error_code(),
                "message": self.0.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        let message = err.to_string();
        Self(match err {
            InvoiceError::NotDraft { .. }
            | InvoiceError::CanOnlyDeleteDraft
            | InvoiceError::NotFinalized
            | InvoiceError::AlreadyCredited => AppError::Precondition(message),
            InvoiceError::NoLineItems
            | InvoiceError::ZeroQuantity { .. }
            | InvoiceError::MissingUnitPrice { .. }
            | InvoiceError::DiscountExceedsAmount { .. }
            | InvoiceError::Gst(_) => AppError::Validation(message),
        })
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        let message = err.to_string();
        Self(match err {
            PaymentError::NonPositiveAmount(_) | PaymentError::ExceedsBalance { .. } => {
                AppError::Validation(message)
            }
            PaymentError::InvoiceNotFinalized | PaymentError::InvoiceAlreadyPaid => {
                AppError::Precondition(message)
            }
            PaymentError::CashLimitExceeded { .. } => AppError::Compliance(message),
        })
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        Self(match err {
            LedgerError::Unbalanced { .. } => AppError::Unbalanced(message),
            LedgerError::AlreadyPosted { .. } => AppError::Conflict(message),
            LedgerError::AccountNotFound(_) => AppError::NotFound(message),
            LedgerError::AccountInactive(_) => AppError::Precondition(message),
            LedgerError::InsufficientLines
            | LedgerError::BothDebitAndCredit
            | LedgerError::EmptyLine
            | LedgerError::NegativeAmount => AppError::Validation(message),
        })
    }
}

impl From<SequenceError> for ApiError {
    fn from(err: SequenceError) -> Self {
        let message = err.to_string();
        Self(match err {
            SequenceError::NumberingConflict { .. } => AppError::Conflict(message),
            SequenceError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let message = err.to_string();
        Self(match err {
            AccountError::NotFound(_) | AccountError::NameNotFound(_) => {
                AppError::NotFound(message)
            }
            AccountError::NameTaken(_) => AppError::Conflict(message),
            AccountError::SystemAccountImmutable(_) => AppError::Precondition(message),
            AccountError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Ledger(inner) => inner.into(),
            JournalError::Sequence(inner) => inner.into(),
            JournalError::Database(inner) => Self(AppError::Database(inner.to_string())),
        }
    }
}

impl From<InvoiceRepoError> for ApiError {
    fn from(err: InvoiceRepoError) -> Self {
        let message = err.to_string();
        match err {
            InvoiceRepoError::NotFound(_)
            | InvoiceRepoError::CompanyNotFound(_)
            | InvoiceRepoError::ShipmentNotFound(_)
            | InvoiceRepoError::CustomerNotFound(_) => Self(AppError::NotFound(message)),
            InvoiceRepoError::NoCustomerAssigned(_) => Self(AppError::Validation(message)),
            InvoiceRepoError::InvoiceAlreadyExists(_) => Self(AppError::Conflict(message)),
            InvoiceRepoError::Invoice(inner) => inner.into(),
            InvoiceRepoError::Account(inner) => inner.into(),
            InvoiceRepoError::Journal(inner) => inner.into(),
            InvoiceRepoError::Sequence(inner) => inner.into(),
            InvoiceRepoError::Database(inner) => Self(AppError::Database(inner.to_string())),
        }
    }
}

impl From<PaymentRepoError> for ApiError {
    fn from(err: PaymentRepoError) -> Self {
        let message = err.to_string();
        match err {
            PaymentRepoError::InvoiceNotFound(_) => Self(AppError::NotFound(message)),
            PaymentRepoError::ConcurrentModification(_) => Self(AppError::Conflict(message)),
            PaymentRepoError::Payment(inner) => inner.into(),
            PaymentRepoError::Account(inner) => inner.into(),
            PaymentRepoError::Journal(inner) => inner.into(),
            PaymentRepoError::Sequence(inner) => inner.into(),
            PaymentRepoError::Database(inner) => Self(AppError::Database(inner.to_string())),
        }
    }
}

impl From<CreditNoteError> for ApiError {
    fn from(err: CreditNoteError) -> Self {
        let message = err.to_string();
        match err {
            CreditNoteError::InvoiceNotFound(_) => Self(AppError::NotFound(message)),
            CreditNoteError::MissingOriginalEntry(_) => Self(AppError::Internal(message)),
            CreditNoteError::Invoice(inner) => inner.into(),
            CreditNoteError::Document(inner) => (*inner).into(),
            CreditNoteError::Journal(inner) => inner.into(),
            CreditNoteError::Sequence(inner) => inner.into(),
            CreditNoteError::Database(inner) => Self(AppError::Database(inner.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_cash_limit_maps_to_compliance() {
        let err: ApiError = PaymentError::CashLimitExceeded {
            amount: dec!(250_000),
            limit: dec!(200_000),
        }
        .into();
        assert_eq!(err.0.status_code(), 422);
        assert_eq!(err.0.error_code(), "COMPLIANCE_VIOLATION");
    }

    #[test]
    fn test_duplicate_invoice_maps_to_conflict() {
        let err: ApiError = InvoiceRepoError::InvoiceAlreadyExists(Uuid::nil()).into();
        assert_eq!(err.0.status_code(), 409);
        assert_eq!(err.0.error_code(), "CONFLICT");
    }

    #[test]
    fn test_unbalanced_entry_maps_to_422() {
        let err: ApiError = LedgerError::Unbalanced {
            debit: dec!(100),
            credit: dec!(90),
        }
        .into();
        assert_eq!(err.0.status_code(), 422);
        assert_eq!(err.0.error_code(), "UNBALANCED_ENTRY");
    }

    #[test]
    fn test_not_draft_maps_to_precondition() {
        let err: ApiError = InvoiceError::NotDraft {
            status: "finalized".into(),
        }
        .into();
        assert_eq!(err.0.status_code(), 409);
        assert_eq!(err.0.error_code(), "PRECONDITION_FAILED");
    }
}
