//! Invoice error types for building and state errors.

use thiserror::Error;

use crate::gst::GstError;

/// Errors that can occur while building an invoice or moving it through
/// its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    /// The source shipment has no line items to invoice.
    #[error("Shipment has no line items to invoice")]
    NoLineItems,

    /// A line item has zero quantity.
    #[error("Line item '{product}' has zero quantity")]
    ZeroQuantity {
        /// Product name on the offending line.
        product: String,
    },

    /// No unit price could be resolved (neither selling nor cost price set).
    #[error("No unit price available for '{product}'")]
    MissingUnitPrice {
        /// Product name on the offending line.
        product: String,
    },

    /// A line's discount exceeds its gross amount.
    #[error("Discount {discount} exceeds line amount {gross} for '{product}'")]
    DiscountExceedsAmount {
        /// Product name on the offending line.
        product: String,
        /// The discount requested.
        discount: String,
        /// quantity x rate before discount.
        gross: String,
    },

    /// GST computation failed for a line.
    #[error(transparent)]
    Gst(#[from] GstError),

    /// Only draft invoices can be finalized.
    #[error("Invoice is not a draft (status: {status})")]
    NotDraft {
        /// The invoice's actual status.
        status: String,
    },

    /// Only draft invoices can be deleted.
    #[error("Only draft invoices can be deleted")]
    CanOnlyDeleteDraft,

    /// Credit notes require a finalized invoice.
    #[error("Invoice is not finalized")]
    NotFinalized,

    /// The invoice has already been credited.
    #[error("Invoice has already been credited")]
    AlreadyCredited,
}

impl InvoiceError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLineItems => "NO_LINE_ITEMS",
            Self::ZeroQuantity { .. } => "ZERO_QUANTITY",
            Self::MissingUnitPrice { .. } => "MISSING_UNIT_PRICE",
            Self::DiscountExceedsAmount { .. } => "DISCOUNT_EXCEEDS_AMOUNT",
            Self::Gst(e) => e.error_code(),
            Self::NotDraft { .. } => "INVOICE_NOT_DRAFT",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::NotFinalized => "INVOICE_NOT_FINALIZED",
            Self::AlreadyCredited => "ALREADY_CREDITED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(InvoiceError::NoLineItems.error_code(), "NO_LINE_ITEMS");
        assert_eq!(
            InvoiceError::NotDraft {
                status: "finalized".into()
            }
            .error_code(),
            "INVOICE_NOT_DRAFT"
        );
        assert_eq!(InvoiceError::NotFinalized.error_code(), "INVOICE_NOT_FINALIZED");
        assert_eq!(InvoiceError::AlreadyCredited.error_code(), "ALREADY_CREDITED");
    }

    #[test]
    fn test_gst_error_code_passthrough() {
        let err = InvoiceError::Gst(GstError::MissingState { side: "customer" });
        assert_eq!(err.error_code(), "MISSING_STATE");
    }
}
