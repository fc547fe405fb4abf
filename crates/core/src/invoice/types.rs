//! Invoice domain types and lifecycle rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::gst::TaxBreakup;

use super::error::InvoiceError;

/// Invoice lifecycle status.
///
/// `draft --finalize--> finalized --credit_note--> credited`. Draft invoices
/// are editable and deletable; finalized and credited invoices are
/// append-only, with no in-place edits to amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Invoice is being drafted; no ledger impact yet.
    Draft,
    /// Invoice is finalized and posted to the ledger (immutable).
    Finalized,
    /// Invoice has been reversed by a credit note (terminal).
    Credited,
}

impl InvoiceStatus {
    /// Validates that this invoice can be finalized.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotDraft` for finalized or credited invoices.
    pub fn check_can_finalize(self) -> Result<(), InvoiceError> {
        match self {
            Self::Draft => Ok(()),
            Self::Finalized | Self::Credited => Err(InvoiceError::NotDraft {
                status: self.as_str().to_string(),
            }),
        }
    }

    /// Validates that this invoice can be deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::CanOnlyDeleteDraft` for non-draft invoices.
    pub fn check_can_delete(self) -> Result<(), InvoiceError> {
        if self == Self::Draft {
            Ok(())
        } else {
            Err(InvoiceError::CanOnlyDeleteDraft)
        }
    }

    /// Validates that a credit note can be raised against this invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFinalized` for drafts and
    /// `InvoiceError::AlreadyCredited` for already-credited invoices.
    pub fn check_can_credit(self) -> Result<(), InvoiceError> {
        match self {
            Self::Finalized => Ok(()),
            Self::Draft => Err(InvoiceError::NotFinalized),
            Self::Credited => Err(InvoiceError::AlreadyCredited),
        }
    }

    /// Returns true if the invoice can accept payments.
    #[must_use]
    pub fn accepts_payments(self) -> bool {
        self == Self::Finalized
    }

    /// Database identifier for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
            Self::Credited => "credited",
        }
    }
}

/// Payment status derived from total paid vs total amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing received yet.
    Unpaid,
    /// Partially paid; balance due is positive.
    Partial,
    /// Fully paid; balance due is zero.
    Paid,
}

impl PaymentStatus {
    /// Derives the payment status from the amounts on the invoice.
    #[must_use]
    pub fn from_amounts(total_paid: Decimal, balance_due: Decimal) -> Self {
        if balance_due.is_zero() {
            Self::Paid
        } else if total_paid.is_zero() {
            Self::Unpaid
        } else {
            Self::Partial
        }
    }

    /// Database identifier for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

/// Whether an invoice-shaped document is a tax invoice or a credit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// A regular tax invoice raised from a shipment.
    TaxInvoice,
    /// A mirrored document reversing a finalized invoice.
    CreditNote,
}

/// A fully computed invoice line, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLineDraft {
    /// 1-based position within the invoice.
    pub line_no: i32,
    /// Product or service name.
    pub product_name: String,
    /// HSN/SAC tax-classification code, if known.
    pub hsn_code: Option<String>,
    /// Quantity (fractional allowed; negative on credit notes).
    pub quantity: Decimal,
    /// Unit rate.
    pub unit_rate: Decimal,
    /// Flat discount on the line.
    pub discount: Decimal,
    /// quantity x rate - discount.
    pub taxable: Decimal,
    /// GST breakdown for this line.
    pub tax: TaxBreakup,
    /// taxable + total tax.
    pub line_total: Decimal,
    /// Per-unit cost price, when known (drives the COGS posting).
    pub cost_price: Option<Decimal>,
}

/// Aggregated invoice totals.
///
/// Invariant: `total = subtotal - discount + cgst + sgst + igst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of the rounded per-line gross (quantity x rate), before discounts.
    pub subtotal: Decimal,
    /// Sum of line discounts.
    pub discount: Decimal,
    /// Total CGST.
    pub cgst: Decimal,
    /// Total SGST.
    pub sgst: Decimal,
    /// Total IGST.
    pub igst: Decimal,
    /// Grand total payable.
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Accumulates totals over a set of computed lines.
    ///
    /// The subtotal sums each line's rounded gross (`taxable + discount`)
    /// rather than re-multiplying quantity by rate, so the header shares the
    /// lines' rounding policy and `taxable_value()` equals the sum of line
    /// taxable values exactly.
    #[must_use]
    pub fn from_lines(lines: &[InvoiceLineDraft]) -> Self {
        let mut totals = Self::default();
        for line in lines {
            totals.subtotal += line.taxable + line.discount;
            totals.discount += line.discount;
            totals.cgst += line.tax.cgst_amount;
            totals.sgst += line.tax.sgst_amount;
            totals.igst += line.tax.igst_amount;
            totals.total += line.line_total;
        }
        totals
    }

    /// Taxable value: subtotal net of discounts.
    #[must_use]
    pub fn taxable_value(&self) -> Decimal {
        self.subtotal - self.discount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_transitions() {
        assert!(InvoiceStatus::Draft.check_can_finalize().is_ok());
        assert!(matches!(
            InvoiceStatus::Finalized.check_can_finalize(),
            Err(InvoiceError::NotDraft { .. })
        ));
        assert!(matches!(
            InvoiceStatus::Credited.check_can_finalize(),
            Err(InvoiceError::NotDraft { .. })
        ));
    }

    #[test]
    fn test_delete_rules() {
        assert!(InvoiceStatus::Draft.check_can_delete().is_ok());
        assert!(InvoiceStatus::Finalized.check_can_delete().is_err());
        assert!(InvoiceStatus::Credited.check_can_delete().is_err());
    }

    #[test]
    fn test_credit_rules() {
        assert!(matches!(
            InvoiceStatus::Draft.check_can_credit(),
            Err(InvoiceError::NotFinalized)
        ));
        assert!(InvoiceStatus::Finalized.check_can_credit().is_ok());
        assert!(matches!(
            InvoiceStatus::Credited.check_can_credit(),
            Err(InvoiceError::AlreadyCredited)
        ));
    }

    #[test]
    fn test_accepts_payments() {
        assert!(!InvoiceStatus::Draft.accepts_payments());
        assert!(InvoiceStatus::Finalized.accepts_payments());
        assert!(!InvoiceStatus::Credited.accepts_payments());
    }

    #[test]
    fn test_payment_status_from_amounts() {
        assert_eq!(
            PaymentStatus::from_amounts(dec!(0), dec!(1180)),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(dec!(500), dec!(680)),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::from_amounts(dec!(1180), dec!(0)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_totals_invariant() {
        use crate::gst::compute_line_tax;

        let tax = compute_line_tax(dec!(950), "Goa", "Goa", dec!(18)).unwrap();
        let line = InvoiceLineDraft {
            line_no: 1,
            product_name: "Widget".into(),
            hsn_code: Some("8473".into()),
            quantity: dec!(10),
            unit_rate: dec!(100),
            discount: dec!(50),
            taxable: dec!(950),
            line_total: dec!(950) + tax.total_tax(),
            tax,
            cost_price: Some(dec!(60)),
        };
        let totals = InvoiceTotals::from_lines(std::slice::from_ref(&line));

        assert_eq!(totals.subtotal, dec!(1000));
        assert_eq!(totals.discount, dec!(50));
        assert_eq!(totals.taxable_value(), dec!(950));
        assert_eq!(
            totals.total,
            totals.subtotal - totals.discount + totals.cgst + totals.sgst + totals.igst
        );
    }
}
