//! Payment validation rules.

use rust_decimal::Decimal;

use crate::invoice::{InvoiceStatus, PaymentStatus};

use super::error::PaymentError;
use super::types::PaymentMethod;

/// Section 269ST statutory limit on cash receipts: ₹2,00,000.
pub const CASH_RECEIPT_LIMIT: Decimal = Decimal::from_parts(200_000, 0, 0, false, 0);

/// Validates a payment against an invoice's current state.
///
/// Preconditions, in order:
/// 1. Invoice is finalized (drafts and credited invoices take no payments)
/// 2. Invoice is not already fully paid
/// 3. Amount is positive
/// 4. Cash payments respect the Section 269ST limit (hard rule, not advisory)
/// 5. Amount does not exceed the outstanding balance
///
/// # Errors
///
/// Returns the first violated rule as a `PaymentError`.
pub fn validate_payment(
    amount: Decimal,
    method: PaymentMethod,
    invoice_status: InvoiceStatus,
    payment_status: PaymentStatus,
    balance_due: Decimal,
) -> Result<(), PaymentError> {
    if !invoice_status.accepts_payments() {
        return Err(PaymentError::InvoiceNotFinalized);
    }
    if payment_status == PaymentStatus::Paid {
        return Err(PaymentError::InvoiceAlreadyPaid);
    }
    if amount <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveAmount(amount));
    }
    if method.is_cash() && amount > CASH_RECEIPT_LIMIT {
        return Err(PaymentError::CashLimitExceeded {
            amount,
            limit: CASH_RECEIPT_LIMIT,
        });
    }
    if amount > balance_due {
        return Err(PaymentError::ExceedsBalance {
            amount,
            balance_due,
        });
    }
    Ok(())
}
