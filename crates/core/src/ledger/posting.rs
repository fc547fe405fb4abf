//! Posting-line templates for the standard accounting patterns.
//!
//! Every engine operation posts through one of these templates, so the
//! debit/credit structure of each transaction kind lives in exactly one
//! place:
//!
//! - Invoice: debit receivable for the total; credit sales for the taxable
//!   value; credit each nonzero GST output account.
//! - COGS: debit cost-of-goods-sold; credit inventory.
//! - Payment: debit cash/bank; credit receivable.
//! - Reversal: the original entry with every debit and credit swapped.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::invoice::InvoiceTotals;

use super::types::JournalLineSpec;

/// The ledger accounts an invoice posting touches.
#[derive(Debug, Clone, Copy)]
pub struct SalesAccounts {
    /// Customer receivable (asset).
    pub receivable: Uuid,
    /// Sales income.
    pub sales: Uuid,
    /// CGST output liability.
    pub cgst_payable: Uuid,
    /// SGST output liability.
    pub sgst_payable: Uuid,
    /// IGST output liability.
    pub igst_payable: Uuid,
}

/// Journal lines for a finalized invoice.
///
/// Zero tax components produce no line, so an intra-state invoice never
/// touches the IGST account and vice versa.
#[must_use]
pub fn invoice_lines(
    accounts: &SalesAccounts,
    totals: &InvoiceTotals,
    invoice_number: &str,
) -> Vec<JournalLineSpec> {
    let mut lines = vec![
        JournalLineSpec::debit(accounts.receivable, totals.total).with_bill_ref(invoice_number),
        JournalLineSpec::credit(accounts.sales, totals.taxable_value())
            .with_bill_ref(invoice_number),
    ];
    if !totals.cgst.is_zero() {
        lines.push(JournalLineSpec::credit(accounts.cgst_payable, totals.cgst));
    }
    if !totals.sgst.is_zero() {
        lines.push(JournalLineSpec::credit(accounts.sgst_payable, totals.sgst));
    }
    if !totals.igst.is_zero() {
        lines.push(JournalLineSpec::credit(accounts.igst_payable, totals.igst));
    }
    lines
}

/// Journal lines for the paired cost-of-goods-sold entry.
#[must_use]
pub fn cogs_lines(
    cogs_account: Uuid,
    inventory_account: Uuid,
    cost_total: Decimal,
) -> Vec<JournalLineSpec> {
    vec![
        JournalLineSpec::debit(cogs_account, cost_total),
        JournalLineSpec::credit(inventory_account, cost_total),
    ]
}

/// Journal lines for a payment received against an invoice.
#[must_use]
pub fn payment_lines(
    deposit_account: Uuid,
    receivable_account: Uuid,
    amount: Decimal,
    invoice_number: &str,
) -> Vec<JournalLineSpec> {
    vec![
        JournalLineSpec::debit(deposit_account, amount),
        JournalLineSpec::credit(receivable_account, amount).with_bill_ref(invoice_number),
    ]
}

/// Mirrors an entry by swapping every line's debit and credit.
///
/// A balanced input stays balanced by construction, and summing original
/// plus reversal nets every account to zero.
#[must_use]
pub fn reversal_lines(original: &[JournalLineSpec]) -> Vec<JournalLineSpec> {
    original
        .iter()
        .map(|line| JournalLineSpec {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            bill_ref: line.bill_ref.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::ledger::validation::validate_lines;

    fn accounts() -> SalesAccounts {
        SalesAccounts {
            receivable: Uuid::new_v4(),
            sales: Uuid::new_v4(),
            cgst_payable: Uuid::new_v4(),
            sgst_payable: Uuid::new_v4(),
            igst_payable: Uuid::new_v4(),
        }
    }

    fn intra_state_totals() -> InvoiceTotals {
        InvoiceTotals {
            subtotal: dec!(1000),
            discount: dec!(0),
            cgst: dec!(90),
            sgst: dec!(90),
            igst: dec!(0),
            total: dec!(1180),
        }
    }

    #[test]
    fn test_invoice_lines_intra_state() {
        let accts = accounts();
        let lines = invoice_lines(&accts, &intra_state_totals(), "INV-2025-00001");

        // Receivable debit + sales, CGST, SGST credits. No IGST line.
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].account_id, accts.receivable);
        assert_eq!(lines[0].debit, dec!(1180));
        assert_eq!(lines[1].account_id, accts.sales);
        assert_eq!(lines[1].credit, dec!(1000));
        assert_eq!(lines[2].account_id, accts.cgst_payable);
        assert_eq!(lines[2].credit, dec!(90));
        assert_eq!(lines[3].account_id, accts.sgst_payable);
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_invoice_lines_inter_state() {
        let accts = accounts();
        let totals = InvoiceTotals {
            subtotal: dec!(1000),
            discount: dec!(0),
            cgst: dec!(0),
            sgst: dec!(0),
            igst: dec!(180),
            total: dec!(1180),
        };
        let lines = invoice_lines(&accts, &totals, "INV-2025-00002");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].account_id, accts.igst_payable);
        assert_eq!(lines[2].credit, dec!(180));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_invoice_lines_discount_reduces_sales_credit() {
        let accts = accounts();
        let totals = InvoiceTotals {
            subtotal: dec!(1000),
            discount: dec!(50),
            cgst: dec!(85.50),
            sgst: dec!(85.50),
            igst: dec!(0),
            total: dec!(1121),
        };
        let lines = invoice_lines(&accts, &totals, "INV-2025-00003");

        assert_eq!(lines[1].credit, dec!(950));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_invoice_lines_carry_bill_ref() {
        let lines = invoice_lines(&accounts(), &intra_state_totals(), "INV-2025-00001");
        assert_eq!(lines[0].bill_ref.as_deref(), Some("INV-2025-00001"));
        assert_eq!(lines[1].bill_ref.as_deref(), Some("INV-2025-00001"));
    }

    #[test]
    fn test_cogs_lines_balance() {
        let lines = cogs_lines(Uuid::new_v4(), Uuid::new_v4(), dec!(600));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].debit, dec!(600));
        assert_eq!(lines[1].credit, dec!(600));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_payment_lines_balance() {
        let lines = payment_lines(Uuid::new_v4(), Uuid::new_v4(), dec!(500), "INV-2025-00001");
        assert_eq!(lines[0].debit, dec!(500));
        assert_eq!(lines[1].credit, dec!(500));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_reversal_swaps_sides() {
        let original = invoice_lines(&accounts(), &intra_state_totals(), "INV-2025-00001");
        let reversed = reversal_lines(&original);

        assert_eq!(reversed.len(), original.len());
        for (orig, rev) in original.iter().zip(&reversed) {
            assert_eq!(orig.account_id, rev.account_id);
            assert_eq!(orig.debit, rev.credit);
            assert_eq!(orig.credit, rev.debit);
        }
        assert!(validate_lines(&reversed).is_ok());
    }

    #[test]
    fn test_reversal_nets_to_zero_per_account() {
        let original = invoice_lines(&accounts(), &intra_state_totals(), "INV-2025-00001");
        let reversed = reversal_lines(&original);

        for (orig, rev) in original.iter().zip(&reversed) {
            let net = (orig.debit - orig.credit) + (rev.debit - rev.credit);
            assert_eq!(net, dec!(0));
        }
    }
}
