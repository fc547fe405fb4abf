//! Property-based tests for journal validation and posting templates.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::invoice::InvoiceTotals;

use super::posting::{SalesAccounts, invoice_lines, payment_lines, reversal_lines};
use super::types::{AccountType, JournalLineSpec};
use super::validation::{balance_change, validate_lines};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Income),
        Just(AccountType::Expense),
        Just(AccountType::Equity),
    ]
}

fn accounts() -> SalesAccounts {
    SalesAccounts {
        receivable: Uuid::new_v4(),
        sales: Uuid::new_v4(),
        cgst_payable: Uuid::new_v4(),
        sgst_payable: Uuid::new_v4(),
        igst_payable: Uuid::new_v4(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any pair of equal-and-opposite lines validates.
    #[test]
    fn prop_symmetric_pair_is_balanced(amount in amount_strategy()) {
        let lines = vec![
            JournalLineSpec::debit(Uuid::new_v4(), amount),
            JournalLineSpec::credit(Uuid::new_v4(), amount),
        ];
        prop_assert!(validate_lines(&lines).is_ok());
    }

    /// The invoice template always balances for consistent totals,
    /// regardless of how the tax splits between components.
    #[test]
    fn prop_invoice_template_balances(
        taxable in amount_strategy(),
        cgst in amount_strategy(),
        igst_only in any::<bool>(),
    ) {
        let (cgst, sgst, igst) = if igst_only {
            (Decimal::ZERO, Decimal::ZERO, cgst + cgst)
        } else {
            (cgst, cgst, Decimal::ZERO)
        };
        let totals = InvoiceTotals {
            subtotal: taxable,
            discount: Decimal::ZERO,
            cgst,
            sgst,
            igst,
            total: taxable + cgst + sgst + igst,
        };
        let lines = invoice_lines(&accounts(), &totals, "INV-2025-00001");
        prop_assert!(validate_lines(&lines).is_ok());
    }

    /// The payment template always balances.
    #[test]
    fn prop_payment_template_balances(amount in amount_strategy()) {
        let lines = payment_lines(Uuid::new_v4(), Uuid::new_v4(), amount, "INV-2025-00001");
        prop_assert!(validate_lines(&lines).is_ok());
    }

    /// Reversal preserves validity and nets every line to zero.
    #[test]
    fn prop_reversal_nets_zero(
        taxable in amount_strategy(),
        tax in amount_strategy(),
    ) {
        let totals = InvoiceTotals {
            subtotal: taxable,
            discount: Decimal::ZERO,
            cgst: tax,
            sgst: tax,
            igst: Decimal::ZERO,
            total: taxable + tax + tax,
        };
        let original = invoice_lines(&accounts(), &totals, "INV-2025-00001");
        let reversed = reversal_lines(&original);

        prop_assert!(validate_lines(&reversed).is_ok());
        for (orig, rev) in original.iter().zip(&reversed) {
            prop_assert_eq!(
                (orig.debit - orig.credit) + (rev.debit - rev.credit),
                Decimal::ZERO
            );
        }
    }

    /// Balance change formula is consistent with account polarity.
    #[test]
    fn prop_balance_change_polarity(
        account_type in account_type_strategy(),
        debit in amount_strategy(),
        credit in amount_strategy(),
    ) {
        let change = balance_change(account_type, debit, credit);
        let expected = if account_type.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        };
        prop_assert_eq!(change, expected);
    }

    /// A reversal applies the exact opposite balance change.
    #[test]
    fn prop_reversal_balance_change_is_negated(
        account_type in account_type_strategy(),
        amount in amount_strategy(),
    ) {
        let forward = balance_change(account_type, amount, Decimal::ZERO);
        let reverse = balance_change(account_type, Decimal::ZERO, amount);
        prop_assert_eq!(forward + reverse, Decimal::ZERO);
    }
}
