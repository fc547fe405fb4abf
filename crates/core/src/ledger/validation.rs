//! Journal entry validation.
//!
//! Every entry is validated here before the database layer persists it.
//! The balance invariant (debits == credits within one paisa) is the one
//! rule that is never relaxed or silently corrected.

use rust_decimal::Decimal;

use khata_shared::types::within_paisa;

use super::error::LedgerError;
use super::types::{AccountType, JournalLineSpec};

/// Validates a set of journal lines before posting.
///
/// Checks, in order:
/// 1. At least 2 lines
/// 2. Per line: amounts non-negative, exactly one side nonzero
/// 3. Total debits equal total credits (within one paisa)
///
/// # Errors
///
/// Returns the first `LedgerError` encountered.
pub fn validate_lines(lines: &[JournalLineSpec]) -> Result<(), LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        match (line.debit.is_zero(), line.credit.is_zero()) {
            (false, false) => return Err(LedgerError::BothDebitAndCredit),
            (true, true) => return Err(LedgerError::EmptyLine),
            _ => {}
        }
        total_debit += line.debit;
        total_credit += line.credit;
    }

    if !within_paisa(total_debit, total_credit) {
        return Err(LedgerError::Unbalanced {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(())
}

/// Signed balance change a line applies to its account.
///
/// Debit-normal accounts (asset, expense) grow with debits; credit-normal
/// accounts (liability, income, equity) grow with credits.
#[must_use]
pub fn balance_change(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    if account_type.is_debit_normal() {
        debit - credit
    } else {
        credit - debit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn debit(amount: Decimal) -> JournalLineSpec {
        JournalLineSpec::debit(Uuid::new_v4(), amount)
    }

    fn credit(amount: Decimal) -> JournalLineSpec {
        JournalLineSpec::credit(Uuid::new_v4(), amount)
    }

    #[test]
    fn test_balanced_entry_passes() {
        let lines = vec![debit(dec!(1180)), credit(dec!(1000)), credit(dec!(180))];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![debit(dec!(100))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::InsufficientLines)
        ));
    }

    #[test]
    fn test_unbalanced_rejected() {
        let lines = vec![debit(dec!(100)), credit(dec!(50))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_one_paisa_drift_tolerated() {
        // Rounded tax splits can drift by one paisa; that is accepted.
        let lines = vec![debit(dec!(100.01)), credit(dec!(100.00))];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_two_paisa_drift_rejected() {
        let lines = vec![debit(dec!(100.02)), credit(dec!(100.00))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_both_sides_rejected() {
        let mut line = debit(dec!(100));
        line.credit = dec!(100);
        let lines = vec![line, credit(dec!(100))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::BothDebitAndCredit)
        ));
    }

    #[test]
    fn test_empty_line_rejected() {
        let lines = vec![debit(dec!(0)), credit(dec!(0))];
        assert!(matches!(validate_lines(&lines), Err(LedgerError::EmptyLine)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![debit(dec!(-100)), credit(dec!(-100))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_balance_change_signs() {
        // Asset debit grows, credit shrinks.
        assert_eq!(balance_change(AccountType::Asset, dec!(100), dec!(0)), dec!(100));
        assert_eq!(balance_change(AccountType::Asset, dec!(0), dec!(40)), dec!(-40));
        // Income credit grows, debit shrinks.
        assert_eq!(balance_change(AccountType::Income, dec!(0), dec!(100)), dec!(100));
        assert_eq!(balance_change(AccountType::Income, dec!(30), dec!(0)), dec!(-30));
        // Liability (GST payable) credit grows.
        assert_eq!(balance_change(AccountType::Liability, dec!(0), dec!(18)), dec!(18));
        // Expense debit grows.
        assert_eq!(balance_change(AccountType::Expense, dec!(60), dec!(0)), dec!(60));
        // Equity credit grows.
        assert_eq!(balance_change(AccountType::Equity, dec!(0), dec!(500)), dec!(500));
    }
}
