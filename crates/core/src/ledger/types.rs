//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source document classification for a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalSource {
    /// Sales posting for a finalized invoice.
    Invoice,
    /// Paired cost-of-goods-sold posting for an inventory-linked invoice.
    Cogs,
    /// Payment received against an invoice.
    Payment,
    /// Reversing entry for a credit note.
    CreditNote,
    /// Manually entered journal.
    Manual,
}

impl JournalSource {
    /// Database identifier for this source type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Cogs => "cogs",
            Self::Payment => "payment",
            Self::CreditNote => "credit_note",
            Self::Manual => "manual",
        }
    }
}

/// Ledger account classification.
///
/// Determines the normal-balance polarity:
/// - Asset/Expense are debit-normal (debits increase the balance)
/// - Liability/Income/Equity are credit-normal (credits increase it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, bank, receivables, inventory).
    Asset,
    /// Liability account (GST payable, loans).
    Liability,
    /// Income account (sales).
    Income,
    /// Expense account (COGS, operating expenses).
    Expense,
    /// Equity account (capital, retained earnings).
    Equity,
}

impl AccountType {
    /// Returns true for debit-normal account types.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }
}

/// One line of a journal entry to be posted.
///
/// Exactly one of `debit`/`credit` is nonzero; the other is zero (never
/// null) to keep aggregation simple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineSpec {
    /// The ledger account to post to.
    pub account_id: Uuid,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional free-text bill reference.
    pub bill_ref: Option<String>,
}

impl JournalLineSpec {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            bill_ref: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            bill_ref: None,
        }
    }

    /// Attaches a bill reference.
    #[must_use]
    pub fn with_bill_ref(mut self, bill_ref: impl Into<String>) -> Self {
        self.bill_ref = Some(bill_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_polarity() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Income.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
    }

    #[test]
    fn test_line_constructors() {
        let id = Uuid::new_v4();
        let d = JournalLineSpec::debit(id, dec!(100));
        assert_eq!(d.debit, dec!(100));
        assert_eq!(d.credit, dec!(0));

        let c = JournalLineSpec::credit(id, dec!(100)).with_bill_ref("INV-2025-00001");
        assert_eq!(c.credit, dec!(100));
        assert_eq!(c.debit, dec!(0));
        assert_eq!(c.bill_ref.as_deref(), Some("INV-2025-00001"));
    }

    #[test]
    fn test_source_identifiers() {
        assert_eq!(JournalSource::Invoice.as_str(), "invoice");
        assert_eq!(JournalSource::Cogs.as_str(), "cogs");
        assert_eq!(JournalSource::CreditNote.as_str(), "credit_note");
        assert_eq!(JournalSource::Manual.as_str(), "manual");
    }
}
