//! Double-entry journal logic.
//!
//! This module implements the pure half of the ledger posting engine:
//! - Journal line validation (balance, one-sided lines)
//! - Account balance sign rules
//! - Posting-line templates for invoices, COGS, payments
//! - Reversal by debit/credit swap
//!
//! The database layer owns idempotency enforcement, atomic balance
//! increments, and transaction boundaries.

pub mod error;
pub mod posting;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use posting::{SalesAccounts, cogs_lines, invoice_lines, payment_lines, reversal_lines};
pub use types::{AccountType, JournalLineSpec, JournalSource};
pub use validation::{balance_change, validate_lines};
