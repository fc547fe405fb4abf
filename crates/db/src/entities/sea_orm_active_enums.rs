//! Postgres enum mappings for the billing schema.

use khata_core::invoice::{
    InvoiceKind as CoreInvoiceKind, InvoiceStatus as CoreInvoiceStatus,
    PaymentStatus as CorePaymentStatus,
};
use khata_core::ledger::AccountType as CoreAccountType;
use khata_core::payment::PaymentMethod as CorePaymentMethod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Editable, deletable, not yet posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Issued and posted to the ledger.
    #[sea_orm(string_value = "finalized")]
    Finalized,
    /// Reversed by a credit note.
    #[sea_orm(string_value = "credited")]
    Credited,
}

impl From<InvoiceStatus> for CoreInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Finalized => Self::Finalized,
            InvoiceStatus::Credited => Self::Credited,
        }
    }
}

/// Invoice payment status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    /// No payments recorded.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Partially paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Balance due is zero.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(status: CorePaymentStatus) -> Self {
        match status {
            CorePaymentStatus::Unpaid => Self::Unpaid,
            CorePaymentStatus::Partial => Self::Partial,
            CorePaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

/// Invoice document kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_kind")]
pub enum InvoiceKind {
    /// Regular GST tax invoice.
    #[sea_orm(string_value = "tax_invoice")]
    TaxInvoice,
    /// Mirrored reversal document.
    #[sea_orm(string_value = "credit_note")]
    CreditNote,
}

impl From<CoreInvoiceKind> for InvoiceKind {
    fn from(kind: CoreInvoiceKind) -> Self {
        match kind {
            CoreInvoiceKind::TaxInvoice => Self::TaxInvoice,
            CoreInvoiceKind::CreditNote => Self::CreditNote,
        }
    }
}

/// Ledger account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Debit-normal.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Credit-normal.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Credit-normal.
    #[sea_orm(string_value = "income")]
    Income,
    /// Debit-normal.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Credit-normal.
    #[sea_orm(string_value = "equity")]
    Equity,
}

impl From<AccountType> for CoreAccountType {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
            AccountType::Equity => Self::Equity,
        }
    }
}

impl From<CoreAccountType> for AccountType {
    fn from(account_type: CoreAccountType) -> Self {
        match account_type {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Income => Self::Income,
            CoreAccountType::Expense => Self::Expense,
            CoreAccountType::Equity => Self::Equity,
        }
    }
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Physical cash (Section 269ST limit applies).
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Cheque.
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Direct bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Unified Payments Interface.
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Debit or credit card.
    #[sea_orm(string_value = "card")]
    Card,
    /// NEFT/RTGS wire.
    #[sea_orm(string_value = "neft_rtgs")]
    NeftRtgs,
    /// IMPS transfer.
    #[sea_orm(string_value = "imps")]
    Imps,
    /// Anything else.
    #[sea_orm(string_value = "others")]
    Others,
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(method: CorePaymentMethod) -> Self {
        match method {
            CorePaymentMethod::Cash => Self::Cash,
            CorePaymentMethod::Cheque => Self::Cheque,
            CorePaymentMethod::BankTransfer => Self::BankTransfer,
            CorePaymentMethod::Upi => Self::Upi,
            CorePaymentMethod::Card => Self::Card,
            CorePaymentMethod::NeftRtgs => Self::NeftRtgs,
            CorePaymentMethod::Imps => Self::Imps,
            CorePaymentMethod::Others => Self::Others,
        }
    }
}
