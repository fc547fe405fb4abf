//! Payment repository.
//!
//! Records a payment against a finalized invoice as one transaction: the
//! guarded balance update, the immutable payment row, and the journal
//! posting commit together or not at all.

use chrono::{NaiveDate, Utc};
use khata_core::invoice::PaymentStatus as CorePaymentStatus;
use khata_core::ledger::{JournalSource, payment_lines};
use khata_core::numbering::DocumentType;
use khata_core::payment::{PaymentError as CorePaymentError, PaymentMethod, validate_payment};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{invoices, payments, sea_orm_active_enums::PaymentStatus};

use super::account::{AccountError, AccountRepository, system_accounts};
use super::journal::{JournalError, JournalRepository, PostEntryInput};
use super::sequence::{SequenceError, SequenceRepository};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Business-rule failure from payment validation.
    #[error(transparent)]
    Payment(#[from] CorePaymentError),

    /// The guarded balance update lost a race; the invoice changed under us.
    #[error("Concurrent modification detected for invoice {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Chart-of-accounts lookup failure.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Posting failure.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Number allocation failure.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Invoice being paid.
    pub invoice_id: Uuid,
    /// Amount received; must not exceed the balance due.
    pub amount: Decimal,
    /// How the money arrived.
    pub method: PaymentMethod,
    /// Value date of the payment.
    pub payment_date: NaiveDate,
    /// Method-specific reference (cheque no, UTR, UPI txn id).
    pub reference: Option<String>,
}

/// A recorded payment with the invoice as updated by it.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The immutable payment row.
    pub payment: payments::Model,
    /// Invoice state after applying the payment.
    pub invoice: invoices::Model,
}

// Guarded application of the payment: the balance check is part of the
// WHERE clause, so a concurrent payment that would overdraw loses by
// matching zero rows.
const APPLY_PAYMENT_SQL: &str = r"
UPDATE invoices
SET total_paid = total_paid + $1,
    balance_due = balance_due - $1,
    updated_at = NOW()
WHERE id = $2
  AND company_id = $3
  AND status = 'finalized'
  AND balance_due >= $1
";

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against a finalized invoice.
    ///
    /// Preconditions (finalized, not paid, amount within balance, cash
    /// limit) validate against the loaded row first for clean errors; the
    /// guarded update then wins or loses the actual race.
    ///
    /// # Errors
    ///
    /// Returns `Payment` for precondition and compliance failures,
    /// `ConcurrentModification` when the guarded update matches no row.
    pub async fn record_payment(
        &self,
        company_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, PaymentRepoError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .filter(invoices::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .ok_or(PaymentRepoError::InvoiceNotFound(input.invoice_id))?;

        validate_payment(
            input.amount,
            input.method,
            invoice.status.clone().into(),
            invoice.payment_status.clone().into(),
            invoice.balance_due,
        )?;

        let result = txn
            .execute(Statement::from_sql_and_values(
                txn.get_database_backend(),
                APPLY_PAYMENT_SQL,
                [
                    input.amount.into(),
                    input.invoice_id.into(),
                    company_id.into(),
                ],
            ))
            .await?;

        if result.rows_affected() == 0 {
            return Err(PaymentRepoError::ConcurrentModification(input.invoice_id));
        }

        // Re-read inside the transaction for the post-update amounts, then
        // derive the payment status from them.
        let invoice = invoices::Entity::find_by_id(input.invoice_id)
            .one(&txn)
            .await?
            .ok_or(PaymentRepoError::InvoiceNotFound(input.invoice_id))?;

        let payment_status =
            CorePaymentStatus::from_amounts(invoice.total_paid, invoice.balance_due);
        let mut active: invoices::ActiveModel = invoice.into();
        active.payment_status = Set(PaymentStatus::from(payment_status));
        let invoice = active.update(&txn).await?;

        let payment_number = SequenceRepository::next_number(
            &txn,
            company_id,
            DocumentType::Payment,
            input.payment_date,
        )
        .await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            payment_number: Set(payment_number.clone()),
            invoice_id: Set(input.invoice_id),
            amount: Set(input.amount),
            method: Set(input.method.into()),
            payment_date: Set(input.payment_date),
            reference: Set(input.reference.clone()),
            created_at: Set(Utc::now().into()),
        };
        let payment = payment.insert(&txn).await?;

        let deposit_name = if input.method.is_cash() {
            system_accounts::CASH
        } else {
            system_accounts::BANK
        };
        let deposit = AccountRepository::find_by_name(&txn, company_id, deposit_name).await?;
        let receivable = AccountRepository::find_by_name(
            &txn,
            company_id,
            system_accounts::ACCOUNTS_RECEIVABLE,
        )
        .await?;

        JournalRepository::post_in(
            &txn,
            PostEntryInput {
                company_id,
                source: JournalSource::Payment,
                source_id: payment.id,
                entry_date: input.payment_date,
                narration: format!(
                    "Payment {payment_number} against invoice {}",
                    invoice.number
                ),
                lines: payment_lines(deposit.id, receivable.id, input.amount, &invoice.number),
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            %company_id,
            payment_number = %payment.payment_number,
            invoice_number = %invoice.number,
            amount = %payment.amount,
            method = %input.method,
            "payment recorded"
        );

        Ok(RecordedPayment { payment, invoice })
    }

    /// Lists payments recorded against an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist for this
    /// company.
    pub async fn list_for_invoice(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Vec<payments::Model>, PaymentRepoError> {
        invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(PaymentRepoError::InvoiceNotFound(invoice_id))?;

        let payments = payments::Entity::find()
            .filter(payments::Column::CompanyId.eq(company_id))
            .filter(payments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(payments)
    }
}
