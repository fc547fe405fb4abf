//! Credit note repository: full reversal of a finalized invoice.
//!
//! One transaction covers the guarded status flip on the original, the
//! mirrored credit-note document, and the reversing journal entries (sales
//! and, when present, COGS).

use chrono::NaiveDate;
use khata_core::invoice::{
    CreditNoteLineSource, InvoiceError as CoreInvoiceError, InvoiceKind,
    InvoiceStatus as CoreInvoiceStatus, mirror_lines, reversal_narration,
};
use khata_core::ledger::{JournalLineSpec, JournalSource, reversal_lines};
use khata_core::numbering::DocumentType;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{companies, customers, invoices, sea_orm_active_enums::InvoiceStatus};

use super::invoice::{InvoiceRepoError, InvoiceRepository, InvoiceWithLines};
use super::journal::{EntryWithLines, JournalError, JournalRepository, PostEntryInput};
use super::sequence::{SequenceError, SequenceRepository};

/// Error types for credit-note operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditNoteError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Lifecycle failure (draft or already-credited original).
    #[error(transparent)]
    Invoice(#[from] CoreInvoiceError),

    /// The finalized invoice has no posted sales entry. Finalization posts
    /// in the same transaction, so this indicates corrupted data.
    #[error("No journal entry found for finalized invoice {0}")]
    MissingOriginalEntry(Uuid),

    /// Failure while building or persisting the mirrored document.
    #[error(transparent)]
    Document(#[from] Box<InvoiceRepoError>),

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

impl From<InvoiceRepoError> for CreditNoteError {
    fn from(err: InvoiceRepoError) -> Self {
        Self::Document(Box::new(err))
    }
}

/// The outcome of crediting an invoice.
#[derive(Debug, Clone)]
pub struct CreditNoteResult {
    /// The mirrored credit-note document with its lines.
    pub credit_note: InvoiceWithLines,
    /// The original invoice, now in credited status.
    pub original: invoices::Model,
}

/// Credit-note repository.
#[derive(Debug, Clone)]
pub struct CreditNoteRepository {
    db: DatabaseConnection,
}

impl CreditNoteRepository {
    /// Creates a new credit-note repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reverses a finalized invoice with a credit note.
    ///
    /// Flips the original to credited (guarded), creates the mirrored
    /// document with a CRN number, and posts the reversing entries by
    /// swapping every debit/credit of the original postings.
    ///
    /// # Errors
    ///
    /// Returns `NotFinalized` for drafts, `AlreadyCredited` when a credit
    /// note exists (including losing the race to a concurrent one).
    pub async fn create_credit_note(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
        credit_note_date: NaiveDate,
        reason: &str,
    ) -> Result<CreditNoteResult, CreditNoteError> {
        let txn = self.db.begin().await?;

        let InvoiceWithLines {
            invoice: original,
            lines,
        } = InvoiceRepository::load(&txn, company_id, invoice_id)
            .await
            .map_err(|err| match err {
                InvoiceRepoError::NotFound(id) => CreditNoteError::InvoiceNotFound(id),
                other => other.into(),
            })?;

        CoreInvoiceStatus::from(original.status.clone()).check_can_credit()?;

        // Guarded flip: exactly one credit note can win.
        let result = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::Status,
                Expr::value(InvoiceStatus::Credited),
            )
            .filter(invoices::Column::Id.eq(invoice_id))
            .filter(invoices::Column::CompanyId.eq(company_id))
            .filter(invoices::Column::Status.eq(InvoiceStatus::Finalized))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(CoreInvoiceError::AlreadyCredited.into());
        }

        let company = companies::Entity::find_by_id(company_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                CreditNoteError::Database(DbErr::RecordNotFound(format!(
                    "company {company_id} disappeared mid-transaction"
                )))
            })?;
        let customer = customers::Entity::find_by_id(original.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                CreditNoteError::Database(DbErr::RecordNotFound(format!(
                    "customer {} referenced by invoice {invoice_id} is missing",
                    original.customer_id
                )))
            })?;

        let sources: Vec<CreditNoteLineSource> = lines
            .iter()
            .map(|line| CreditNoteLineSource {
                product_name: line.product_name.clone(),
                hsn_code: line.hsn_code.clone(),
                quantity: line.quantity,
                unit_rate: line.unit_rate,
                discount: line.discount,
                cost_price: line.cost_price,
            })
            .collect();

        let rate_lookup =
            InvoiceRepository::rate_lookup(&txn, company_id, company.default_gst_rate).await?;
        let (mirrored, totals) = mirror_lines(
            &sources,
            &customer.state,
            &company.state,
            rate_lookup,
        )?;

        let number = SequenceRepository::next_number(
            &txn,
            company_id,
            DocumentType::CreditNote,
            credit_note_date,
        )
        .await?;

        let credit_note = InvoiceRepository::insert_invoice(
            &txn,
            company_id,
            &number,
            original.customer_id,
            None,
            credit_note_date,
            InvoiceKind::CreditNote,
            Some(invoice_id),
            &totals,
            &mirrored,
        )
        .await?;

        let narration = reversal_narration(&original.number, reason);
        Self::post_reversal(
            &txn,
            company_id,
            invoice_id,
            credit_note.invoice.id,
            credit_note_date,
            &narration,
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            %company_id,
            credit_note_number = %credit_note.invoice.number,
            original_number = %original.number,
            "credit note created"
        );

        let original = invoices::Model {
            status: InvoiceStatus::Credited,
            ..original
        };
        Ok(CreditNoteResult {
            credit_note,
            original,
        })
    }

    /// Posts the reversing entries: the original sales posting swapped, and
    /// the original COGS posting swapped when one exists.
    async fn post_reversal(
        txn: &DatabaseTransaction,
        company_id: Uuid,
        invoice_id: Uuid,
        credit_note_id: Uuid,
        entry_date: NaiveDate,
        narration: &str,
    ) -> Result<(), CreditNoteError> {
        let sales_entry =
            JournalRepository::find_by_source(txn, company_id, JournalSource::Invoice, invoice_id)
                .await?
                .ok_or(CreditNoteError::MissingOriginalEntry(invoice_id))?;

        JournalRepository::post_in(
            txn,
            PostEntryInput {
                company_id,
                source: JournalSource::CreditNote,
                source_id: credit_note_id,
                entry_date,
                narration: narration.to_owned(),
                lines: reversal_lines(&Self::specs_of(&sales_entry)),
            },
        )
        .await?;

        if let Some(cogs_entry) =
            JournalRepository::find_by_source(txn, company_id, JournalSource::Cogs, invoice_id)
                .await?
        {
            JournalRepository::post_in(
                txn,
                PostEntryInput {
                    company_id,
                    source: JournalSource::Cogs,
                    source_id: credit_note_id,
                    entry_date,
                    narration: format!("{narration} (cost reversal)"),
                    lines: reversal_lines(&Self::specs_of(&cogs_entry)),
                },
            )
            .await?;
        }

        Ok(())
    }

    fn specs_of(entry: &EntryWithLines) -> Vec<JournalLineSpec> {
        entry
            .lines
            .iter()
            .map(|line| JournalLineSpec {
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                bill_ref: line.bill_ref.clone(),
            })
            .collect()
    }
}
