//! Invoice repository: draft creation, finalization, and deletion.
//!
//! Each public operation is one database transaction. Finalization posts
//! the sales entry and the paired COGS entry inside that same transaction,
//! so a finalized-but-unposted invoice cannot exist.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use khata_core::invoice::{
    InvoiceBuilder, InvoiceError as CoreInvoiceError, InvoiceKind, InvoiceLineDraft,
    InvoiceStatus as CoreInvoiceStatus, InvoiceTotals, ShipmentItem,
};
use khata_core::ledger::{JournalSource, SalesAccounts, cogs_lines, invoice_lines};
use khata_core::numbering::DocumentType;
use khata_shared::types::round_money;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    companies, customers, invoice_lines as invoice_lines_entity, invoices,
    sea_orm_active_enums::{InvoiceKind as DbInvoiceKind, InvoiceStatus, PaymentStatus},
    shipment_items, shipments, tax_rates,
};

use super::account::{AccountError, AccountRepository, system_accounts};
use super::journal::{JournalError, JournalRepository, PostEntryInput};
use super::sequence::{SequenceError, SequenceRepository};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(Uuid),

    /// Shipment not found.
    #[error("Shipment not found: {0}")]
    ShipmentNotFound(Uuid),

    /// Shipment has no customer to invoice.
    #[error("Shipment {0} has no customer assigned")]
    NoCustomerAssigned(Uuid),

    /// Customer row missing.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// An invoice already exists for this shipment.
    #[error("An invoice already exists for shipment {0}")]
    InvoiceAlreadyExists(Uuid),

    /// Business-rule failure from the invoice builder or lifecycle checks.
    #[error(transparent)]
    Invoice(#[from] CoreInvoiceError),

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

/// Finalization inputs stamped onto the invoice.
#[derive(Debug, Clone, Default)]
pub struct FinalizeInput {
    /// User performing the finalization, when known.
    pub finalized_by: Option<Uuid>,
    /// Transport/vehicle details for the printed invoice.
    pub transport_details: Option<String>,
    /// E-way bill number, when one was generated.
    pub eway_bill_number: Option<String>,
}

/// An invoice with its lines in order.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// Invoice header.
    pub invoice: invoices::Model,
    /// Ordered lines.
    pub lines: Vec<invoice_lines_entity::Model>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft invoice from a shipment.
    ///
    /// Loads the shipment, its items, and the customer; computes per-line
    /// GST; allocates an INV number; persists header and lines. Status is
    /// draft, nothing is posted yet.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceAlreadyExists` when the shipment is already invoiced
    /// (the unique index maps the race to this conflict), or the builder's
    /// validation errors.
    pub async fn create_draft(
        &self,
        company_id: Uuid,
        shipment_id: Uuid,
        invoice_date: NaiveDate,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let created = Self::create_draft_in(&txn, company_id, shipment_id, invoice_date).await?;
        txn.commit().await?;
        Ok(created)
    }

    /// Finalizes a draft invoice and posts its journal entries.
    ///
    /// The status flip is a guarded update (`WHERE status = 'draft'`); a
    /// concurrent finalize loses the race and fails cleanly. The sales
    /// entry and the COGS entry (when every line carries a cost price) post
    /// in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft` for already-finalized invoices, `NotFound`, or
    /// posting failures (all of which roll the flip back).
    pub async fn finalize(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
        input: FinalizeInput,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let finalized = Self::finalize_in(&txn, company_id, invoice_id, input).await?;
        txn.commit().await?;
        Ok(finalized)
    }

    /// Creates and finalizes an invoice atomically: either a fully
    /// finalized, fully posted invoice exists afterwards, or nothing does.
    ///
    /// # Errors
    ///
    /// Any failure from either step; the whole operation rolls back.
    pub async fn create_and_finalize(
        &self,
        company_id: Uuid,
        shipment_id: Uuid,
        invoice_date: NaiveDate,
        input: FinalizeInput,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let txn = self.db.begin().await?;
        let draft = Self::create_draft_in(&txn, company_id, shipment_id, invoice_date).await?;
        let finalized = Self::finalize_in(&txn, company_id, draft.invoice.id, input).await?;
        txn.commit().await?;
        Ok(finalized)
    }

    /// Deletes a draft invoice. Drafts have no ledger impact, so this is a
    /// plain delete; the guard keeps finalized invoices untouchable.
    ///
    /// # Errors
    ///
    /// Returns `CanOnlyDeleteDraft` for non-draft invoices.
    pub async fn delete_draft(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<(), InvoiceRepoError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(InvoiceRepoError::NotFound(invoice_id))?;

        CoreInvoiceStatus::from(invoice.status).check_can_delete()?;

        // Guarded: a finalize racing ahead of us makes this a no-op.
        let result = invoices::Entity::delete_many()
            .filter(invoices::Column::Id.eq(invoice_id))
            .filter(invoices::Column::CompanyId.eq(company_id))
            .filter(invoices::Column::Status.eq(InvoiceStatus::Draft))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CoreInvoiceError::CanOnlyDeleteDraft.into());
        }

        Ok(())
    }

    /// Gets an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such invoice exists for this company.
    pub async fn get(
        &self,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        Self::load(&self.db, company_id, invoice_id).await
    }

    // ------------------------------------------------------------------
    // Transaction-scoped internals
    // ------------------------------------------------------------------

    pub(crate) async fn create_draft_in(
        txn: &DatabaseTransaction,
        company_id: Uuid,
        shipment_id: Uuid,
        invoice_date: NaiveDate,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let company = companies::Entity::find_by_id(company_id)
            .one(txn)
            .await?
            .ok_or(InvoiceRepoError::CompanyNotFound(company_id))?;

        let shipment = shipments::Entity::find_by_id(shipment_id)
            .filter(shipments::Column::CompanyId.eq(company_id))
            .one(txn)
            .await?
            .ok_or(InvoiceRepoError::ShipmentNotFound(shipment_id))?;

        let customer_id = shipment
            .customer_id
            .ok_or(InvoiceRepoError::NoCustomerAssigned(shipment_id))?;

        let customer = customers::Entity::find_by_id(customer_id)
            .filter(customers::Column::CompanyId.eq(company_id))
            .one(txn)
            .await?
            .ok_or(InvoiceRepoError::CustomerNotFound(customer_id))?;

        let items: Vec<ShipmentItem> = shipment_items::Entity::find()
            .filter(shipment_items::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(shipment_items::Column::CreatedAt)
            .all(txn)
            .await?
            .into_iter()
            .map(|item| ShipmentItem {
                product_name: item.product_name,
                hsn_code: item.hsn_code,
                quantity: item.quantity,
                selling_price: item.selling_price,
                cost_price: item.cost_price,
                discount: item.discount,
            })
            .collect();

        let rate_lookup = Self::rate_lookup(txn, company_id, company.default_gst_rate).await?;
        let (lines, totals) =
            InvoiceBuilder::build_lines(&items, &customer.state, &company.state, rate_lookup)?;

        let number =
            SequenceRepository::next_number(txn, company_id, DocumentType::Invoice, invoice_date)
                .await?;

        let invoice = Self::insert_invoice(
            txn,
            company_id,
            &number,
            customer_id,
            Some(shipment_id),
            invoice_date,
            InvoiceKind::TaxInvoice,
            None,
            &totals,
            &lines,
        )
        .await?;

        tracing::info!(
            %company_id,
            invoice_number = %number,
            %shipment_id,
            total = %totals.total,
            "draft invoice created"
        );

        Ok(invoice)
    }

    pub(crate) async fn finalize_in(
        txn: &DatabaseTransaction,
        company_id: Uuid,
        invoice_id: Uuid,
        input: FinalizeInput,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let InvoiceWithLines { invoice, lines } = Self::load(txn, company_id, invoice_id).await?;

        CoreInvoiceStatus::from(invoice.status.clone()).check_can_finalize()?;

        let now = Utc::now();
        // The actual serialization point: concurrent finalizes race on this
        // guarded flip and exactly one wins.
        let result = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::Status,
                Expr::value(InvoiceStatus::Finalized),
            )
            .col_expr(invoices::Column::FinalizedAt, Expr::value(Some(now)))
            .col_expr(
                invoices::Column::FinalizedBy,
                Expr::value(input.finalized_by),
            )
            .col_expr(
                invoices::Column::TransportDetails,
                Expr::value(input.transport_details.clone()),
            )
            .col_expr(
                invoices::Column::EwayBillNumber,
                Expr::value(input.eway_bill_number.clone()),
            )
            .filter(invoices::Column::Id.eq(invoice_id))
            .filter(invoices::Column::CompanyId.eq(company_id))
            .filter(invoices::Column::Status.eq(InvoiceStatus::Draft))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            // Lost the race; report whatever state the row is actually in.
            let Some(row) = invoices::Entity::find_by_id(invoice_id)
                .filter(invoices::Column::CompanyId.eq(company_id))
                .one(txn)
                .await?
            else {
                return Err(InvoiceRepoError::NotFound(invoice_id));
            };
            return Err(CoreInvoiceError::NotDraft {
                status: CoreInvoiceStatus::from(row.status).as_str().to_string(),
            }
            .into());
        }

        let totals = Self::totals_of(&invoice);
        let accounts = Self::sales_accounts(txn, company_id).await?;

        JournalRepository::post_in(
            txn,
            PostEntryInput {
                company_id,
                source: JournalSource::Invoice,
                source_id: invoice_id,
                entry_date: invoice.invoice_date,
                narration: format!("Sales against invoice {}", invoice.number),
                lines: invoice_lines(&accounts, &totals, &invoice.number),
            },
        )
        .await?;

        // COGS posts only when every line carries a cost price; a partial
        // cost picture would book a fabricated margin.
        if let Some(cost_total) = Self::cost_total_of(&lines) {
            if !cost_total.is_zero() {
                let cogs = AccountRepository::find_by_name(txn, company_id, system_accounts::COGS)
                    .await?;
                let inventory =
                    AccountRepository::find_by_name(txn, company_id, system_accounts::INVENTORY)
                        .await?;

                JournalRepository::post_in(
                    txn,
                    PostEntryInput {
                        company_id,
                        source: JournalSource::Cogs,
                        source_id: invoice_id,
                        entry_date: invoice.invoice_date,
                        narration: format!("Cost of goods sold for invoice {}", invoice.number),
                        lines: cogs_lines(cogs.id, inventory.id, cost_total),
                    },
                )
                .await?;
            }
        }

        Self::load(txn, company_id, invoice_id).await
    }

    /// Inserts an invoice-shaped document (tax invoice or credit note) with
    /// its lines. Shared by draft creation and the credit-note engine.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn insert_invoice(
        txn: &DatabaseTransaction,
        company_id: Uuid,
        number: &str,
        customer_id: Uuid,
        shipment_id: Option<Uuid>,
        invoice_date: NaiveDate,
        kind: InvoiceKind,
        credit_note_for: Option<Uuid>,
        totals: &InvoiceTotals,
        lines: &[InvoiceLineDraft],
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let invoice_id = Uuid::new_v4();

        // A tax invoice starts life as an unpaid draft. A credit note is
        // issued finalized and carries no receivable of its own; its ledger
        // impact is the reversing entry, not a balance to collect.
        let (status, payment_status, balance_due, finalized_at) = match kind {
            InvoiceKind::TaxInvoice => (
                InvoiceStatus::Draft,
                PaymentStatus::Unpaid,
                totals.total,
                None,
            ),
            InvoiceKind::CreditNote => (
                InvoiceStatus::Finalized,
                PaymentStatus::Paid,
                Decimal::ZERO,
                Some(now),
            ),
        };

        let header = invoices::ActiveModel {
            id: Set(invoice_id),
            company_id: Set(company_id),
            number: Set(number.to_owned()),
            customer_id: Set(customer_id),
            shipment_id: Set(shipment_id),
            invoice_date: Set(invoice_date),
            kind: Set(DbInvoiceKind::from(kind)),
            credit_note_for: Set(credit_note_for),
            subtotal: Set(round_money(totals.subtotal)),
            discount_total: Set(round_money(totals.discount)),
            cgst_total: Set(totals.cgst),
            sgst_total: Set(totals.sgst),
            igst_total: Set(totals.igst),
            total_amount: Set(totals.total),
            status: Set(status),
            payment_status: Set(payment_status),
            total_paid: Set(Decimal::ZERO),
            balance_due: Set(balance_due),
            finalized_at: Set(finalized_at),
            finalized_by: Set(None),
            transport_details: Set(None),
            eway_bill_number: Set(None),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let invoice = match header.insert(txn).await {
            Ok(model) => model,
            Err(err) => match (err.sql_err(), shipment_id) {
                (Some(SqlErr::UniqueConstraintViolation(msg)), Some(sid))
                    if msg.contains("uq_invoices_shipment") =>
                {
                    return Err(InvoiceRepoError::InvoiceAlreadyExists(sid));
                }
                _ => return Err(InvoiceRepoError::Database(err)),
            },
        };

        let mut stored_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let row = invoice_lines_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                line_no: Set(line.line_no),
                product_name: Set(line.product_name.clone()),
                hsn_code: Set(line.hsn_code.clone()),
                quantity: Set(line.quantity),
                unit_rate: Set(line.unit_rate),
                discount: Set(line.discount),
                taxable_value: Set(line.taxable),
                cgst_rate: Set(line.tax.cgst_rate),
                cgst_amount: Set(line.tax.cgst_amount),
                sgst_rate: Set(line.tax.sgst_rate),
                sgst_amount: Set(line.tax.sgst_amount),
                igst_rate: Set(line.tax.igst_rate),
                igst_amount: Set(line.tax.igst_amount),
                line_total: Set(line.line_total),
                cost_price: Set(line.cost_price),
                created_at: Set(now),
            };
            stored_lines.push(row.insert(txn).await?);
        }

        Ok(InvoiceWithLines {
            invoice,
            lines: stored_lines,
        })
    }

    /// Builds the HSN -> total-rate lookup, backed by the company's
    /// `tax_rates` rows with the company default as fallback.
    pub(crate) async fn rate_lookup<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        default_rate: Decimal,
    ) -> Result<impl Fn(Option<&str>) -> Option<Decimal>, InvoiceRepoError> {
        let rates: HashMap<String, Decimal> = tax_rates::Entity::find()
            .filter(tax_rates::Column::CompanyId.eq(company_id))
            .all(conn)
            .await?
            .into_iter()
            .map(|rate| (rate.hsn_code, rate.rate_percent))
            .collect();

        Ok(move |hsn: Option<&str>| {
            hsn.and_then(|code| rates.get(code).copied())
                .or(Some(default_rate))
        })
    }

    /// Resolves the system accounts the sales posting touches.
    pub(crate) async fn sales_accounts<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
    ) -> Result<SalesAccounts, InvoiceRepoError> {
        let receivable =
            AccountRepository::find_by_name(conn, company_id, system_accounts::ACCOUNTS_RECEIVABLE)
                .await?;
        let sales =
            AccountRepository::find_by_name(conn, company_id, system_accounts::SALES).await?;
        let cgst = AccountRepository::find_by_name(conn, company_id, system_accounts::CGST_PAYABLE)
            .await?;
        let sgst = AccountRepository::find_by_name(conn, company_id, system_accounts::SGST_PAYABLE)
            .await?;
        let igst = AccountRepository::find_by_name(conn, company_id, system_accounts::IGST_PAYABLE)
            .await?;

        Ok(SalesAccounts {
            receivable: receivable.id,
            sales: sales.id,
            cgst_payable: cgst.id,
            sgst_payable: sgst.id,
            igst_payable: igst.id,
        })
    }

    /// Reconstructs the totals from a stored invoice header.
    pub(crate) fn totals_of(invoice: &invoices::Model) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: invoice.subtotal,
            discount: invoice.discount_total,
            cgst: invoice.cgst_total,
            sgst: invoice.sgst_total,
            igst: invoice.igst_total,
            total: invoice.total_amount,
        }
    }

    /// Total cost of goods across stored lines; `None` when any line lacks
    /// a cost price.
    pub(crate) fn cost_total_of(lines: &[invoice_lines_entity::Model]) -> Option<Decimal> {
        let mut total = Decimal::ZERO;
        for line in lines {
            let cost = line.cost_price?;
            total += round_money(line.quantity * cost);
        }
        Some(total)
    }

    pub(crate) async fn load<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<InvoiceWithLines, InvoiceRepoError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::CompanyId.eq(company_id))
            .one(conn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(invoice_id))?;

        let lines = invoice_lines_entity::Entity::find()
            .filter(invoice_lines_entity::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(invoice_lines_entity::Column::LineNo)
            .all(conn)
            .await?;

        Ok(InvoiceWithLines { invoice, lines })
    }
}
