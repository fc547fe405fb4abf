//! Invoice lifecycle routes: draft creation, finalization, fetch, delete.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};
use khata_db::entities::invoices;
use khata_db::entities::sea_orm_active_enums::{InvoiceKind, InvoiceStatus, PaymentStatus};
use khata_db::repositories::{FinalizeInput, InvoiceRepository, InvoiceWithLines};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/shipments/{shipment_id}/invoice",
            post(create_draft),
        )
        .route(
            "/companies/{company_id}/shipments/{shipment_id}/invoice/approve",
            post(approve),
        )
        .route(
            "/companies/{company_id}/invoices/{invoice_id}",
            get(get_invoice),
        )
        .route(
            "/companies/{company_id}/invoices/{invoice_id}",
            delete(delete_draft),
        )
        .route(
            "/companies/{company_id}/invoices/{invoice_id}/finalize",
            post(finalize),
        )
}

/// Request body for creating a draft invoice. The body may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Invoice date; defaults to today.
    pub invoice_date: Option<NaiveDate>,
}

/// Request body for finalizing a draft invoice.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FinalizeRequest {
    /// User performing the finalization.
    pub finalized_by: Option<Uuid>,
    /// Transport/vehicle details for the printed invoice.
    #[validate(length(max = 500))]
    pub transport_details: Option<String>,
    /// E-way bill number.
    #[validate(length(max = 50))]
    pub eway_bill_number: Option<String>,
}

/// Request body for create-and-finalize in one step.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApproveRequest {
    /// Invoice date; defaults to today.
    pub invoice_date: Option<NaiveDate>,
    /// User performing the finalization.
    pub finalized_by: Option<Uuid>,
    /// Transport/vehicle details for the printed invoice.
    #[validate(length(max = 500))]
    pub transport_details: Option<String>,
    /// E-way bill number.
    #[validate(length(max = 50))]
    pub eway_bill_number: Option<String>,
}

/// Response for one invoice line.
#[derive(Debug, Serialize)]
pub struct InvoiceLineResponse {
    /// Line number, 1-based.
    pub line_no: i32,
    /// Product name as dispatched.
    pub product_name: String,
    /// HSN/SAC code.
    pub hsn_code: Option<String>,
    /// Quantity (fractional allowed; negative on credit notes).
    pub quantity: String,
    /// Unit rate.
    pub unit_rate: String,
    /// Line discount.
    pub discount: String,
    /// quantity x rate - discount.
    pub taxable_value: String,
    /// CGST rate percent.
    pub cgst_rate: String,
    /// CGST amount.
    pub cgst_amount: String,
    /// SGST rate percent.
    pub sgst_rate: String,
    /// SGST amount.
    pub sgst_amount: String,
    /// IGST rate percent.
    pub igst_rate: String,
    /// IGST amount.
    pub igst_amount: String,
    /// taxable + taxes.
    pub line_total: String,
}

/// Response for a full invoice with lines.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice id.
    pub id: Uuid,
    /// Statutory document number.
    pub number: String,
    /// tax_invoice | credit_note.
    pub kind: InvoiceKind,
    /// draft | finalized | credited.
    pub status: InvoiceStatus,
    /// unpaid | partial | paid.
    pub payment_status: PaymentStatus,
    /// Billed customer.
    pub customer_id: Uuid,
    /// Source shipment, absent on credit notes.
    pub shipment_id: Option<Uuid>,
    /// For credit notes, the invoice being reversed.
    pub credit_note_for: Option<Uuid>,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Sum of taxable values before tax.
    pub subtotal: String,
    /// Sum of line discounts.
    pub discount_total: String,
    /// CGST total.
    pub cgst_total: String,
    /// SGST total.
    pub sgst_total: String,
    /// IGST total.
    pub igst_total: String,
    /// Grand total.
    pub total_amount: String,
    /// Amount received so far.
    pub total_paid: String,
    /// Remaining balance.
    pub balance_due: String,
    /// Finalization timestamp.
    pub finalized_at: Option<String>,
    /// Transport details captured at finalization.
    pub transport_details: Option<String>,
    /// E-way bill number.
    pub eway_bill_number: Option<String>,
    /// Free-text notes (credit notes carry the reason here).
    pub notes: Option<String>,
    /// Ordered lines.
    pub lines: Vec<InvoiceLineResponse>,
}

impl From<InvoiceWithLines> for InvoiceResponse {
    fn from(value: InvoiceWithLines) -> Self {
        let InvoiceWithLines { invoice, lines } = value;
        Self {
            id: invoice.id,
            number: invoice.number,
            kind: invoice.kind,
            status: invoice.status,
            payment_status: invoice.payment_status,
            customer_id: invoice.customer_id,
            shipment_id: invoice.shipment_id,
            credit_note_for: invoice.credit_note_for,
            invoice_date: invoice.invoice_date,
            subtotal: invoice.subtotal.to_string(),
            discount_total: invoice.discount_total.to_string(),
            cgst_total: invoice.cgst_total.to_string(),
            sgst_total: invoice.sgst_total.to_string(),
            igst_total: invoice.igst_total.to_string(),
            total_amount: invoice.total_amount.to_string(),
            total_paid: invoice.total_paid.to_string(),
            balance_due: invoice.balance_due.to_string(),
            finalized_at: invoice.finalized_at.map(|t| t.to_rfc3339()),
            transport_details: invoice.transport_details,
            eway_bill_number: invoice.eway_bill_number,
            notes: invoice.notes,
            lines: lines
                .into_iter()
                .map(|l| InvoiceLineResponse {
                    line_no: l.line_no,
                    product_name: l.product_name,
                    hsn_code: l.hsn_code,
                    quantity: l.quantity.to_string(),
                    unit_rate: l.unit_rate.to_string(),
                    discount: l.discount.to_string(),
                    taxable_value: l.taxable_value.to_string(),
                    cgst_rate: l.cgst_rate.to_string(),
                    cgst_amount: l.cgst_amount.to_string(),
                    sgst_rate: l.sgst_rate.to_string(),
                    sgst_amount: l.sgst_amount.to_string(),
                    igst_rate: l.igst_rate.to_string(),
                    igst_amount: l.igst_amount.to_string(),
                    line_total: l.line_total.to_string(),
                })
                .collect(),
        }
    }
}

/// Compact invoice state, returned alongside payments and credit notes.
#[derive(Debug, Serialize)]
pub struct InvoiceSummary {
    /// Invoice id.
    pub id: Uuid,
    /// Statutory document number.
    pub number: String,
    /// draft | finalized | credited.
    pub status: InvoiceStatus,
    /// unpaid | partial | paid.
    pub payment_status: PaymentStatus,
    /// Grand total.
    pub total_amount: String,
    /// Amount received so far.
    pub total_paid: String,
    /// Remaining balance.
    pub balance_due: String,
}

impl From<invoices::Model> for InvoiceSummary {
    fn from(invoice: invoices::Model) -> Self {
        Self {
            id: invoice.id,
            number: invoice.number,
            status: invoice.status,
            payment_status: invoice.payment_status,
            total_amount: invoice.total_amount.to_string(),
            total_paid: invoice.total_paid.to_string(),
            balance_due: invoice.balance_due.to_string(),
        }
    }
}

/// POST `/companies/{company_id}/shipments/{shipment_id}/invoice` - Create a
/// draft invoice from a shipment.
async fn create_draft(
    State(state): State<AppState>,
    Path((company_id, shipment_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<CreateInvoiceRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let invoice_date = payload
        .invoice_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let repo = InvoiceRepository::new((*state.db).clone());
    let created = repo
        .create_draft(company_id, shipment_id, invoice_date)
        .await?;

    info!(
        company_id = %company_id,
        invoice = %created.invoice.number,
        "Draft invoice created"
    );
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(created))))
}

/// POST `/companies/{company_id}/shipments/{shipment_id}/invoice/approve` -
/// Create and finalize in one step.
async fn approve(
    State(state): State<AppState>,
    Path((company_id, shipment_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<ApproveRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;
    let invoice_date = payload
        .invoice_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let repo = InvoiceRepository::new((*state.db).clone());
    let finalized = repo
        .create_and_finalize(
            company_id,
            shipment_id,
            invoice_date,
            FinalizeInput {
                finalized_by: payload.finalized_by,
                transport_details: payload.transport_details,
                eway_bill_number: payload.eway_bill_number,
            },
        )
        .await?;

    info!(
        company_id = %company_id,
        invoice = %finalized.invoice.number,
        total = %finalized.invoice.total_amount,
        "Invoice created and finalized"
    );
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(finalized))))
}

/// GET `/companies/{company_id}/invoices/{invoice_id}` - Fetch an invoice
/// with its lines.
async fn get_invoice(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo.get(company_id, invoice_id).await?;
    Ok(Json(InvoiceResponse::from(invoice)))
}

/// DELETE `/companies/{company_id}/invoices/{invoice_id}` - Delete a draft.
async fn delete_draft(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    repo.delete_draft(company_id, invoice_id).await?;

    info!(company_id = %company_id, invoice_id = %invoice_id, "Draft invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/companies/{company_id}/invoices/{invoice_id}/finalize` - Finalize a
/// draft, assigning it to the ledger.
async fn finalize(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
    payload: Option<Json<FinalizeRequest>>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let finalized = repo
        .finalize(
            company_id,
            invoice_id,
            FinalizeInput {
                finalized_by: payload.finalized_by,
                transport_details: payload.transport_details,
                eway_bill_number: payload.eway_bill_number,
            },
        )
        .await?;

    info!(
        company_id = %company_id,
        invoice = %finalized.invoice.number,
        total = %finalized.invoice.total_amount,
        "Invoice finalized"
    );
    Ok(Json(InvoiceResponse::from(finalized)))
}
