//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError, routes::invoices::InvoiceSummary};
use khata_core::payment::PaymentMethod;
use khata_db::entities::payments;
use khata_db::repositories::{PaymentRepository, RecordPaymentInput};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/invoices/{invoice_id}/payments",
            post(record_payment),
        )
        .route(
            "/companies/{company_id}/invoices/{invoice_id}/payments",
            get(list_payments),
        )
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    /// Amount received; must not exceed the balance due.
    pub amount: Decimal,
    /// cash | cheque | bank_transfer | upi | card | neft_rtgs | imps | others.
    pub method: PaymentMethod,
    /// Value date; defaults to today.
    pub payment_date: Option<NaiveDate>,
    /// Method-specific reference (cheque no, UTR, UPI txn id).
    #[validate(length(max = 100))]
    pub reference: Option<String>,
}

/// Response for a recorded payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment id.
    pub id: Uuid,
    /// Receipt number (`PMT-…`).
    pub payment_number: String,
    /// Paid invoice.
    pub invoice_id: Uuid,
    /// Amount received.
    pub amount: String,
    /// Payment method.
    pub method: khata_db::entities::sea_orm_active_enums::PaymentMethod,
    /// Value date.
    pub payment_date: NaiveDate,
    /// Method-specific reference.
    pub reference: Option<String>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(payment: payments::Model) -> Self {
        Self {
            id: payment.id,
            payment_number: payment.payment_number,
            invoice_id: payment.invoice_id,
            amount: payment.amount.to_string(),
            method: payment.method,
            payment_date: payment.payment_date,
            reference: payment.reference,
        }
    }
}

/// POST `/companies/{company_id}/invoices/{invoice_id}/payments` - Record a
/// payment against a finalized invoice.
async fn record_payment(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let payment_date = payload
        .payment_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let repo = PaymentRepository::new((*state.db).clone());
    let recorded = repo
        .record_payment(
            company_id,
            RecordPaymentInput {
                invoice_id,
                amount: payload.amount,
                method: payload.method,
                payment_date,
                reference: payload.reference,
            },
        )
        .await?;

    info!(
        company_id = %company_id,
        payment = %recorded.payment.payment_number,
        amount = %recorded.payment.amount,
        "Payment recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "payment": PaymentResponse::from(recorded.payment),
            "invoice": InvoiceSummary::from(recorded.invoice),
        })),
    ))
}

/// GET `/companies/{company_id}/invoices/{invoice_id}/payments` - List
/// payments for an invoice, oldest first.
async fn list_payments(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentRepository::new((*state.db).clone());
    let payments = repo.list_for_invoice(company_id, invoice_id).await?;

    let payments: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "payments": payments })))
}
