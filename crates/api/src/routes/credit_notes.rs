//! Credit note routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    routes::invoices::{InvoiceResponse, InvoiceSummary},
};
use khata_db::repositories::CreditNoteRepository;

/// Creates the credit note routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/companies/{company_id}/invoices/{invoice_id}/credit-note",
        post(create_credit_note),
    )
}

/// Request body for crediting a finalized invoice.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCreditNoteRequest {
    /// Credit note date; defaults to today.
    pub credit_note_date: Option<NaiveDate>,
    /// Reason for the credit note (goods returned, billing error, ...).
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// POST `/companies/{company_id}/invoices/{invoice_id}/credit-note` - Issue a
/// credit note reversing a finalized invoice.
async fn create_credit_note(
    State(state): State<AppState>,
    Path((company_id, invoice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateCreditNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let credit_note_date = payload
        .credit_note_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let repo = CreditNoteRepository::new((*state.db).clone());
    let result = repo
        .create_credit_note(company_id, invoice_id, credit_note_date, &payload.reason)
        .await?;

    info!(
        company_id = %company_id,
        credit_note = %result.credit_note.invoice.number,
        original = %result.original.number,
        "Credit note issued"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "credit_note": InvoiceResponse::from(result.credit_note),
            "original": InvoiceSummary::from(result.original),
        })),
    ))
}
