//! Manual journal entry routes.

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
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};
use khata_core::ledger::JournalLineSpec;
use khata_db::repositories::{EntryWithLines, JournalRepository};
use khata_shared::AppError;

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/journal-entries",
            post(post_manual_entry),
        )
        .route(
            "/companies/{company_id}/journal-entries/{entry_id}",
            get(get_entry),
        )
}

/// One line of a manual journal entry request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ManualLineRequest {
    /// Ledger account to post to.
    pub account_id: Uuid,
    /// Debit amount; omit or zero for credit lines.
    pub debit: Option<Decimal>,
    /// Credit amount; omit or zero for debit lines.
    pub credit: Option<Decimal>,
    /// Optional bill reference.
    pub bill_ref: Option<String>,
}

/// Request body for posting a manual journal entry.
#[derive(Debug, Deserialize, Validate)]
pub struct ManualEntryRequest {
    /// Entry date; defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// Human-readable narration.
    #[validate(length(min = 1, max = 500))]
    pub narration: String,
    /// At least two lines; debits and credits must balance.
    #[validate(length(min = 2))]
    pub lines: Vec<ManualLineRequest>,
}

/// Response for one journal line.
#[derive(Debug, Serialize)]
pub struct JournalLineResponse {
    /// Line number, 1-based.
    pub line_no: i32,
    /// Posted account.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: String,
    /// Credit amount.
    pub credit: String,
    /// Optional bill reference.
    pub bill_ref: Option<String>,
}

/// Response for a journal entry with lines.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Entry id.
    pub id: Uuid,
    /// `JE-…` entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// invoice | cogs | payment | credit_note | manual.
    pub source_type: String,
    /// Source document id.
    pub source_id: Uuid,
    /// Narration.
    pub narration: String,
    /// Sum of debits.
    pub total_debit: String,
    /// Sum of credits; always equals the debit total.
    pub total_credit: String,
    /// Ordered lines.
    pub lines: Vec<JournalLineResponse>,
}

impl From<EntryWithLines> for JournalEntryResponse {
    fn from(value: EntryWithLines) -> Self {
        let EntryWithLines { entry, lines } = value;
        Self {
            id: entry.id,
            entry_number: entry.entry_number,
            entry_date: entry.entry_date,
            source_type: entry.source_type,
            source_id: entry.source_id,
            narration: entry.narration,
            total_debit: entry.total_debit.to_string(),
            total_credit: entry.total_credit.to_string(),
            lines: lines
                .into_iter()
                .map(|l| JournalLineResponse {
                    line_no: l.line_no,
                    account_id: l.account_id,
                    debit: l.debit.to_string(),
                    credit: l.credit.to_string(),
                    bill_ref: l.bill_ref,
                })
                .collect(),
        }
    }
}

/// POST `/companies/{company_id}/journal-entries` - Post a manual journal
/// entry.
async fn post_manual_entry(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<ManualEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;
    let entry_date = payload
        .entry_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let lines: Vec<JournalLineSpec> = payload
        .lines
        .into_iter()
        .map(|l| JournalLineSpec {
            account_id: l.account_id,
            debit: l.debit.unwrap_or(Decimal::ZERO),
            credit: l.credit.unwrap_or(Decimal::ZERO),
            bill_ref: l.bill_ref,
        })
        .collect();

    let repo = JournalRepository::new((*state.db).clone());
    let posted = repo
        .post_manual(company_id, entry_date, payload.narration, lines)
        .await?;

    info!(
        company_id = %company_id,
        entry = %posted.entry.entry_number,
        total = %posted.entry.total_debit,
        "Manual journal entry posted"
    );
    Ok((
        StatusCode::CREATED,
        Json(JournalEntryResponse::from(posted)),
    ))
}

/// GET `/companies/{company_id}/journal-entries/{entry_id}` - Fetch a journal
/// entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    Path((company_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let repo = JournalRepository::new((*state.db).clone());
    let entry = repo
        .get_entry(company_id, entry_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound(format!("Journal entry not found: {entry_id}"))))?;

    Ok(Json(JournalEntryResponse::from(entry)))
}
