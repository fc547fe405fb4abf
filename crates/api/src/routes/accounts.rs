//! Chart-of-accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};
use khata_core::ledger::AccountType;
use khata_db::entities::ledger_accounts;
use khata_db::repositories::{AccountRepository, CreateAccountInput};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/accounts", get(list_accounts))
        .route("/companies/{company_id}/accounts", post(create_account))
        .route(
            "/companies/{company_id}/accounts/{account_id}",
            get(get_account),
        )
        .route(
            "/companies/{company_id}/accounts/{account_id}/deactivate",
            post(deactivate_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Account name, unique within the company.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// asset | liability | income | expense | equity.
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Response for a ledger account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account id.
    pub id: Uuid,
    /// Account name.
    pub name: String,
    /// Account classification.
    #[serde(rename = "type")]
    pub account_type: khata_db::entities::sea_orm_active_enums::AccountType,
    /// Running balance, signed by the account's normal side.
    pub balance: String,
    /// Seeded system accounts cannot be modified.
    pub is_system: bool,
    /// Deactivated accounts reject new postings.
    pub is_active: bool,
}

impl From<ledger_accounts::Model> for AccountResponse {
    fn from(account: ledger_accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
            balance: account.current_balance.to_string(),
            is_system: account.is_system,
            is_active: account.is_active,
        }
    }
}

/// GET `/companies/{company_id}/accounts` - List accounts, active first.
async fn list_accounts(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let accounts = repo.list_accounts(company_id).await?;

    let accounts: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/companies/{company_id}/accounts` - Create a custom account.
async fn create_account(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let repo = AccountRepository::new((*state.db).clone());
    let account = repo
        .create_account(
            company_id,
            CreateAccountInput {
                name: payload.name,
                account_type: payload.account_type,
            },
        )
        .await?;

    info!(company_id = %company_id, account = %account.name, "Account created");
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET `/companies/{company_id}/accounts/{account_id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    Path((company_id, account_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.get_account(company_id, account_id).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// POST `/companies/{company_id}/accounts/{account_id}/deactivate` -
/// Deactivate a non-system account. Accounts are never deleted.
async fn deactivate_account(
    State(state): State<AppState>,
    Path((company_id, account_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.deactivate_account(company_id, account_id).await?;

    info!(company_id = %company_id, account = %account.name, "Account deactivated");
    Ok(Json(AccountResponse::from(account)))
}
