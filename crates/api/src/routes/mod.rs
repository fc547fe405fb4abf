//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod credit_notes;
pub mod health;
pub mod invoices;
pub mod journal_entries;
pub mod payments;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(credit_notes::routes())
        .merge(journal_entries::routes())
}
