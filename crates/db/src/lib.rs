//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! All transaction boundaries live here: every engine operation (draft
//! creation, finalization, payment, credit note) is one database
//! transaction that either fully commits or fully rolls back.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, CreditNoteRepository, InvoiceRepository, JournalRepository,
    PaymentRepository, SequenceRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
