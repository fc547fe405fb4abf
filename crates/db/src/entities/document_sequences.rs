//! `SeaORM` Entity for the document_sequences table.
//!
//! One counter row per (company, document type, period). The single source
//! of truth for document numbering; advanced only by the atomic upsert in
//! the sequence repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub doc_type: String,
    /// `2026` for yearly sequences, `2026-08` for dispatch numbers.
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_key: String,
    pub last_value: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
