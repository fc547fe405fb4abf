//! Document sequence repository.
//!
//! Allocates document numbers from per-(company, type, period) counter rows
//! with a single atomic upsert. Allocation runs inside the caller's database
//! transaction so an aborted operation never leaves a half-created document
//! behind a consumed number without its row.

use chrono::NaiveDate;
use khata_core::numbering::{DocumentType, format_number};
use sea_orm::{ConnectionTrait, DbErr, SqlErr, Statement};
use uuid::Uuid;

/// Error types for sequence allocation.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Retry budget exhausted while racing for a counter row.
    #[error("Could not allocate a {doc_type} number after {attempts} attempts")]
    NumberingConflict {
        /// Document type identifier.
        doc_type: &'static str,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Retry budget for counter-row races.
const MAX_ATTEMPTS: u32 = 3;

const ALLOCATE_SQL: &str = r"
INSERT INTO document_sequences (company_id, doc_type, period_key, last_value, updated_at)
VALUES ($1, $2, $3, 1, NOW())
ON CONFLICT (company_id, doc_type, period_key)
DO UPDATE SET last_value = document_sequences.last_value + 1, updated_at = NOW()
RETURNING last_value
";

/// Race-free document number allocation.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRepository;

impl SequenceRepository {
    /// Allocates the next document number for `doc_type` dated `date`.
    ///
    /// The counter advance and the caller's inserts share one transaction;
    /// `conn` should be the caller's open `DatabaseTransaction`.
    ///
    /// # Errors
    ///
    /// Returns `NumberingConflict` when the retry budget is exhausted, or
    /// `Database` for any other failure.
    pub async fn next_number<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        doc_type: DocumentType,
        date: NaiveDate,
    ) -> Result<String, SequenceError> {
        let period_key = doc_type.period_key(date);

        for attempt in 1..=MAX_ATTEMPTS {
            match Self::allocate(conn, company_id, doc_type, &period_key).await {
                Ok(sequence) => return Ok(format_number(doc_type, &period_key, sequence)),
                Err(err) => match err.sql_err() {
                    // Two writers can race to create a missing counter row;
                    // the loser retries and lands on the DO UPDATE arm.
                    Some(SqlErr::UniqueConstraintViolation(_)) if attempt < MAX_ATTEMPTS => {
                        tracing::debug!(
                            doc_type = doc_type.as_str(),
                            %company_id,
                            attempt,
                            "sequence allocation retry"
                        );
                    }
                    _ => return Err(SequenceError::Database(err)),
                },
            }
        }

        Err(SequenceError::NumberingConflict {
            doc_type: doc_type.as_str(),
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Advances the counter row and returns the new value.
    async fn allocate<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        doc_type: DocumentType,
        period_key: &str,
    ) -> Result<i64, DbErr> {
        let stmt = Statement::from_sql_and_values(
            conn.get_database_backend(),
            ALLOCATE_SQL,
            [
                company_id.into(),
                doc_type.as_str().into(),
                period_key.into(),
            ],
        );

        let row = conn.query_one(stmt).await?.ok_or_else(|| {
            DbErr::RecordNotFound("document sequence upsert returned no row".into())
        })?;

        row.try_get("", "last_value")
    }
}
