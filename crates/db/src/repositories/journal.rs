//! Journal repository: the persistence side of the posting engine.
//!
//! Every posting validates in `khata-core` first, allocates a JE number,
//! inserts the entry with its lines, and applies each line's signed effect
//! to the account balances via atomic SQL increments. All of it happens in
//! the caller's transaction so a failed posting rolls back everything,
//! including the operation that triggered it.

use chrono::{NaiveDate, Utc};
use khata_core::ledger::{JournalLineSpec, JournalSource, LedgerError, balance_change, validate_lines};
use khata_core::numbering::DocumentType;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{journal_entries, journal_lines, ledger_accounts};

use super::sequence::{SequenceError, SequenceRepository};

/// Error types for journal posting.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Validation or idempotency failure from the ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Entry number allocation failed.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for posting a journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// Owning company.
    pub company_id: Uuid,
    /// Source document classification.
    pub source: JournalSource,
    /// Id of the source document (invoice, payment, or a caller-generated
    /// id for manual entries).
    pub source_id: Uuid,
    /// Entry date; also scopes the JE number period.
    pub entry_date: NaiveDate,
    /// Human-readable narration.
    pub narration: String,
    /// The lines to post; validated before anything persists.
    pub lines: Vec<JournalLineSpec>,
}

/// A journal entry with its lines, in line order.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Ordered lines.
    pub lines: Vec<journal_lines::Model>,
}

const APPLY_BALANCE_SQL: &str = r"
UPDATE ledger_accounts
SET current_balance = current_balance + $1, updated_at = NOW()
WHERE id = $2
";

/// Journal posting repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a manual journal entry in its own transaction.
    ///
    /// Manual entries flow through exactly the same validation and balance
    /// path as engine-generated ones; only the source type differs.
    ///
    /// # Errors
    ///
    /// Returns a `JournalError` if validation fails, the source was already
    /// posted, or the database operation fails.
    pub async fn post_manual(
        &self,
        company_id: Uuid,
        entry_date: NaiveDate,
        narration: String,
        lines: Vec<JournalLineSpec>,
    ) -> Result<EntryWithLines, JournalError> {
        let txn = self.db.begin().await?;

        let entry = Self::post_in(
            &txn,
            PostEntryInput {
                company_id,
                source: JournalSource::Manual,
                source_id: Uuid::new_v4(),
                entry_date,
                narration,
                lines,
            },
        )
        .await?;

        txn.commit().await?;
        Ok(entry)
    }

    /// Posts a journal entry inside the caller's transaction.
    ///
    /// Used by invoice finalization, payment recording, and credit notes so
    /// the posting commits or rolls back together with the operation.
    ///
    /// # Errors
    ///
    /// Returns `Ledger(Unbalanced)` and friends for invalid lines,
    /// `Ledger(AlreadyPosted)` when the source was posted before,
    /// `Ledger(AccountNotFound/AccountInactive)` for bad accounts.
    pub async fn post_in<C: ConnectionTrait>(
        conn: &C,
        input: PostEntryInput,
    ) -> Result<EntryWithLines, JournalError> {
        validate_lines(&input.lines).map_err(JournalError::Ledger)?;

        let entry_number = SequenceRepository::next_number(
            conn,
            input.company_id,
            DocumentType::Journal,
            input.entry_date,
        )
        .await?;

        let total_debit: Decimal = input.lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = input.lines.iter().map(|l| l.credit).sum();

        let now = Utc::now().into();
        let entry_id = Uuid::new_v4();
        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            company_id: Set(input.company_id),
            entry_number: Set(entry_number.clone()),
            entry_date: Set(input.entry_date),
            source_type: Set(input.source.as_str().to_owned()),
            source_id: Set(input.source_id),
            narration: Set(input.narration.clone()),
            total_debit: Set(total_debit),
            total_credit: Set(total_credit),
            created_at: Set(now),
        };

        let entry = match entry.insert(conn).await {
            Ok(model) => model,
            // The (company, source_type, source_id) unique index turns a
            // double post into a clean idempotency failure.
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg))
                    if msg.contains("uq_journal_entries_source") =>
                {
                    return Err(JournalError::Ledger(LedgerError::AlreadyPosted {
                        source_type: input.source.as_str().to_owned(),
                        source_id: input.source_id,
                    }));
                }
                _ => return Err(JournalError::Database(err)),
            },
        };

        let mut lines = Vec::with_capacity(input.lines.len());
        for (index, spec) in input.lines.iter().enumerate() {
            let account = Self::load_account(conn, input.company_id, spec.account_id).await?;

            let line = journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                entry_id: Set(entry_id),
                line_no: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
                account_id: Set(spec.account_id),
                debit: Set(spec.debit),
                credit: Set(spec.credit),
                bill_ref: Set(spec.bill_ref.clone()),
                created_at: Set(now),
            };
            let line = line.insert(conn).await?;

            let delta = balance_change(account.account_type.into(), spec.debit, spec.credit);
            Self::apply_balance(conn, spec.account_id, delta).await?;

            lines.push(line);
        }

        tracing::info!(
            company_id = %input.company_id,
            entry_number = %entry_number,
            source_type = input.source.as_str(),
            source_id = %input.source_id,
            %total_debit,
            %total_credit,
            "journal entry posted"
        );

        Ok(EntryWithLines { entry, lines })
    }

    /// Finds the posted entry for a source document, with lines in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_source<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        source: JournalSource,
        source_id: Uuid,
    ) -> Result<Option<EntryWithLines>, JournalError> {
        let Some(entry) = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id))
            .filter(journal_entries::Column::SourceType.eq(source.as_str()))
            .filter(journal_entries::Column::SourceId.eq(source_id))
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry.id))
            .order_by_asc(journal_lines::Column::LineNo)
            .all(conn)
            .await?;

        Ok(Some(EntryWithLines { entry, lines }))
    }

    /// Gets a journal entry by id with lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_entry(
        &self,
        company_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<EntryWithLines>, JournalError> {
        let Some(entry) = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry.id))
            .order_by_asc(journal_lines::Column::LineNo)
            .all(&self.db)
            .await?;

        Ok(Some(EntryWithLines { entry, lines }))
    }

    /// Loads an account for posting, rejecting unknown or inactive ones.
    async fn load_account<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<ledger_accounts::Model, JournalError> {
        let account = ledger_accounts::Entity::find_by_id(account_id)
            .filter(ledger_accounts::Column::CompanyId.eq(company_id))
            .one(conn)
            .await?
            .ok_or(JournalError::Ledger(LedgerError::AccountNotFound(
                account_id,
            )))?;

        if !account.is_active {
            return Err(JournalError::Ledger(LedgerError::AccountInactive(
                account_id,
            )));
        }

        Ok(account)
    }

    /// Applies a signed balance change with a single atomic increment.
    /// Never read-modify-write; safe under concurrent postings to the same
    /// account.
    async fn apply_balance<C: ConnectionTrait>(
        conn: &C,
        account_id: Uuid,
        delta: Decimal,
    ) -> Result<(), JournalError> {
        let stmt = Statement::from_sql_and_values(
            conn.get_database_backend(),
            APPLY_BALANCE_SQL,
            [delta.into(), account_id.into()],
        );
        conn.execute(stmt).await?;
        Ok(())
    }
}
