//! Ledger account repository for chart-of-accounts operations.
//!
//! Balances are never written here; only the posting path in the journal
//! repository mutates `current_balance`, and only via atomic increments.

use chrono::Utc;
use khata_core::ledger::AccountType as CoreAccountType;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{ledger_accounts, sea_orm_active_enums::AccountType};

/// Names of the seeded system chart. System accounts cannot be renamed or
/// deactivated; the posting templates look them up by these names.
pub mod system_accounts {
    /// Cash in hand (asset).
    pub const CASH: &str = "Cash";
    /// Bank account (asset).
    pub const BANK: &str = "Bank";
    /// Receivables from customers (asset).
    pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
    /// Stock on hand (asset).
    pub const INVENTORY: &str = "Inventory";
    /// Sales revenue (income).
    pub const SALES: &str = "Sales";
    /// Cost of goods sold (expense).
    pub const COGS: &str = "Cost of Goods Sold";
    /// CGST output tax (liability).
    pub const CGST_PAYABLE: &str = "CGST Payable";
    /// SGST output tax (liability).
    pub const SGST_PAYABLE: &str = "SGST Payable";
    /// IGST output tax (liability).
    pub const IGST_PAYABLE: &str = "IGST Payable";
}

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// No account with the given name.
    #[error("Account not found by name: {0}")]
    NameNotFound(String),

    /// Account name already in use for this company.
    #[error("Account name already exists: {0}")]
    NameTaken(String),

    /// System accounts cannot be renamed or deactivated.
    #[error("System account cannot be modified: {0}")]
    SystemAccountImmutable(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a custom ledger account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name, unique per company.
    pub name: String,
    /// Classification, decides debit/credit polarity.
    pub account_type: CoreAccountType,
}

/// Chart-of-accounts repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Seeds the system chart for a company. Idempotent: existing rows are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_system_chart(&self, company_id: Uuid) -> Result<(), AccountError> {
        let system_chart: [(&str, AccountType); 9] = [
            (system_accounts::CASH, AccountType::Asset),
            (system_accounts::BANK, AccountType::Asset),
            (system_accounts::ACCOUNTS_RECEIVABLE, AccountType::Asset),
            (system_accounts::INVENTORY, AccountType::Asset),
            (system_accounts::SALES, AccountType::Income),
            (system_accounts::COGS, AccountType::Expense),
            (system_accounts::CGST_PAYABLE, AccountType::Liability),
            (system_accounts::SGST_PAYABLE, AccountType::Liability),
            (system_accounts::IGST_PAYABLE, AccountType::Liability),
        ];

        let now = Utc::now().into();
        let rows = system_chart
            .into_iter()
            .map(|(name, account_type)| ledger_accounts::ActiveModel {
                id: Set(Uuid::new_v4()),
                company_id: Set(company_id),
                name: Set(name.to_owned()),
                account_type: Set(account_type),
                current_balance: Set(Decimal::ZERO),
                is_system: Set(true),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            });

        ledger_accounts::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    ledger_accounts::Column::CompanyId,
                    ledger_accounts::Column::Name,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Creates a custom (non-system) account with a zero opening balance.
    ///
    /// # Errors
    ///
    /// Returns `NameTaken` if the name exists for this company.
    pub async fn create_account(
        &self,
        company_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<ledger_accounts::Model, AccountError> {
        let now = Utc::now().into();
        let account = ledger_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(input.name.clone()),
            account_type: Set(input.account_type.into()),
            current_balance: Set(Decimal::ZERO),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match account.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AccountError::NameTaken(input.name))
                }
                _ => Err(AccountError::Database(err)),
            },
        }
    }

    /// Lists accounts for a company, active first, then by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<ledger_accounts::Model>, AccountError> {
        let accounts = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::CompanyId.eq(company_id))
            .order_by_desc(ledger_accounts::Column::IsActive)
            .order_by_asc(ledger_accounts::Column::Name)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Gets an account by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such account exists for this company.
    pub async fn get_account(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<ledger_accounts::Model, AccountError> {
        ledger_accounts::Entity::find_by_id(account_id)
            .filter(ledger_accounts::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Fetches the current balance of an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such account exists for this company.
    pub async fn get_balance(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<Decimal, AccountError> {
        let account = self.get_account(company_id, account_id).await?;
        Ok(account.current_balance)
    }

    /// Deactivates a custom account. Accounts are never deleted; posted
    /// journal lines may still reference them.
    ///
    /// # Errors
    ///
    /// Returns `SystemAccountImmutable` for seeded accounts, `NotFound` if
    /// the account does not exist for this company.
    pub async fn deactivate_account(
        &self,
        company_id: Uuid,
        account_id: Uuid,
    ) -> Result<ledger_accounts::Model, AccountError> {
        let txn = self.db.begin().await?;

        let account = ledger_accounts::Entity::find_by_id(account_id)
            .filter(ledger_accounts::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(account_id))?;

        if account.is_system {
            return Err(AccountError::SystemAccountImmutable(account.name));
        }

        let mut active: ledger_accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Looks up an active account by name inside the caller's connection.
    /// Posting paths use this to resolve the system chart within their own
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `NameNotFound` if no active account carries the name.
    pub async fn find_by_name<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        name: &str,
    ) -> Result<ledger_accounts::Model, AccountError> {
        ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::CompanyId.eq(company_id))
            .filter(ledger_accounts::Column::Name.eq(name))
            .filter(ledger_accounts::Column::IsActive.eq(true))
            .one(conn)
            .await?
            .ok_or_else(|| AccountError::NameNotFound(name.to_owned()))
    }
}
