use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::domain::{
    Budget, Cents, NewTransaction, Transaction, TransactionFilter, TransactionId,
    TransactionPatch, TransactionType, YearMonth, format_date, parse_date,
};

use super::MIGRATION_001_INITIAL;

const TRANSACTION_COLUMNS: &str = "id, date, amount_cents, category, type";

/// A stored row that no longer satisfies the data model.
#[derive(Error, Debug)]
#[error("corrupt {table} record {key}: {reason}")]
pub struct CorruptRecord {
    pub table: &'static str,
    pub key: String,
    pub reason: String,
}

/// Per-type totals for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthTotals {
    pub income: Cents,
    pub expense: Cents,
    pub count: i64,
}

/// Expense sum for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: Cents,
    pub count: i64,
}

/// Repository for persisting and querying transactions and budgets.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file at `path` and migrate it.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::init(options)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))
    }

    /// Fresh database that lives only as long as the repository.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?;
        Self::init(options).await
    }

    async fn init(options: SqliteConnectOptions) -> Result<Self> {
        // One connection: the tool is single-user and in-memory databases are per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let repo = Self::new(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Transaction operations
    // ========================

    /// Insert a transaction and return its new id.
    pub async fn insert_transaction(&self, transaction: &NewTransaction) -> Result<TransactionId> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (date, amount_cents, category, type)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(format_date(transaction.date))
        .bind(transaction.amount_cents)
        .bind(&transaction.category)
        .bind(transaction.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert transaction")?;

        Ok(row.try_get("id")?)
    }

    /// Get a transaction by id.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// Apply the set fields of `patch`. Returns the updated row, or `None` when `id` is absent.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE transactions
            SET date = COALESCE(?, date),
                amount_cents = COALESCE(?, amount_cents),
                category = COALESCE(?, category),
                type = COALESCE(?, type)
            WHERE id = ?
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(patch.date.map(format_date))
        .bind(patch.amount_cents)
        .bind(patch.category.as_deref())
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// Delete a transaction. Returns false when `id` is absent.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(result.rows_affected() > 0)
    }

    /// List transactions matching the filter, oldest first.
    pub async fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut query = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE 1=1");

        let month_str = filter.month.map(|m| m.to_string());

        if month_str.is_some() {
            query.push_str(" AND substr(date, 1, 7) = ?");
        }
        if filter.category.is_some() {
            query.push_str(" AND category = ?");
        }
        if filter.kind.is_some() {
            query.push_str(" AND type = ?");
        }

        query.push_str(" ORDER BY date, id");

        let mut sql_query = sqlx::query(&query);

        if let Some(ref month) = month_str {
            sql_query = sql_query.bind(month);
        }
        if let Some(ref category) = filter.category {
            sql_query = sql_query.bind(category);
        }
        if let Some(kind) = filter.kind {
            sql_query = sql_query.bind(kind.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Income and expense totals for a month, summed in SQL.
    pub async fn month_totals(&self, month: YearMonth) -> Result<MonthTotals> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount_cents ELSE 0 END), 0) AS income,
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount_cents ELSE 0 END), 0) AS expense,
                COUNT(*) AS count
            FROM transactions
            WHERE substr(date, 1, 7) = ?
            "#,
        )
        .bind(month.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute month totals")?;

        Ok(MonthTotals {
            income: row.try_get("income")?,
            expense: row.try_get("expense")?,
            count: row.try_get("count")?,
        })
    }

    /// Expense sums per category for a month, largest first.
    pub async fn expense_by_category(&self, month: YearMonth) -> Result<Vec<CategoryAggregate>> {
        let rows = sqlx::query(
            r#"
            SELECT category, SUM(amount_cents) AS total, COUNT(*) AS count
            FROM transactions
            WHERE type = 'expense' AND substr(date, 1, 7) = ?
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
        )
        .bind(month.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate expenses by category")?;

        rows.iter()
            .map(|row| {
                Ok(CategoryAggregate {
                    category: row.try_get("category")?,
                    total: row.try_get("total")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let id: TransactionId = row.try_get("id")?;
        let date_str: String = row.try_get("date")?;
        let amount_cents: Cents = row.try_get("amount_cents")?;
        let type_str: String = row.try_get("type")?;

        let corrupt = |reason: String| CorruptRecord {
            table: "transactions",
            key: id.to_string(),
            reason,
        };

        let date = parse_date(&date_str).map_err(|e| corrupt(e.to_string()))?;
        let kind = TransactionType::from_str(&type_str).map_err(|e| corrupt(e.to_string()))?;
        if amount_cents <= 0 {
            return Err(corrupt(format!("non-positive amount {amount_cents}")).into());
        }

        Ok(Transaction {
            id,
            date,
            amount_cents,
            category: row.try_get("category")?,
            kind,
        })
    }

    // ========================
    // Budget operations
    // ========================

    /// Insert or overwrite the budget for its month.
    pub async fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (month, limit_cents)
            VALUES (?, ?)
            ON CONFLICT(month) DO UPDATE SET limit_cents = excluded.limit_cents
            "#,
        )
        .bind(budget.month.to_string())
        .bind(budget.limit_cents)
        .execute(&self.pool)
        .await
        .context("Failed to save budget")?;
        Ok(())
    }

    /// Get the budget for a month.
    pub async fn get_budget(&self, month: YearMonth) -> Result<Option<Budget>> {
        let row = sqlx::query("SELECT month, limit_cents FROM budgets WHERE month = ?")
            .bind(month.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch budget")?;

        row.as_ref().map(Self::row_to_budget).transpose()
    }

    /// List all budgets, oldest month first.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let rows = sqlx::query("SELECT month, limit_cents FROM budgets ORDER BY month")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    fn row_to_budget(row: &SqliteRow) -> Result<Budget> {
        let month_str: String = row.try_get("month")?;
        let limit_cents: Cents = row.try_get("limit_cents")?;

        let month = YearMonth::from_str(&month_str).map_err(|e| CorruptRecord {
            table: "budgets",
            key: month_str.clone(),
            reason: e.to_string(),
        })?;

        Ok(Budget { month, limit_cents })
    }
}
