//! # Expense Repository
//!
//! Append-only storage for money leaving the drawer.
//!
//! Payroll batches go through [`ExpenseRepository::append_batch`], which
//! writes every line inside one transaction: a failure on any line leaves
//! the ledger exactly as it was.

use caja_core::ExpenseRecord;
use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for the expense ledger.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Appends one expense.
    pub async fn append(&self, record: &ExpenseRecord) -> DbResult<()> {
        debug!(
            id = %record.id,
            branch = %record.branch,
            reason = %record.reason,
            amount_cents = record.amount_cents,
            "Appending expense"
        );

        insert_expense(&self.pool, record).await
    }

    /// Appends every record or none of them.
    pub async fn append_batch(&self, records: &[ExpenseRecord]) -> DbResult<()> {
        debug!(lines = records.len(), "Appending expense batch");

        let mut tx = self.pool.begin().await?;

        for record in records {
            insert_expense(&mut *tx, record).await?;
        }

        tx.commit().await?;

        info!(lines = records.len(), "Expense batch committed");
        Ok(())
    }

    /// Expenses of one branch with `from <= business_date <= to`, oldest first.
    pub async fn list_for_branch(
        &self,
        branch: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<ExpenseRecord>> {
        debug!(branch = %branch, %from, %to, "Listing expenses");

        let expenses = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, branch, reason, amount_cents, note, detail, business_date, created_at
            FROM expenses
            WHERE branch = ?1 AND business_date BETWEEN ?2 AND ?3
            ORDER BY business_date, created_at
            "#,
        )
        .bind(branch)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}

async fn insert_expense<'e, X>(executor: X, record: &ExpenseRecord) -> DbResult<()>
where
    X: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO expenses (
            id, branch, reason, amount_cents, note, detail, business_date, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&record.id)
    .bind(&record.branch)
    .bind(record.reason)
    .bind(record.amount_cents)
    .bind(&record.note)
    .bind(&record.detail)
    .bind(record.business_date)
    .bind(record.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
