//! # Sale Repository
//!
//! Append-only storage for the sales ledger, closings included.
//!
//! ## Closing Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 append_closing(branch, date, reconcile)                 │
//! │                                                                         │
//! │  acquire one pooled connection                                          │
//! │       │                                                                 │
//! │  BEGIN IMMEDIATE ◄── takes the write lock now; a second closer waits    │
//! │       │                                                                 │
//! │  closing row for (branch, date)? ──yes──► ROLLBACK, ClosingExists       │
//! │       │ no                                                              │
//! │  load the day's sales + expenses                                        │
//! │       │                                                                 │
//! │  reconcile(day) ──err──► ROLLBACK, caller's error                       │
//! │       │ closing record                                                  │
//! │  INSERT ──unique index──► ROLLBACK, ClosingExists                       │
//! │       │                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::{ExpenseRecord, PaymentMethod, SaleRecord};
use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::DayLedger;

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends one sale. A single INSERT is atomic on its own.
    pub async fn append(&self, record: &SaleRecord) -> DbResult<()> {
        debug!(
            id = %record.id,
            branch = %record.branch,
            method = %record.payment_method,
            amount_cents = record.amount_cents,
            "Appending sale"
        );

        insert_sale(&self.pool, record).await
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleRecord>> {
        debug!(id = %id, "Loading sale");

        let sale = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT
                id, branch, payment_method,
                amount_cents, tendered_cents, change_cents,
                booked_income_cents, booked_debt_cents,
                credit_customer_name, credit_customer_phone, note,
                business_date, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Sales of one branch with `from <= business_date <= to`, oldest first.
    pub async fn list_for_branch(
        &self,
        branch: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<SaleRecord>> {
        debug!(branch = %branch, %from, %to, "Listing sales");
        select_sales(&self.pool, branch, from, to).await
    }

    /// Sales across all branches, or one branch when given.
    pub async fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        branch: Option<&str>,
    ) -> DbResult<Vec<SaleRecord>> {
        debug!(branch = ?branch, %from, %to, "Listing sales across branches");

        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT
                id, branch, payment_method,
                amount_cents, tendered_cents, change_cents,
                booked_income_cents, booked_debt_cents,
                credit_customer_name, credit_customer_phone, note,
                business_date, created_at
            FROM sales
            WHERE business_date BETWEEN ?1 AND ?2
              AND (?3 IS NULL OR branch = ?3)
            ORDER BY business_date, created_at
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// The closing row of a branch's day, if the day is closed.
    pub async fn find_closing(&self, branch: &str, date: NaiveDate) -> DbResult<Option<SaleRecord>> {
        debug!(branch = %branch, %date, "Looking up closing");
        select_closing(&self.pool, branch, date).await
    }

    /// Checks for an existing closing, reads the day and writes the closing
    /// row as one serialized unit.
    ///
    /// `reconcile` receives everything recorded for the day and returns the
    /// closing row to insert. It runs while the write lock is held, so it must
    /// not touch the database itself.
    ///
    /// ## Errors
    /// - `DbError::ClosingExists` when the day is already closed
    /// - whatever `reconcile` returns; nothing is written in that case
    pub async fn append_closing<F, E>(
        &self,
        branch: &str,
        date: NaiveDate,
        reconcile: F,
    ) -> Result<SaleRecord, E>
    where
        F: FnOnce(DayLedger) -> Result<SaleRecord, E>,
        E: From<DbError>,
    {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;

        debug!(branch = %branch, %date, "Beginning closing transaction");
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::TransactionFailed(format!("begin closing: {e}")))?;

        let outcome = close_in_transaction(&mut *conn, branch, date, reconcile).await;

        let committed = match outcome {
            Ok(record) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| record)
                .map_err(|e| E::from(DbError::TransactionFailed(format!("commit closing: {e}")))),
            Err(err) => Err(err),
        };

        if committed.is_err() {
            if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                warn!(branch = %branch, %date, error = %e, "Rollback of closing transaction failed");
            }
        } else {
            info!(branch = %branch, %date, "Closing committed");
        }

        committed
    }
}

// =============================================================================
// Shared statements (pool or open transaction)
// =============================================================================

async fn close_in_transaction<F, E>(
    conn: &mut SqliteConnection,
    branch: &str,
    date: NaiveDate,
    reconcile: F,
) -> Result<SaleRecord, E>
where
    F: FnOnce(DayLedger) -> Result<SaleRecord, E>,
    E: From<DbError>,
{
    if select_closing(&mut *conn, branch, date).await?.is_some() {
        return Err(DbError::ClosingExists {
            branch: branch.to_string(),
            date,
        }
        .into());
    }

    let sales = select_sales(&mut *conn, branch, date, date).await?;
    let expenses = sqlx::query_as::<_, ExpenseRecord>(
        r#"
        SELECT id, branch, reason, amount_cents, note, detail, business_date, created_at
        FROM expenses
        WHERE branch = ?1 AND business_date = ?2
        ORDER BY created_at
        "#,
    )
    .bind(branch)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
    .map_err(DbError::from)?;

    let record = reconcile(DayLedger { sales, expenses })?;

    match insert_sale(&mut *conn, &record).await {
        Ok(()) => Ok(record),
        Err(e) if e.is_unique_violation() => Err(DbError::ClosingExists {
            branch: branch.to_string(),
            date,
        }
        .into()),
        Err(e) => Err(e.into()),
    }
}

async fn insert_sale<'e, X>(executor: X, record: &SaleRecord) -> DbResult<()>
where
    X: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO sales (
            id, branch, payment_method,
            amount_cents, tendered_cents, change_cents,
            booked_income_cents, booked_debt_cents,
            credit_customer_name, credit_customer_phone, note,
            business_date, created_at
        ) VALUES (
            ?1, ?2, ?3,
            ?4, ?5, ?6,
            ?7, ?8,
            ?9, ?10, ?11,
            ?12, ?13
        )
        "#,
    )
    .bind(&record.id)
    .bind(&record.branch)
    .bind(record.payment_method)
    .bind(record.amount_cents)
    .bind(record.tendered_cents)
    .bind(record.change_cents)
    .bind(record.booked_income_cents)
    .bind(record.booked_debt_cents)
    .bind(&record.credit_customer_name)
    .bind(&record.credit_customer_phone)
    .bind(&record.note)
    .bind(record.business_date)
    .bind(record.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

async fn select_sales<'e, X>(
    executor: X,
    branch: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> DbResult<Vec<SaleRecord>>
where
    X: SqliteExecutor<'e>,
{
    let sales = sqlx::query_as::<_, SaleRecord>(
        r#"
        SELECT
            id, branch, payment_method,
            amount_cents, tendered_cents, change_cents,
            booked_income_cents, booked_debt_cents,
            credit_customer_name, credit_customer_phone, note,
            business_date, created_at
        FROM sales
        WHERE branch = ?1 AND business_date BETWEEN ?2 AND ?3
        ORDER BY business_date, created_at
        "#,
    )
    .bind(branch)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(sales)
}

async fn select_closing<'e, X>(
    executor: X,
    branch: &str,
    date: NaiveDate,
) -> DbResult<Option<SaleRecord>>
where
    X: SqliteExecutor<'e>,
{
    let closing = sqlx::query_as::<_, SaleRecord>(
        r#"
        SELECT
            id, branch, payment_method,
            amount_cents, tendered_cents, change_cents,
            booked_income_cents, booked_debt_cents,
            credit_customer_name, credit_customer_phone, note,
            business_date, created_at
        FROM sales
        WHERE branch = ?1 AND business_date = ?2 AND payment_method = ?3
        "#,
    )
    .bind(branch)
    .bind(date)
    .bind(PaymentMethod::Closing)
    .fetch_optional(executor)
    .await?;

    Ok(closing)
}

// =============================================================================
// Unit Tests
// =============================================================================
