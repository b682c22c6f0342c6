//! # Employee Repository
//!
//! Roster lookup used by payroll. The ledger only reads it; `hire` exists to
//! populate the table from the seed tool and tests.

use caja_core::{EmployeeRecord, RosterEntry, PAYROLL_DETAIL_PREFIX};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the employee roster.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee.
    pub async fn hire(&self, employee: &EmployeeRecord) -> DbResult<()> {
        debug!(id = %employee.id, branch = %employee.branch, "Hiring employee");

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, branch, base_salary_cents, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.branch)
        .bind(employee.base_salary_cents)
        .bind(employee.active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active employees of a branch, by name.
    pub async fn list_active(&self, branch: &str) -> DbResult<Vec<EmployeeRecord>> {
        debug!(branch = %branch, "Listing active employees");

        let employees = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            SELECT id, name, branch, base_salary_cents, active
            FROM employees
            WHERE branch = ?1 AND active = 1
            ORDER BY name
            "#,
        )
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Total number of employees across branches.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Active employees with the time of their last payroll line.
    ///
    /// A payroll line belongs to an employee when its detail reads
    /// `"Sueldo de " + name` in the same branch.
    pub async fn payroll_roster(&self, branch: &str) -> DbResult<Vec<RosterEntry>> {
        debug!(branch = %branch, "Loading payroll roster");

        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT
                emp.id,
                emp.name,
                emp.base_salary_cents,
                MAX(ex.created_at) AS last_paid_at
            FROM employees emp
            LEFT JOIN expenses ex
                ON ex.reason = 'payroll'
               AND ex.branch = emp.branch
               AND ex.detail = ?2 || emp.name
            WHERE emp.branch = ?1 AND emp.active = 1
            GROUP BY emp.id, emp.name, emp.base_salary_cents
            ORDER BY emp.name
            "#,
        )
        .bind(branch)
        .bind(PAYROLL_DETAIL_PREFIX)
        .fetch_all(&self.pool)
        .await?;

        Ok(roster)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use caja_core::{ExpenseReason, ExpenseRecord};

    fn employee(id: &str, name: &str, active: bool) -> EmployeeRecord {
        EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            branch: "Centro".to_string(),
            base_salary_cents: 45_000_000,
            active,
        }
    }

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.employees();

        repo.hire(&employee("e2", "Luis", true)).await.unwrap();
        repo.hire(&employee("e1", "Ana", true)).await.unwrap();
        repo.hire(&employee("e3", "Marta", false)).await.unwrap();

        let active = repo.list_active("Centro").await.unwrap();
        let names: Vec<_> = active.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Luis"]);
        assert!(active.iter().all(|e| e.active));
        assert_eq!(repo.count().await.unwrap(), 3);
        assert!(repo.list_active("Norte").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_roster_reports_last_payment() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.employees().hire(&employee("e1", "Ana", true)).await.unwrap();
        db.employees().hire(&employee("e2", "Luis", true)).await.unwrap();

        let paid_at = Utc::now();
        db.expenses()
            .append(&ExpenseRecord {
                id: "x1".into(),
                branch: "Centro".into(),
                reason: ExpenseReason::Payroll,
                amount_cents: 45_000_000,
                note: None,
                detail: Some("Sueldo de Ana".into()),
                business_date: paid_at.date_naive(),
                created_at: paid_at,
            })
            .await
            .unwrap();

        let roster = db.employees().payroll_roster("Centro").await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Ana");
        assert!(roster[0].last_paid_at.is_some());
        assert_eq!(roster[1].name, "Luis");
        assert!(roster[1].last_paid_at.is_none());
    }
}
