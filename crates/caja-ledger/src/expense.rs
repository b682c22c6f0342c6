//! # Expense Recorder
//!
//! Single expenses for any role, payroll batches for the owner, and the
//! roster lookups payroll needs.

use caja_core::expense::{payroll_lines, ExpenseLine};
use caja_core::validation::validate_branch;
use caja_core::{
    EmployeeRecord, ExpenseReason, ExpenseRecord, LedgerError, LedgerResult, Money, RosterEntry,
    Session,
};
use tracing::{info, warn};

use crate::LedgerContext;

#[derive(Debug, Clone)]
pub struct ExpenseRecorder {
    ctx: LedgerContext,
}

impl ExpenseRecorder {
    pub(crate) fn new(ctx: LedgerContext) -> Self {
        ExpenseRecorder { ctx }
    }

    /// Records one expense. Payroll is owner-only.
    pub async fn record_expense(
        &self,
        session: &Session,
        reason: ExpenseReason,
        amount: Money,
        note: Option<&str>,
    ) -> LedgerResult<ExpenseRecord> {
        validate_branch(&session.branch)?;

        let line = ExpenseLine::new(session.role, reason, amount, note, self.ctx.config.note_max_len)
            .map_err(|e| {
                warn!(branch = %session.branch, %reason, code = e.code(), error = %e, "Expense rejected");
                e
            })?;

        let now = self.ctx.now();
        let record = line.into_record(
            LedgerContext::new_id(),
            &session.branch,
            self.ctx.business_date(now),
            now,
        );

        self.ctx.db.expenses().append(&record).await?;

        info!(
            id = %record.id,
            branch = %record.branch,
            %reason,
            amount = %record.amount(),
            "Expense recorded"
        );
        Ok(record)
    }

    /// Pays the base salary of every selected employee in one transaction.
    ///
    /// ## Checks (before any write)
    /// 1. Owner role, else `Unauthorized`
    /// 2. Non-empty selection, else `EmptySelection`
    /// 3. Each employee active, in this branch, with a positive salary
    ///
    /// A storage failure part-way rolls back every line.
    pub async fn record_payroll_batch(
        &self,
        session: &Session,
        employees: &[EmployeeRecord],
        note: Option<&str>,
    ) -> LedgerResult<Vec<ExpenseRecord>> {
        validate_branch(&session.branch)?;

        let lines = payroll_lines(session, employees, note, self.ctx.config.note_max_len)
            .map_err(|e| {
                warn!(branch = %session.branch, code = e.code(), error = %e, "Payroll rejected");
                e
            })?;

        let now = self.ctx.now();
        let date = self.ctx.business_date(now);
        let records: Vec<ExpenseRecord> = lines
            .into_iter()
            .map(|line| line.into_record(LedgerContext::new_id(), &session.branch, date, now))
            .collect();

        let total = Money::checked_sum(records.iter().map(ExpenseRecord::amount)).ok_or_else(|| {
            LedgerError::InvalidAmount {
                field: "payroll total",
                value: records.iter().map(ExpenseRecord::amount).max().unwrap_or_default(),
            }
        })?;

        self.ctx.db.expenses().append_batch(&records).await?;

        info!(
            branch = %session.branch,
            employees = records.len(),
            total = %total,
            "Payroll recorded"
        );
        Ok(records)
    }

    /// Active employees of a branch.
    pub async fn list_active_employees(&self, branch: &str) -> LedgerResult<Vec<EmployeeRecord>> {
        Ok(self.ctx.db.employees().list_active(branch).await?)
    }

    /// Active employees of the session's branch with their last payroll
    /// payment.
    pub async fn payroll_roster(&self, session: &Session) -> LedgerResult<Vec<RosterEntry>> {
        validate_branch(&session.branch)?;
        Ok(self.ctx.db.employees().payroll_roster(&session.branch).await?)
    }
}
