//! # Expense and Payroll Rules
//!
//! Validates money leaving the drawer for reasons other than change.
//!
//! ## Payroll Batch
//! ```text
//! Owner selects employees ──► dedupe by id ──► one line per employee
//!                                                 │
//!                              reason = Payroll   │
//!                              amount = base salary
//!                              detail = "Sueldo de <name>"
//!                                                 │
//!                                                 ▼
//!                               written together or not at all
//! ```

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::money::Money;
use crate::types::{EmployeeRecord, ExpenseReason, ExpenseRecord, Role, Session};
use crate::validation::validate_note;
use crate::PAYROLL_DETAIL_PREFIX;

/// One validated expense, ready to be stamped and appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub reason: ExpenseReason,
    pub amount: Money,
    pub note: Option<String>,
    pub detail: Option<String>,
}

impl ExpenseLine {
    /// Validates a single expense.
    ///
    /// ## Checks (in order)
    /// 1. The role may record the reason (payroll is owner-only)
    /// 2. The amount is positive and within `MAX_AMOUNT`
    /// 3. The note fits `note_max_len`
    pub fn new(
        role: Role,
        reason: ExpenseReason,
        amount: Money,
        note: Option<&str>,
        note_max_len: usize,
    ) -> LedgerResult<Self> {
        authorize(role, reason)?;

        if !amount.is_positive() || !amount.is_within_limit() {
            return Err(LedgerError::InvalidAmount {
                field: "amount",
                value: amount,
            });
        }

        Ok(ExpenseLine {
            reason,
            amount,
            note: validate_note(note, note_max_len)?,
            detail: None,
        })
    }

    pub fn into_record(
        self,
        id: String,
        branch: &str,
        business_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> ExpenseRecord {
        ExpenseRecord {
            id,
            branch: branch.to_string(),
            reason: self.reason,
            amount_cents: self.amount.cents(),
            note: self.note,
            detail: self.detail,
            business_date,
            created_at,
        }
    }
}

/// Rejects reasons the role may not record.
pub fn authorize(role: Role, reason: ExpenseReason) -> LedgerResult<()> {
    if role.may_record(reason) {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized(format!(
            "{reason} expenses may only be recorded by the owner"
        )))
    }
}

/// Builds the lines of a payroll batch.
///
/// Duplicate selections of the same employee are paid once. Every employee
/// must be active, belong to the session's branch and have a base salary in
/// `1..=MAX_AMOUNT`; one bad entry rejects the whole batch.
///
/// ## Example
/// ```rust
/// use caja_core::expense::payroll_lines;
/// use caja_core::types::{EmployeeRecord, Session};
///
/// let ana = EmployeeRecord {
///     id: "e1".into(),
///     name: "Ana".into(),
///     branch: "Centro".into(),
///     base_salary_cents: 45_000_000,
///     active: true,
/// };
/// let lines = payroll_lines(&Session::owner("Centro"), &[ana.clone(), ana], None, 500).unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].detail.as_deref(), Some("Sueldo de Ana"));
/// ```
pub fn payroll_lines(
    session: &Session,
    employees: &[EmployeeRecord],
    note: Option<&str>,
    note_max_len: usize,
) -> LedgerResult<Vec<ExpenseLine>> {
    authorize(session.role, ExpenseReason::Payroll)?;

    if employees.is_empty() {
        return Err(LedgerError::EmptySelection);
    }

    let note = validate_note(note, note_max_len)?;
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(employees.len());

    for employee in employees {
        if !seen.insert(employee.id.as_str()) {
            continue;
        }

        if employee.branch != session.branch {
            return Err(ValidationError::Rejected {
                field: "employee".to_string(),
                reason: format!("{} belongs to branch {}", employee.name, employee.branch),
            }
            .into());
        }

        if !employee.active {
            return Err(ValidationError::Rejected {
                field: "employee".to_string(),
                reason: format!("{} is not active", employee.name),
            }
            .into());
        }

        let salary = employee.base_salary();
        if !salary.is_positive() || !salary.is_within_limit() {
            return Err(LedgerError::InvalidAmount {
                field: "base salary",
                value: salary,
            });
        }

        lines.push(ExpenseLine {
            reason: ExpenseReason::Payroll,
            amount: salary,
            note: note.clone(),
            detail: Some(format!("{PAYROLL_DETAIL_PREFIX}{}", employee.name)),
        });
    }

    Ok(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================
