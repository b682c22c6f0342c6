//! # Expense and Payroll Commands

use anyhow::{bail, Result};
use caja_core::{EmployeeRecord, ExpenseReason, ExpenseRecord, Money, Session};
use caja_ledger::Ledger;

use super::Output;

pub async fn record(
    ledger: &Ledger,
    session: &Session,
    reason: ExpenseReason,
    amount: Money,
    note: Option<&str>,
    output: &Output,
) -> Result<()> {
    let record = ledger
        .expenses()
        .record_expense(session, reason, amount, note)
        .await?;

    output.emit(&record, |out| {
        vec![format!(
            "Expense {} recorded: {} {}",
            record.id,
            record.reason,
            out.money(record.amount())
        )]
    })
}

pub async fn payroll(
    ledger: &Ledger,
    session: &Session,
    ids: &[String],
    all: bool,
    note: Option<&str>,
    output: &Output,
) -> Result<()> {
    let recorder = ledger.expenses();
    let active = recorder.list_active_employees(&session.branch).await?;
    let selected = select_employees(active, ids, all)?;

    let records = recorder.record_payroll_batch(session, &selected, note).await?;

    output.emit(&records, |out| {
        let total = Money::checked_sum(records.iter().map(ExpenseRecord::amount))
            .map(|t| out.money(t))
            .unwrap_or_else(|| "overflow".to_string());
        let mut lines: Vec<String> = records
            .iter()
            .map(|r| {
                format!(
                    "  {:<30} {:>14}",
                    r.detail.as_deref().unwrap_or_default(),
                    out.money(r.amount())
                )
            })
            .collect();
        lines.insert(0, format!("Payroll recorded for {} employee(s)", records.len()));
        lines.push(format!("  {:<30} {:>14}", "Total", total));
        lines
    })
}

/// Resolves typed ids against the branch's active employees.
///
/// An empty selection is passed through so the recorder reports it.
fn select_employees(
    active: Vec<EmployeeRecord>,
    ids: &[String],
    all: bool,
) -> Result<Vec<EmployeeRecord>> {
    if all {
        return Ok(active);
    }

    let unknown: Vec<&str> = ids
        .iter()
        .filter(|id| !active.iter().any(|e| &e.id == *id))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("not active employees of this branch: {}", unknown.join(", "));
    }

    Ok(active.into_iter().filter(|e| ids.contains(&e.id)).collect())
}
