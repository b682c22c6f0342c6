//! # Roster Command

use anyhow::Result;
use caja_core::{Money, Session};
use caja_ledger::Ledger;

use super::Output;

pub async fn show(ledger: &Ledger, session: &Session, output: &Output) -> Result<()> {
    let roster = ledger.expenses().payroll_roster(session).await?;

    output.emit(&roster, |out| {
        let mut lines = vec![format!("Active employees at {}", session.branch)];
        lines.extend(roster.iter().map(|e| {
            let last_paid = e
                .last_paid_at
                .map(|t| t.date_naive().to_string())
                .unwrap_or_else(|| "never".to_string());
            format!(
                "  {:<36} {:<24} {:>14}  last paid {}",
                e.id,
                e.name,
                out.money(Money::from_cents(e.base_salary_cents)),
                last_paid
            )
        }));
        lines
    })
}
