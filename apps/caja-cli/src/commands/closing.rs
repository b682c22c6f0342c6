//! # Position and Closing Commands

use anyhow::Result;
use caja_core::{DailyPosition, Money, Session, VarianceKind};
use caja_ledger::Ledger;
use chrono::NaiveDate;

use super::Output;

pub async fn position(ledger: &Ledger, session: &Session, date: NaiveDate, output: &Output) -> Result<()> {
    let position = ledger
        .positions()
        .compute_position(&session.branch, date)
        .await?;

    output.emit(&position, |out| describe_position(&position, out))
}

pub async fn close(
    ledger: &Ledger,
    session: &Session,
    date: NaiveDate,
    counted: Money,
    note: Option<&str>,
    output: &Output,
) -> Result<()> {
    let record = ledger
        .closings()
        .close_day(session, date, counted, note)
        .await?;

    let variance = record.variance().unwrap_or_default();
    output.emit(&record, |out| {
        let verdict = match VarianceKind::of(variance) {
            VarianceKind::Balanced => "balanced".to_string(),
            VarianceKind::Surplus => format!("surplus of {}", out.money(variance)),
            VarianceKind::Shortage => format!("shortage of {}", out.money(-variance)),
        };
        vec![
            format!("{} closed for {}", record.business_date, record.branch),
            format!("  counted  {}", out.money(record.amount())),
            format!("  variance {} ({})", out.money(variance), verdict),
        ]
    })
}

fn describe_position(position: &DailyPosition, out: &Output) -> Vec<String> {
    let row = |label: &str, amount: Money| format!("  {:<18} {:>14}", label, out.money(amount));

    let mut lines = vec![
        format!("{} at {}", position.date, position.branch),
        row("Cash sales", position.cash_sales),
        row("Digital sales", position.digital_sales),
        row("Store credit", position.credit_sales),
        row("Expenses", position.total_expenses),
        row("Theoretical cash", position.theoretical_cash),
        format!(
            "  {} sale(s), {} expense(s)",
            position.sale_count, position.expense_count
        ),
    ];

    match (&position.closing_record, position.variance()) {
        (Some(closing), Some(variance)) => {
            lines.push(row("Counted", closing.amount()));
            lines.push(row("Variance", variance));
        }
        _ => lines.push("  open".to_string()),
    }
    lines
}
