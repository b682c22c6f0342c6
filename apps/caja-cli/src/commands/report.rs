//! # Report Command

use anyhow::Result;
use caja_ledger::Ledger;
use chrono::NaiveDate;

use super::Output;

pub async fn breakdown(
    ledger: &Ledger,
    from: NaiveDate,
    to: NaiveDate,
    branch: Option<&str>,
    output: &Output,
) -> Result<()> {
    let rows = ledger.positions().method_breakdown(from, to, branch).await?;

    output.emit(&rows, |out| {
        let mut lines = vec![
            format!("{} to {} ({})", from, to, branch.unwrap_or("all branches")),
            format!(
                "  {:<18} {:>6} {:>14} {:>14} {:>14} {:>14}",
                "method", "sales", "total", "income", "debt", "average"
            ),
        ];
        lines.extend(rows.iter().map(|r| {
            format!(
                "  {:<18} {:>6} {:>14} {:>14} {:>14} {:>14}",
                r.payment_method.as_str(),
                r.sale_count,
                out.money(r.total_amount),
                out.money(r.booked_income),
                out.money(r.booked_debt),
                out.money(r.average_amount)
            )
        }));
        if rows.is_empty() {
            lines.push("  no sales".to_string());
        }
        lines
    })
}
