//! # Reports
//!
//! Read-only summaries over a span of ledger rows.

use std::collections::HashMap;

use crate::error::LedgerResult;
use crate::money::Money;
use crate::position::accumulate;
use crate::types::{MethodBreakdown, PaymentMethod, SaleRecord};

/// Totals per payment method, closings excluded, largest total first.
///
/// Ties on the total fall back to the method name so the order is stable.
/// A per-method total that would overflow is an `InvalidAmount`.
pub fn method_breakdown(sales: &[SaleRecord]) -> LedgerResult<Vec<MethodBreakdown>> {
    let mut groups: HashMap<PaymentMethod, MethodBreakdown> = HashMap::new();

    for sale in sales.iter().filter(|s| !s.payment_method.is_closing()) {
        let entry = groups
            .entry(sale.payment_method)
            .or_insert_with(|| MethodBreakdown {
                payment_method: sale.payment_method,
                sale_count: 0,
                total_amount: Money::zero(),
                booked_income: Money::zero(),
                booked_debt: Money::zero(),
                average_amount: Money::zero(),
            });
        entry.sale_count += 1;
        accumulate(&mut entry.total_amount, sale.amount(), "total amount")?;
        accumulate(&mut entry.booked_income, sale.booked_income(), "booked income")?;
        accumulate(&mut entry.booked_debt, sale.booked_debt(), "booked debt")?;
    }

    let mut rows: Vec<MethodBreakdown> = groups
        .into_values()
        .map(|mut row| {
            row.average_amount = average(row.total_amount, row.sale_count);
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.payment_method.as_str().cmp(b.payment_method.as_str()))
    });
    Ok(rows)
}

/// Mean in cents, ties rounded half-to-even.
fn average(total: Money, count: i64) -> Money {
    if count <= 0 {
        return Money::zero();
    }
    let cents = total.cents();
    let quotient = cents.div_euclid(count);
    let remainder = cents.rem_euclid(count);

    let round_up = match (remainder * 2).cmp(&count) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => quotient % 2 != 0,
        std::cmp::Ordering::Less => false,
    };

    Money::from_cents(if round_up { quotient + 1 } else { quotient })
}

// =============================================================================
// Unit Tests
// =============================================================================
