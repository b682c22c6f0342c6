//! # Daily Position
//!
//! Aggregates one branch's ledger for one day into the figures the closing
//! process compares against the counted drawer.
//!
//! ```text
//! sales (branch, date) ─┬─ Cash ─────────────► cash_sales     (Σ booked income)
//!                       ├─ DigitalWallet A/B ► digital_sales  (Σ booked income)
//!                       ├─ StoreCredit ──────► credit_sales   (Σ amount)
//!                       └─ Closing ──────────► closing_record
//!
//! expenses (branch, date) ───────────────────► total_expenses (Σ amount)
//!
//! theoretical_cash = cash_sales - total_expenses
//! ```
//!
//! Aggregation is a pure function of the records it is given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;
use crate::types::{ExpenseRecord, PaymentMethod, SaleRecord};

/// Cash position of a branch for one business day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPosition {
    pub branch: String,
    pub date: NaiveDate,
    pub cash_sales: Money,
    pub digital_sales: Money,
    pub credit_sales: Money,
    pub total_expenses: Money,
    pub theoretical_cash: Money,
    /// Non-closing sales counted.
    pub sale_count: usize,
    pub expense_count: usize,
    /// Present once the day has been closed.
    pub closing_record: Option<SaleRecord>,
}

impl DailyPosition {
    /// Empty position for a day with no activity.
    pub fn empty(branch: &str, date: NaiveDate) -> Self {
        DailyPosition {
            branch: branch.to_string(),
            date,
            cash_sales: Money::zero(),
            digital_sales: Money::zero(),
            credit_sales: Money::zero(),
            total_expenses: Money::zero(),
            theoretical_cash: Money::zero(),
            sale_count: 0,
            expense_count: 0,
            closing_record: None,
        }
    }

    /// Builds the position from raw ledger rows.
    ///
    /// Rows for other branches or dates are ignored, so callers may pass a
    /// wider range than the day itself. A total that would overflow is
    /// reported as `InvalidAmount` naming that total.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::position::DailyPosition;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    /// let position = DailyPosition::from_records("Centro", date, &[], &[]).unwrap();
    /// assert!(position.theoretical_cash.is_zero());
    /// assert!(!position.is_closed());
    /// ```
    pub fn from_records(
        branch: &str,
        date: NaiveDate,
        sales: &[SaleRecord],
        expenses: &[ExpenseRecord],
    ) -> LedgerResult<Self> {
        let mut position = DailyPosition::empty(branch, date);

        for sale in sales
            .iter()
            .filter(|s| s.branch == branch && s.business_date == date)
        {
            match sale.payment_method {
                PaymentMethod::Cash => {
                    accumulate(&mut position.cash_sales, sale.booked_income(), "cash sales")?
                }
                PaymentMethod::DigitalWalletA | PaymentMethod::DigitalWalletB => {
                    accumulate(&mut position.digital_sales, sale.booked_income(), "digital sales")?
                }
                PaymentMethod::StoreCredit => {
                    accumulate(&mut position.credit_sales, sale.amount(), "credit sales")?
                }
                PaymentMethod::Closing => {
                    if position.closing_record.is_none() {
                        position.closing_record = Some(sale.clone());
                    }
                    continue;
                }
            }
            position.sale_count += 1;
        }

        for expense in expenses
            .iter()
            .filter(|e| e.branch == branch && e.business_date == date)
        {
            accumulate(&mut position.total_expenses, expense.amount(), "total expenses")?;
            position.expense_count += 1;
        }

        position.theoretical_cash = position
            .cash_sales
            .checked_sub(position.total_expenses)
            .ok_or(LedgerError::InvalidAmount {
                field: "theoretical cash",
                value: position.total_expenses,
            })?;
        Ok(position)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closing_record.is_some()
    }

    /// Variance stored on the closing record, if the day is closed.
    pub fn variance(&self) -> Option<Money> {
        self.closing_record.as_ref().and_then(SaleRecord::variance)
    }

    /// Everything sold that day regardless of how it was paid.
    pub fn gross_sales(&self) -> Option<Money> {
        Money::checked_sum([self.cash_sales, self.digital_sales, self.credit_sales])
    }
}

/// Adds `amount` into a running total, failing instead of wrapping.
pub(crate) fn accumulate(total: &mut Money, amount: Money, field: &'static str) -> LedgerResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or(LedgerError::InvalidAmount { field, value: amount })?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseReason;
    use chrono::Utc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn sale(branch: &str, method: PaymentMethod, cents: i64) -> SaleRecord {
        let (income, debt) = match method {
            PaymentMethod::StoreCredit => (0, cents),
            _ => (cents, 0),
        };
        SaleRecord {
            id: format!("{method}-{cents}"),
            branch: branch.to_string(),
            payment_method: method,
            amount_cents: cents,
            tendered_cents: cents,
            change_cents: 0,
            booked_income_cents: income,
            booked_debt_cents: debt,
            credit_customer_name: None,
            credit_customer_phone: None,
            note: None,
            business_date: date(),
            created_at: Utc::now(),
        }
    }

    fn expense(cents: i64) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("x-{cents}"),
            branch: "Centro".to_string(),
            reason: ExpenseReason::Supplier,
            amount_cents: cents,
            note: None,
            detail: None,
            business_date: date(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_position_sums_by_method_class() {
        let sales = vec![
            sale("Centro", PaymentMethod::Cash, 300_000),
            sale("Centro", PaymentMethod::Cash, 200_000),
            sale("Centro", PaymentMethod::DigitalWalletA, 100_000),
            sale("Centro", PaymentMethod::DigitalWalletB, 200_000),
            sale("Centro", PaymentMethod::StoreCredit, 30_000),
        ];
        let expenses = vec![expense(100_000), expense(20_000)];

        let position = DailyPosition::from_records("Centro", date(), &sales, &expenses).unwrap();

        assert_eq!(position.cash_sales, Money::from_cents(500_000));
        assert_eq!(position.digital_sales, Money::from_cents(300_000));
        assert_eq!(position.credit_sales, Money::from_cents(30_000));
        assert_eq!(position.total_expenses, Money::from_cents(120_000));
        assert_eq!(position.theoretical_cash, Money::from_cents(380_000));
        assert_eq!(position.sale_count, 5);
        assert_eq!(position.expense_count, 2);
        assert_eq!(position.gross_sales(), Some(Money::from_cents(830_000)));
        assert!(!position.is_closed());
    }

    #[test]
    fn test_position_ignores_other_branches_and_days() {
        let mut yesterday = sale("Centro", PaymentMethod::Cash, 999);
        yesterday.business_date = date().pred_opt().unwrap();
        let sales = vec![sale("Norte", PaymentMethod::Cash, 500), yesterday];

        let position = DailyPosition::from_records("Centro", date(), &sales, &[]).unwrap();
        assert_eq!(position, DailyPosition::empty("Centro", date()));
    }

    #[test]
    fn test_closing_record_is_excluded_from_sums() {
        let mut closing = sale("Centro", PaymentMethod::Closing, 375_000);
        closing.booked_income_cents = -5_000;
        let sales = vec![sale("Centro", PaymentMethod::Cash, 500_000), closing];

        let position = DailyPosition::from_records("Centro", date(), &sales, &[]).unwrap();

        assert_eq!(position.cash_sales, Money::from_cents(500_000));
        assert_eq!(position.sale_count, 1);
        assert!(position.is_closed());
        assert_eq!(position.variance(), Some(Money::from_cents(-5_000)));
    }

    #[test]
    fn test_expenses_can_exceed_cash() {
        let position =
            DailyPosition::from_records("Centro", date(), &[], &[expense(45_000_000)]).unwrap();
        assert_eq!(position.theoretical_cash, Money::from_cents(-45_000_000));
    }

    #[test]
    fn test_overflowing_totals_are_errors() {
        let huge = 5_000_000_000_000_000_000;
        let sales = vec![
            sale("Centro", PaymentMethod::Cash, huge),
            sale("Centro", PaymentMethod::Cash, huge),
        ];
        let err = DailyPosition::from_records("Centro", date(), &sales, &[]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "cash sales", .. }));

        let expenses = vec![expense(huge), expense(huge)];
        let err = DailyPosition::from_records("Centro", date(), &[], &expenses).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "total expenses", .. }));

        // Each sum fits; cash minus expenses does not.
        let sales = vec![sale("Centro", PaymentMethod::Cash, -huge)];
        let err = DailyPosition::from_records("Centro", date(), &sales, &[expense(i64::MAX)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "theoretical cash", .. }));
    }

    #[test]
    fn test_gross_sales_overflow_is_none() {
        let sales = vec![
            sale("Centro", PaymentMethod::Cash, i64::MAX),
            sale("Centro", PaymentMethod::DigitalWalletA, 1),
        ];
        let position = DailyPosition::from_records("Centro", date(), &sales, &[]).unwrap();
        assert_eq!(position.gross_sales(), None);
    }
}
