//! # Position Calculator
//!
//! Read-only views over the ledger: a branch's daily position and the
//! per-method breakdown over a date range. Neither ever writes.

use caja_core::report::method_breakdown;
use caja_core::{DailyPosition, LedgerResult, MethodBreakdown, ValidationError};
use chrono::NaiveDate;
use tracing::debug;

use crate::LedgerContext;

#[derive(Debug, Clone)]
pub struct PositionCalculator {
    ctx: LedgerContext,
}

impl PositionCalculator {
    pub(crate) fn new(ctx: LedgerContext) -> Self {
        PositionCalculator { ctx }
    }

    /// Cash position of `branch` on `date`.
    ///
    /// Any date is accepted; a day with no records (including one in the
    /// future) yields an all-zero, open position.
    pub async fn compute_position(&self, branch: &str, date: NaiveDate) -> LedgerResult<DailyPosition> {
        let sales = self.ctx.db.sales().list_for_branch(branch, date, date).await?;
        let expenses = self.ctx.db.expenses().list_for_branch(branch, date, date).await?;

        let position = DailyPosition::from_records(branch, date, &sales, &expenses)?;

        debug!(
            branch = %branch,
            %date,
            theoretical_cash = %position.theoretical_cash,
            closed = position.is_closed(),
            "Position computed"
        );
        Ok(position)
    }

    /// Totals per payment method over `from..=to`, closings excluded, for
    /// one branch or all of them.
    pub async fn method_breakdown(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        branch: Option<&str>,
    ) -> LedgerResult<Vec<MethodBreakdown>> {
        if from > to {
            return Err(ValidationError::InvalidFormat {
                field: "date range".to_string(),
                reason: format!("{from} is after {to}"),
            }
            .into());
        }

        let sales = self.ctx.db.sales().list_between(from, to, branch).await?;
        method_breakdown(&sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use caja_core::{ExpenseReason, LedgerError, Money, PaymentMethod, SaleRecord, SaleRequest, Session};

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_position_scenario() {
        let (ledger, _) = testing::ledger().await;
        let cashier = Session::cashier("Centro");
        let sales = ledger.sales();

        sales.record_sale(&cashier, SaleRequest::cash(m("3000.00"), m("3000.00"))).await.unwrap();
        sales.record_sale(&cashier, SaleRequest::cash(m("2000.00"), m("2500.00"))).await.unwrap();
        sales
            .record_sale(&cashier, SaleRequest::digital(PaymentMethod::DigitalWalletA, m("3000.00")))
            .await
            .unwrap();
        sales
            .record_sale(&cashier, SaleRequest::store_credit(m("450.00"), "Doña Rosa", None))
            .await
            .unwrap();
        ledger
            .expenses()
            .record_expense(&cashier, ExpenseReason::Supplier, m("1200.00"), None)
            .await
            .unwrap();

        let calculator = ledger.positions();
        let position = calculator.compute_position("Centro", testing::today()).await.unwrap();

        assert_eq!(position.cash_sales, m("5000.00"));
        assert_eq!(position.digital_sales, m("3000.00"));
        assert_eq!(position.credit_sales, m("450.00"));
        assert_eq!(position.total_expenses, m("1200.00"));
        assert_eq!(position.theoretical_cash, m("3800.00"));
        assert!(position.closing_record.is_none());

        // No intervening writes, same answer
        let again = calculator.compute_position("Centro", testing::today()).await.unwrap();
        assert_eq!(again, position);
    }

    #[tokio::test]
    async fn test_empty_and_future_days() {
        let (ledger, _) = testing::ledger().await;
        let future = testing::today().succ_opt().unwrap();

        let position = ledger.positions().compute_position("Centro", future).await.unwrap();
        assert_eq!(position, DailyPosition::empty("Centro", future));
    }

    #[tokio::test]
    async fn test_method_breakdown() {
        let (ledger, _) = testing::ledger().await;
        let sales = ledger.sales();

        sales
            .record_sale(&Session::cashier("Centro"), SaleRequest::cash(m("100"), m("100")))
            .await
            .unwrap();
        sales
            .record_sale(
                &Session::cashier("Norte"),
                SaleRequest::digital(PaymentMethod::DigitalWalletB, m("250")),
            )
            .await
            .unwrap();

        let day = testing::today();
        let calculator = ledger.positions();

        let all = calculator.method_breakdown(day, day, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].payment_method, PaymentMethod::DigitalWalletB);

        let centro = calculator.method_breakdown(day, day, Some("Centro")).await.unwrap();
        assert_eq!(centro.len(), 1);
        assert_eq!(centro[0].total_amount, m("100"));

        let tomorrow = day.succ_opt().unwrap();
        assert!(calculator.method_breakdown(tomorrow, day, None).await.is_err());
    }

    #[tokio::test]
    async fn test_huge_sales_are_rejected_and_position_survives() {
        let (ledger, _) = testing::ledger().await;
        let cashier = Session::cashier("Centro");
        let huge = m("50000000000000000.00");

        for _ in 0..2 {
            let err = ledger
                .sales()
                .record_sale(&cashier, SaleRequest::cash(huge, huge))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount { field: "amount", .. }));
        }

        let position = ledger.positions().compute_position("Centro", testing::today()).await.unwrap();
        assert_eq!(position, DailyPosition::empty("Centro", testing::today()));
    }

    #[tokio::test]
    async fn test_overflowing_stored_rows_yield_error() {
        let (ledger, _) = testing::ledger().await;
        let day = testing::today();

        // Rows written straight to the store, past request validation
        for id in ["big-1", "big-2"] {
            let row = SaleRecord {
                id: id.to_string(),
                branch: "Centro".to_string(),
                payment_method: PaymentMethod::Cash,
                amount_cents: 5_000_000_000_000_000_000,
                tendered_cents: 5_000_000_000_000_000_000,
                change_cents: 0,
                booked_income_cents: 5_000_000_000_000_000_000,
                booked_debt_cents: 0,
                credit_customer_name: None,
                credit_customer_phone: None,
                note: None,
                business_date: day,
                created_at: testing::noon(),
            };
            ledger.database().sales().append(&row).await.unwrap();
        }

        let calculator = ledger.positions();
        let err = calculator.compute_position("Centro", day).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "cash sales", .. }));

        let err = calculator.method_breakdown(day, day, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    }
}
