//! # Closing Reconciler
//!
//! Compares the counted drawer with the day's theoretical cash and writes the
//! closing row. A branch's day closes at most once, even when two closers
//! race.
//!
//! ```text
//! close_day(session, date, counted)
//!      │
//!      ├── date after today? ──► InvalidDate
//!      │
//!      └── append_closing ─────── BEGIN IMMEDIATE ──────────────┐
//!               │  existing closing? ──► AlreadyClosed          │
//!               │  read day, DailyPosition::from_records        │ one
//!               │  ClosingEntry::reconcile (variance)           │ writer
//!               │  INSERT closing row                           │
//!               └── COMMIT ─────────────────────────────────────┘
//! ```

use caja_core::closing::{validate_closing_date, ClosingEntry, VarianceKind};
use caja_core::validation::validate_branch;
use caja_core::{DailyPosition, LedgerError, LedgerResult, Money, SaleRecord, Session};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::LedgerContext;

#[derive(Debug, Clone)]
pub struct ClosingReconciler {
    ctx: LedgerContext,
}

impl ClosingReconciler {
    pub(crate) fn new(ctx: LedgerContext) -> Self {
        ClosingReconciler { ctx }
    }

    /// Closes `date` for the session's branch.
    ///
    /// Any role may close. Zero counted cash is a valid count. The stored
    /// row carries the counted amount and its variance against the position
    /// computed inside the same transaction.
    pub async fn close_day(
        &self,
        session: &Session,
        date: NaiveDate,
        counted_cash: Money,
        note: Option<&str>,
    ) -> LedgerResult<SaleRecord> {
        validate_branch(&session.branch)?;

        let now = self.ctx.now();
        validate_closing_date(date, self.ctx.business_date(now))?;

        let branch = session.branch.as_str();
        let note_max_len = self.ctx.config.note_max_len;

        let record = self
            .ctx
            .db
            .sales()
            .append_closing(branch, date, move |day| -> LedgerResult<SaleRecord> {
                let position = DailyPosition::from_records(branch, date, &day.sales, &day.expenses)?;
                let entry = ClosingEntry::reconcile(&position, counted_cash, note, note_max_len)?;
                Ok(entry.into_record(LedgerContext::new_id(), now))
            })
            .await
            .map_err(|e| {
                if matches!(e, LedgerError::AlreadyClosed { .. }) {
                    warn!(branch = %branch, %date, "Day already closed");
                }
                e
            })?;

        let variance = record.booked_income();
        match VarianceKind::of(variance) {
            VarianceKind::Shortage => warn!(
                branch = %branch,
                %date,
                counted = %record.amount(),
                %variance,
                "Day closed short"
            ),
            kind => info!(
                branch = %branch,
                %date,
                counted = %record.amount(),
                %variance,
                ?kind,
                "Day closed"
            ),
        }
        Ok(record)
    }

    /// The closing row of a day, if it has been closed.
    pub async fn find_closing(&self, branch: &str, date: NaiveDate) -> LedgerResult<Option<SaleRecord>> {
        Ok(self.ctx.db.sales().find_closing(branch, date).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::{FixedClock, Ledger, LedgerConfig};
    use caja_core::{ExpenseReason, PaymentMethod, SaleRequest};
    use caja_db::{Database, DbConfig};
    use std::sync::Arc;

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    async fn busy_day(ledger: &Ledger) {
        let cashier = Session::cashier("Centro");
        let sales = ledger.sales();
        sales.record_sale(&cashier, SaleRequest::cash(m("3000.00"), m("3000.00"))).await.unwrap();
        sales.record_sale(&cashier, SaleRequest::cash(m("2000.00"), m("2000.00"))).await.unwrap();
        sales
            .record_sale(&cashier, SaleRequest::digital(PaymentMethod::DigitalWalletA, m("700.00")))
            .await
            .unwrap();
        ledger
            .expenses()
            .record_expense(&cashier, ExpenseReason::Supplier, m("1200.00"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_close_with_shortage() {
        let (ledger, _) = testing::ledger().await;
        busy_day(&ledger).await;

        let record = ledger
            .closings()
            .close_day(&Session::cashier("Centro"), testing::today(), m("3750.00"), Some("falta cambio"))
            .await
            .unwrap();

        assert_eq!(record.payment_method, PaymentMethod::Closing);
        assert_eq!(record.amount(), m("3750.00"));
        assert_eq!(record.variance(), Some(m("-50.00")));
        assert_eq!(record.note.as_deref(), Some("falta cambio"));

        let position = ledger.positions().compute_position("Centro", testing::today()).await.unwrap();
        assert!(position.is_closed());
        assert_eq!(position.theoretical_cash, m("3800.00"));
        assert_eq!(position.variance(), Some(m("-50.00")));
    }

    #[tokio::test]
    async fn test_second_close_is_rejected() {
        let (ledger, _) = testing::ledger().await;
        busy_day(&ledger).await;
        let owner = Session::owner("Centro");
        let closings = ledger.closings();

        closings.close_day(&owner, testing::today(), m("3800.00"), None).await.unwrap();
        let err = closings
            .close_day(&owner, testing::today(), m("3900.00"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyClosed { .. }));

        let closing = closings.find_closing("Centro", testing::today()).await.unwrap().unwrap();
        assert_eq!(closing.variance(), Some(Money::zero()));
    }

    #[tokio::test]
    async fn test_future_date_rejected() {
        let (ledger, _) = testing::ledger().await;
        let tomorrow = testing::today().succ_opt().unwrap();

        let err = ledger
            .closings()
            .close_day(&Session::owner("Centro"), tomorrow, m("0"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDate { .. }));
    }

    #[tokio::test]
    async fn test_empty_day_closes_with_zero_count() {
        let (ledger, _) = testing::ledger().await;
        let yesterday = testing::today().pred_opt().unwrap();

        let record = ledger
            .closings()
            .close_day(&Session::cashier("Norte"), yesterday, Money::zero(), None)
            .await
            .unwrap();
        assert_eq!(record.business_date, yesterday);
        assert_eq!(record.variance(), Some(Money::zero()));

        let err = ledger
            .closings()
            .close_day(&Session::cashier("Norte"), yesterday, m("-1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyClosed { .. }));
    }

    #[tokio::test]
    async fn test_close_previous_day_next_morning() {
        let (ledger, clock) = testing::ledger().await;
        busy_day(&ledger).await;

        clock.set(testing::noon() + chrono::Duration::hours(20));
        assert_eq!(ledger.today(), testing::today().succ_opt().unwrap());

        let record = ledger
            .closings()
            .close_day(&Session::owner("Centro"), testing::today(), m("3850.00"), None)
            .await
            .unwrap();
        assert_eq!(record.business_date, testing::today());
        assert_eq!(record.variance(), Some(m("50.00")));
    }

    #[tokio::test]
    async fn test_negative_count_rejected() {
        let (ledger, _) = testing::ledger().await;
        let err = ledger
            .closings()
            .close_day(&Session::owner("Centro"), testing::today(), m("-1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert!(ledger.closings().find_closing("Centro", testing::today()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sales_after_closing_do_not_move_it() {
        let (ledger, _) = testing::ledger().await;
        busy_day(&ledger).await;
        ledger
            .closings()
            .close_day(&Session::owner("Centro"), testing::today(), m("3800.00"), None)
            .await
            .unwrap();

        ledger
            .sales()
            .record_sale(&Session::cashier("Centro"), SaleRequest::cash(m("100"), m("100")))
            .await
            .unwrap();

        let position = ledger.positions().compute_position("Centro", testing::today()).await.unwrap();
        assert_eq!(position.theoretical_cash, m("3900.00"));
        assert_eq!(position.variance(), Some(Money::zero()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_close_commits_once() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("caja.db")).max_connections(4))
            .await
            .unwrap();
        let clock = Arc::new(FixedClock::new(testing::noon()));
        let ledger = Ledger::new(db, clock, LedgerConfig::default());
        busy_day(&ledger).await;

        let handles: Vec<_> = ["3800.00", "3700.00"]
            .into_iter()
            .map(|counted| {
                let closings = ledger.closings();
                tokio::spawn(async move {
                    closings
                        .close_day(&Session::cashier("Centro"), testing::today(), m(counted), None)
                        .await
                })
            })
            .collect();

        let mut committed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(LedgerError::AlreadyClosed { .. }) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!((committed, rejected), (1, 1));

        let day = testing::today();
        let closings: Vec<_> = ledger
            .database()
            .sales()
            .list_for_branch("Centro", day, day)
            .await
            .unwrap()
            .into_iter()
            .filter(|s| s.payment_method == PaymentMethod::Closing)
            .collect();
        assert_eq!(closings.len(), 1);
    }
}
