//! # Closing Reconciliation
//!
//! Compares the counted drawer against the theoretical cash of a day and
//! produces the single closing record that finalizes it.
//!
//! ## State Transition
//! ```text
//!   ┌──────────┐   close(counted)    ┌──────────┐
//!   │  OPEN    │ ──────────────────► │  CLOSED  │
//!   │ no       │                     │ closing  │
//!   │ closing  │ ◄── never ───────── │ record   │
//!   └──────────┘                     └──────────┘
//!
//! variance = counted - theoretical
//!   > 0  surplus
//!   = 0  balanced
//!   < 0  shortage
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::money::Money;
use crate::position::DailyPosition;
use crate::types::{PaymentMethod, SaleRecord};
use crate::validation::validate_note;

/// Direction of a closing variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceKind {
    Balanced,
    Surplus,
    Shortage,
}

impl VarianceKind {
    pub fn of(variance: Money) -> Self {
        if variance.is_positive() {
            VarianceKind::Surplus
        } else if variance.is_negative() {
            VarianceKind::Shortage
        } else {
            VarianceKind::Balanced
        }
    }
}

/// Rejects closing a day that has not started yet.
pub fn validate_closing_date(date: NaiveDate, today: NaiveDate) -> LedgerResult<()> {
    if date > today {
        return Err(LedgerError::InvalidDate { date, today });
    }
    Ok(())
}

/// Outcome of reconciling a day, before it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingEntry {
    pub branch: String,
    pub date: NaiveDate,
    pub counted_cash: Money,
    pub theoretical_cash: Money,
    pub variance: Money,
    pub note: Option<String>,
}

impl ClosingEntry {
    /// Reconciles counted cash against a freshly computed position.
    ///
    /// Fails with `AlreadyClosed` when the position already carries a closing
    /// record and with `InvalidAmount` for a negative count, a count above
    /// `MAX_AMOUNT` or a variance that cannot be represented. A zero count is
    /// a legitimate (if alarming) closing.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::closing::ClosingEntry;
    /// use caja_core::money::Money;
    /// use caja_core::position::DailyPosition;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    /// let mut position = DailyPosition::empty("Centro", date);
    /// position.theoretical_cash = Money::from_cents(380_000);
    ///
    /// let entry = ClosingEntry::reconcile(&position, Money::from_cents(375_000), None, 500).unwrap();
    /// assert_eq!(entry.variance, Money::from_cents(-5_000));
    /// ```
    pub fn reconcile(
        position: &DailyPosition,
        counted_cash: Money,
        note: Option<&str>,
        note_max_len: usize,
    ) -> LedgerResult<Self> {
        if !counted_cash.is_within_limit() {
            return Err(LedgerError::InvalidAmount {
                field: "counted cash",
                value: counted_cash,
            });
        }

        if position.is_closed() {
            return Err(LedgerError::AlreadyClosed {
                branch: position.branch.clone(),
                date: position.date,
            });
        }

        let variance = counted_cash
            .checked_sub(position.theoretical_cash)
            .ok_or(LedgerError::InvalidAmount {
                field: "variance",
                value: position.theoretical_cash,
            })?;

        Ok(ClosingEntry {
            branch: position.branch.clone(),
            date: position.date,
            counted_cash,
            theoretical_cash: position.theoretical_cash,
            variance,
            note: validate_note(note, note_max_len)?,
        })
    }

    #[inline]
    pub fn kind(&self) -> VarianceKind {
        VarianceKind::of(self.variance)
    }

    /// The closing row: amount holds the count, booked income the variance.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id,
            branch: self.branch,
            payment_method: PaymentMethod::Closing,
            amount_cents: self.counted_cash.cents(),
            tendered_cents: 0,
            change_cents: 0,
            booked_income_cents: self.variance.cents(),
            booked_debt_cents: 0,
            credit_customer_name: None,
            credit_customer_phone: None,
            note: self.note,
            business_date: self.date,
            created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn position(theoretical_cents: i64) -> DailyPosition {
        let mut p = DailyPosition::empty("Centro", date());
        p.theoretical_cash = Money::from_cents(theoretical_cents);
        p
    }

    #[test]
    fn test_shortage() {
        let entry =
            ClosingEntry::reconcile(&position(380_000), Money::from_cents(375_000), None, 500)
                .unwrap();
        assert_eq!(entry.variance, Money::from_cents(-5_000));
        assert_eq!(entry.kind(), VarianceKind::Shortage);

        let record = entry.into_record("c1".into(), Utc::now());
        assert_eq!(record.payment_method, PaymentMethod::Closing);
        assert_eq!(record.amount_cents, 375_000);
        assert_eq!(record.booked_income_cents, -5_000);
        assert_eq!(record.booked_debt_cents, 0);
        assert_eq!(record.business_date, date());
        assert_eq!(record.variance(), Some(Money::from_cents(-5_000)));
    }

    #[test]
    fn test_surplus_and_balanced() {
        let surplus =
            ClosingEntry::reconcile(&position(100), Money::from_cents(150), None, 500).unwrap();
        assert_eq!(surplus.kind(), VarianceKind::Surplus);

        let balanced =
            ClosingEntry::reconcile(&position(100), Money::from_cents(100), None, 500).unwrap();
        assert_eq!(balanced.kind(), VarianceKind::Balanced);
    }

    #[test]
    fn test_zero_count_is_allowed() {
        let entry = ClosingEntry::reconcile(&position(100), Money::zero(), Some(" robo "), 500)
            .unwrap();
        assert_eq!(entry.variance, Money::from_cents(-100));
        assert_eq!(entry.note.as_deref(), Some("robo"));
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = ClosingEntry::reconcile(&position(0), Money::from_cents(-1), None, 500)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    }

    #[test]
    fn test_count_above_limit_rejected() {
        let over = Money::from_cents(crate::money::MAX_AMOUNT.cents() + 1);
        let err = ClosingEntry::reconcile(&position(0), over, None, 500).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "counted cash", .. }));
    }

    #[test]
    fn test_unrepresentable_variance_rejected() {
        let err = ClosingEntry::reconcile(&position(i64::MIN), Money::from_cents(1), None, 500)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "variance", .. }));
    }

    #[test]
    fn test_already_closed() {
        let first = ClosingEntry::reconcile(&position(0), Money::zero(), None, 500)
            .unwrap()
            .into_record("c1".into(), Utc::now());
        let mut closed = position(0);
        closed.closing_record = Some(first);

        let err = ClosingEntry::reconcile(&closed, Money::zero(), None, 500).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyClosed { .. }));
    }

    #[test]
    fn test_future_date_rejected() {
        let today = date();
        assert!(validate_closing_date(today, today).is_ok());
        assert!(validate_closing_date(today.pred_opt().unwrap(), today).is_ok());
        assert!(matches!(
            validate_closing_date(today.succ_opt().unwrap(), today),
            Err(LedgerError::InvalidDate { .. })
        ));
    }
}
