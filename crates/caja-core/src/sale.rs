//! # Sale Classification
//!
//! Turns a cashier's sale request into the five money fields of a
//! [`SaleRecord`], following one table per payment method.
//!
//! ## Validation Order
//! ```text
//! SaleRequest
//!      │
//!      ├── amount <= 0 or above MAX_AMOUNT ──────► InvalidAmount
//!      │
//!      ├── Cash: tendered missing or < amount ───► InsufficientTender
//!      │
//!      ├── StoreCredit: blank customer name ─────► MissingCreditor
//!      │
//!      ├── Closing (not a cashier method) ───────► Unauthorized
//!      │
//!      ▼
//! ClassifiedSale { tendered, change, booked_income, booked_debt }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::money::{Money, MAX_AMOUNT};
use crate::types::{PaymentMethod, SaleRecord};
use crate::validation::{validate_person_name, validate_phone};

/// What the cashier submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub amount: Money,
    pub payment_method: PaymentMethod,
    /// Cash handed over; only read for `Cash`.
    pub tendered: Option<Money>,
    /// Only read for `StoreCredit`.
    pub credit_customer_name: Option<String>,
    pub credit_customer_phone: Option<String>,
}

impl SaleRequest {
    pub fn cash(amount: Money, tendered: Money) -> Self {
        SaleRequest {
            amount,
            payment_method: PaymentMethod::Cash,
            tendered: Some(tendered),
            credit_customer_name: None,
            credit_customer_phone: None,
        }
    }

    pub fn digital(method: PaymentMethod, amount: Money) -> Self {
        SaleRequest {
            amount,
            payment_method: method,
            tendered: None,
            credit_customer_name: None,
            credit_customer_phone: None,
        }
    }

    pub fn store_credit(amount: Money, name: impl Into<String>, phone: Option<String>) -> Self {
        SaleRequest {
            amount,
            payment_method: PaymentMethod::StoreCredit,
            tendered: None,
            credit_customer_name: Some(name.into()),
            credit_customer_phone: phone,
        }
    }

    /// Validates the request and derives the booked fields.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use caja_core::sale::SaleRequest;
    ///
    /// let sale = SaleRequest::cash(Money::from_cents(150_000), Money::from_cents(200_000))
    ///     .classify()
    ///     .unwrap();
    /// assert_eq!(sale.change, Money::from_cents(50_000));
    /// assert_eq!(sale.booked_income, Money::from_cents(150_000));
    /// assert!(sale.booked_debt.is_zero());
    /// ```
    pub fn classify(self) -> LedgerResult<ClassifiedSale> {
        let amount = self.amount;

        if !amount.is_positive() || !amount.is_within_limit() {
            return Err(LedgerError::InvalidAmount {
                field: "amount",
                value: amount,
            });
        }

        let classified = match self.payment_method {
            PaymentMethod::Cash => {
                let tendered = match self.tendered {
                    Some(t) if t > MAX_AMOUNT => {
                        return Err(LedgerError::InvalidAmount {
                            field: "tendered",
                            value: t,
                        })
                    }
                    Some(t) if t >= amount => t,
                    other => {
                        return Err(LedgerError::InsufficientTender {
                            amount,
                            tendered: other,
                        })
                    }
                };
                ClassifiedSale {
                    payment_method: PaymentMethod::Cash,
                    amount,
                    tendered,
                    change: tendered - amount,
                    booked_income: amount,
                    booked_debt: Money::zero(),
                    credit_customer_name: None,
                    credit_customer_phone: None,
                }
            }

            method @ (PaymentMethod::DigitalWalletA | PaymentMethod::DigitalWalletB) => {
                ClassifiedSale {
                    payment_method: method,
                    amount,
                    tendered: amount,
                    change: Money::zero(),
                    booked_income: amount,
                    booked_debt: Money::zero(),
                    credit_customer_name: None,
                    credit_customer_phone: None,
                }
            }

            PaymentMethod::StoreCredit => {
                let name = match self.credit_customer_name.as_deref().map(str::trim) {
                    Some(n) if !n.is_empty() => validate_person_name("credit customer name", n)?,
                    _ => return Err(LedgerError::MissingCreditor),
                };
                let phone = validate_phone(self.credit_customer_phone.as_deref())?;

                ClassifiedSale {
                    payment_method: PaymentMethod::StoreCredit,
                    amount,
                    tendered: Money::zero(),
                    change: Money::zero(),
                    booked_income: Money::zero(),
                    booked_debt: amount,
                    credit_customer_name: Some(name),
                    credit_customer_phone: phone,
                }
            }

            PaymentMethod::Closing => {
                return Err(LedgerError::Unauthorized(
                    "closing entries are written only by the day-closing process".to_string(),
                ))
            }
        };

        Ok(classified)
    }
}

/// A validated sale with every derived field filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSale {
    pub payment_method: PaymentMethod,
    pub amount: Money,
    pub tendered: Money,
    pub change: Money,
    pub booked_income: Money,
    pub booked_debt: Money,
    pub credit_customer_name: Option<String>,
    pub credit_customer_phone: Option<String>,
}

impl ClassifiedSale {
    /// Stamps identity and time onto the classified sale.
    pub fn into_record(
        self,
        id: String,
        branch: &str,
        business_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> SaleRecord {
        SaleRecord {
            id,
            branch: branch.to_string(),
            payment_method: self.payment_method,
            amount_cents: self.amount.cents(),
            tendered_cents: self.tendered.cents(),
            change_cents: self.change.cents(),
            booked_income_cents: self.booked_income.cents(),
            booked_debt_cents: self.booked_debt.cents(),
            credit_customer_name: self.credit_customer_name,
            credit_customer_phone: self.credit_customer_phone,
            note: None,
            business_date,
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

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn assert_balanced(sale: &ClassifiedSale) {
        assert_eq!(sale.amount, sale.booked_income + sale.booked_debt);
    }

    #[test]
    fn test_cash_sale_derives_change() {
        let sale = SaleRequest::cash(m("1500.00"), m("2000.00")).classify().unwrap();

        assert_eq!(sale.change, m("500.00"));
        assert_eq!(sale.booked_income, m("1500.00"));
        assert_eq!(sale.booked_debt, Money::zero());
        assert_eq!(sale.tendered - sale.amount, sale.change);
        assert_balanced(&sale);
    }

    #[test]
    fn test_exact_cash_has_no_change() {
        let sale = SaleRequest::cash(m("99.99"), m("99.99")).classify().unwrap();
        assert!(sale.change.is_zero());
    }

    #[test]
    fn test_cash_short_tender_fails() {
        let err = SaleRequest::cash(m("800.00"), m("500.00")).classify().unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientTender { .. }));
    }

    #[test]
    fn test_cash_without_tender_fails() {
        let mut req = SaleRequest::cash(m("10"), m("10"));
        req.tendered = None;
        assert!(matches!(
            req.classify(),
            Err(LedgerError::InsufficientTender { tendered: None, .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_fails_first() {
        // Amount is checked before tender
        let err = SaleRequest::cash(Money::zero(), Money::zero()).classify().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));

        let err = SaleRequest::store_credit(m("-1"), "", None).classify().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    }

    #[test]
    fn test_amounts_above_limit_fail() {
        let over = MAX_AMOUNT + Money::from_cents(1);

        let err = SaleRequest::digital(PaymentMethod::DigitalWalletB, over)
            .classify()
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "amount", .. }));

        let err = SaleRequest::cash(m("100"), over).classify().unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "tendered", .. }));

        let sale = SaleRequest::cash(MAX_AMOUNT, MAX_AMOUNT).classify().unwrap();
        assert!(sale.change.is_zero());
    }

    #[test]
    fn test_digital_sale_books_full_income() {
        for method in [PaymentMethod::DigitalWalletA, PaymentMethod::DigitalWalletB] {
            let mut req = SaleRequest::digital(method, m("3000.00"));
            req.tendered = Some(m("9999")); // ignored
            let sale = req.classify().unwrap();

            assert_eq!(sale.payment_method, method);
            assert_eq!(sale.tendered, m("3000.00"));
            assert!(sale.change.is_zero());
            assert_eq!(sale.booked_income, m("3000.00"));
            assert_balanced(&sale);
        }
    }

    #[test]
    fn test_store_credit_books_debt() {
        let sale = SaleRequest::store_credit(m("300.00"), " Doña Rosa ", Some("  ".into()))
            .classify()
            .unwrap();

        assert_eq!(sale.booked_income, Money::zero());
        assert_eq!(sale.booked_debt, m("300.00"));
        assert!(sale.tendered.is_zero());
        assert_eq!(sale.credit_customer_name.as_deref(), Some("Doña Rosa"));
        assert_eq!(sale.credit_customer_phone, None);
        assert_balanced(&sale);
    }

    #[test]
    fn test_store_credit_requires_name() {
        for name in ["", "   "] {
            let err = SaleRequest::store_credit(m("300.00"), name, None)
                .classify()
                .unwrap_err();
            assert!(matches!(err, LedgerError::MissingCreditor));
        }

        let mut req = SaleRequest::store_credit(m("300.00"), "x", None);
        req.credit_customer_name = None;
        assert!(matches!(req.classify(), Err(LedgerError::MissingCreditor)));
    }

    #[test]
    fn test_creditor_fields_dropped_for_other_methods() {
        let mut req = SaleRequest::digital(PaymentMethod::DigitalWalletA, m("10"));
        req.credit_customer_name = Some("Ana".into());
        let sale = req.classify().unwrap();
        assert_eq!(sale.credit_customer_name, None);
    }

    #[test]
    fn test_closing_is_not_a_cashier_method() {
        let req = SaleRequest::digital(PaymentMethod::Closing, m("10"));
        assert!(matches!(req.classify(), Err(LedgerError::Unauthorized(_))));
    }

    #[test]
    fn test_into_record_copies_fields() {
        let created_at = Utc::now();
        let date = created_at.date_naive();
        let record = SaleRequest::cash(m("1500.00"), m("2000.00"))
            .classify()
            .unwrap()
            .into_record("id-1".into(), "Centro", date, created_at);

        assert_eq!(record.branch, "Centro");
        assert_eq!(record.amount_cents, 150_000);
        assert_eq!(record.change_cents, 50_000);
        assert_eq!(record.booked_income_cents, 150_000);
        assert_eq!(record.booked_debt_cents, 0);
        assert_eq!(record.business_date, date);
        assert_eq!(record.variance(), None);
    }
}
