//! # Money Module
//!
//! Provides the `Money` type for every monetary field in the ledger.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE DRIFT PROBLEM                                                      │
//! │                                                                         │
//! │  Summing floats across a day of sales:                                  │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │  Rounding only when a row is written lets the error pile up in          │
//! │  every SUM() that feeds the cash position.                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every value is a whole number of cents, so add and subtract are      │
//! │    exact and every intermediate total is already at two digits.         │
//! │    Values enter from decimals through ONE rounding rule:                │
//! │    round-half-to-even (banker's rounding).                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::money::Money;
//!
//! let amount: Money = "1500.00".parse().unwrap();
//! let tendered = Money::from_major_minor(2000, 0);
//! assert_eq!((tendered - amount).cents(), 50_000);
//! assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::MoneyError;

/// Number of fractional digits every amount carries.
pub const SCALE: u32 = 2;

/// The one rounding rule used whenever a decimal becomes `Money`.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Largest single amount the ledger accepts: 1,000,000,000,000.00.
///
/// Sales, tenders, expenses, salaries and counted cash above this are
/// rejected with `InvalidAmount`. Day and range totals still use the
/// checked operations, so no run of accepted rows can wrap a sum.
pub const MAX_AMOUNT: Money = Money(100_000_000_000_000);

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents, always exactly two fractional digits.
///
/// ## Design Decisions
/// - **i64 (signed)**: closing variances and shortages are negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Exact comparison**: equality and ordering work on the cent count
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cashier input ──► Money::from_str ──► SaleRequest ──► classification   │
/// │                                                        │                │
/// │                        amount / tendered / change / income / debt       │
/// │                                                        │                │
/// │  Ledger rows (integer cents) ──► DailyPosition sums ──► closing         │
/// │                                                         variance        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal into Money, rounding half-to-even at two digits.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // 0.125 is a tie: rounds to the even neighbour 0.12
    /// let m = Money::from_decimal(Decimal::new(125, 3)).unwrap();
    /// assert_eq!(m.cents(), 12);
    /// ```
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let rounded = value.round_dp_with_strategy(SCALE, ROUNDING);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Returns the exact decimal value (scale 2).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (sign preserved).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Whether the value lies within `0..=MAX_AMOUNT`.
    #[inline]
    pub const fn is_within_limit(&self) -> bool {
        self.0 >= 0 && self.0 <= MAX_AMOUNT.0
    }

    /// Addition that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtraction that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplication by a count that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, `None` if the total leaves the `i64` range.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let dimes = [Money::from_cents(10); 3];
    /// assert_eq!(Money::checked_sum(dimes), Some(Money::from_cents(30)));
    /// assert_eq!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]), None);
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }

    /// Multiplies by a decimal scalar, re-rounding half-to-even.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let salary = Money::from_cents(100_000); // 1,000.00
    /// let half_month = salary.mul_decimal(Decimal::new(5, 1)).unwrap();
    /// assert_eq!(half_month.cents(), 50_000);
    /// ```
    pub fn mul_decimal(&self, factor: Decimal) -> Result<Money, MoneyError> {
        let product = self
            .to_decimal()
            .checked_mul(factor)
            .ok_or(MoneyError::Overflow)?;
        Money::from_decimal(product)
    }

    /// Renders with the given currency symbol, thousands grouped.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-5_000).format_with("$"), "-$50.00");
    /// assert_eq!(Money::from_cents(380_000).format_with("ARS "), "ARS 3,800.00");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = (self.0 / 100).unsigned_abs().to_string();

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("{}{}{}.{:02}", sign, symbol, grouped, self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// The operators are for values already bounded by MAX_AMOUNT. Totals over
// ledger rows go through checked_add / checked_sub / checked_sum.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

/// Parses decimal text such as `1500`, `1500.5` or `1,500.00`.
///
/// More than two fractional digits are rounded half-to-even.
impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let value = Decimal::from_str(&cleaned).map_err(|_| MoneyError::Unparseable {
            input: s.to_string(),
        })?;
        Money::from_decimal(value)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by an integer count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_parse() {
        assert_eq!("1500.00".parse::<Money>().unwrap().cents(), 150_000);
        assert_eq!("1,500".parse::<Money>().unwrap().cents(), 150_000);
        assert_eq!(" 0.5 ".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-50".parse::<Money>().unwrap().cents(), -5_000);
        assert!(matches!(
            "twelve".parse::<Money>(),
            Err(MoneyError::Unparseable { .. })
        ));
    }

    #[test]
    fn test_half_even_rounding() {
        // Ties go to the even cent
        assert_eq!("0.125".parse::<Money>().unwrap().cents(), 12);
        assert_eq!("0.135".parse::<Money>().unwrap().cents(), 14);
        assert_eq!("-0.125".parse::<Money>().unwrap().cents(), -12);
        // Non-ties round to nearest
        assert_eq!("0.126".parse::<Money>().unwrap().cents(), 13);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Decimal::MAX;
        assert!(matches!(Money::from_decimal(huge), Err(MoneyError::Overflow)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-5_000).to_string(), "-$50.00");
        assert_eq!(Money::from_cents(100_000).to_string(), "$1,000.00");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Money::from_cents(99_999).to_string(), "$999.99");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let big = Money::from_cents(i64::MAX - 1);
        let one = Money::from_cents(1);

        assert_eq!(big.checked_add(one), Some(Money::from_cents(i64::MAX)));
        assert_eq!(big.checked_add(one + one), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(one), None);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(one.checked_mul(3), Some(Money::from_cents(3)));

        let half: Money = "50000000000000000.00".parse().unwrap();
        assert_eq!(Money::checked_sum([half, half]), None);
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_limit() {
        assert!(MAX_AMOUNT.is_within_limit());
        assert!(Money::zero().is_within_limit());
        assert!(!(MAX_AMOUNT + Money::from_cents(1)).is_within_limit());
        assert!(!Money::from_cents(-1).is_within_limit());
        assert_eq!(MAX_AMOUNT.to_string(), "$1,000,000,000,000.00");
    }

    #[test]
    fn test_mul_decimal_rounds_each_step() {
        let ten = Money::from_cents(1000);
        let third = ten.mul_decimal(Decimal::new(3333, 4)).unwrap(); // 3.333
        assert_eq!(third.cents(), 333);
        assert_eq!((third * 3).cents(), 999);
    }

    /// Ten sales of 0.10 must total exactly 1.00.
    #[test]
    fn test_sum_has_no_drift() {
        let dime: Money = "0.10".parse().unwrap();
        let total: Money = std::iter::repeat(dime).take(10).sum();
        assert_eq!(total, Money::from_cents(100));
    }

    #[test]
    fn test_decimal_round_trip_scale() {
        let m = Money::from_cents(380_000);
        assert_eq!(m.to_decimal().to_string(), "3800.00");
    }
}
