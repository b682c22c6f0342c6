//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                           │
//! │  ├── LedgerError      - What every ledger operation can fail with       │
//! │  ├── ValidationError  - Free-text and roster field checks               │
//! │  └── MoneyError       - Unparseable or overflowing amounts              │
//! │                                                                         │
//! │  caja-db errors (separate crate)                                        │
//! │  └── DbError          - Storage failures, mapped to StoreUnavailable    │
//! │                                                                         │
//! │  Flow: ValidationError → LedgerError ← DbError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Every validation kind is reported before any write is attempted
//! 2. `StoreUnavailable` is the only non-deterministic kind
//! 3. Errors are enum variants, never String

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Ledger Error
// =============================================================================

/// Errors returned by the recorders, the calculator and the reconciler.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An amount that must be positive (or non-negative) is not.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: Money },

    /// Cash tendered is missing or does not cover the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale 800.00, cash, customer hands over 500.00
    ///      │
    ///      ▼
    /// InsufficientTender { amount: 800.00, tendered: Some(500.00) }
    ///      │
    ///      ▼
    /// Cashier collects the missing 300.00 and resubmits
    /// ```
    #[error("Insufficient tender: sale is {amount}, tendered {}", display_tendered(.tendered))]
    InsufficientTender {
        amount: Money,
        tendered: Option<Money>,
    },

    /// A store-credit sale has no customer name.
    #[error("Store-credit sales require the customer's name")]
    MissingCreditor,

    /// The session's role may not perform this operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A payroll batch was confirmed with no employees selected.
    #[error("No employees selected for payroll")]
    EmptySelection,

    /// The branch already has a closing record for the date.
    #[error("Branch {branch} is already closed for {date}")]
    AlreadyClosed { branch: String, date: NaiveDate },

    /// The date cannot be used for this operation (e.g. closing the future).
    #[error("Invalid date {date}: today is {today}")]
    InvalidDate { date: NaiveDate, today: NaiveDate },

    /// The ledger store could not complete the operation; nothing was written.
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// Field-level input check (free text, roster data).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn display_tendered(tendered: &Option<Money>) -> String {
    match tendered {
        Some(m) => m.to_string(),
        None => "nothing".to_string(),
    }
}

impl LedgerError {
    /// Stable machine-readable code for each kind.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "INVALID_AMOUNT",
            LedgerError::InsufficientTender { .. } => "INSUFFICIENT_TENDER",
            LedgerError::MissingCreditor => "MISSING_CREDITOR",
            LedgerError::Unauthorized(_) => "UNAUTHORIZED",
            LedgerError::EmptySelection => "EMPTY_SELECTION",
            LedgerError::AlreadyClosed { .. } => "ALREADY_CLOSED",
            LedgerError::InvalidDate { .. } => "INVALID_DATE",
            LedgerError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            LedgerError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Whether the caller can fix the input and retry deterministically.
    pub fn is_caller_fixable(&self) -> bool {
        !matches!(self, LedgerError::StoreUnavailable(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for free-text and roster fields.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Invalid format (e.g. unknown payment method name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is well-formed but not usable here (inactive employee, other branch).
    #[error("{field} rejected: {reason}")]
    Rejected { field: String, reason: String },
}

// =============================================================================
// Money Error
// =============================================================================

/// Errors converting input into `Money`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("'{input}' is not a decimal amount")]
    Unparseable { input: String },

    #[error("Amount out of range")]
    Overflow,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InsufficientTender {
            amount: Money::from_cents(80_000),
            tendered: Some(Money::from_cents(50_000)),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient tender: sale is $800.00, tendered $500.00"
        );

        let err = LedgerError::InsufficientTender {
            amount: Money::from_cents(100),
            tendered: None,
        };
        assert_eq!(err.to_string(), "Insufficient tender: sale is $1.00, tendered nothing");
    }

    #[test]
    fn test_codes_are_distinct() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let errors = [
            LedgerError::InvalidAmount {
                field: "amount",
                value: Money::zero(),
            },
            LedgerError::InsufficientTender {
                amount: Money::zero(),
                tendered: None,
            },
            LedgerError::MissingCreditor,
            LedgerError::Unauthorized("payroll".into()),
            LedgerError::EmptySelection,
            LedgerError::AlreadyClosed {
                branch: "Centro".into(),
                date,
            },
            LedgerError::InvalidDate { date, today: date },
            LedgerError::StoreUnavailable("disk".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_only_store_failures_are_not_caller_fixable() {
        assert!(LedgerError::MissingCreditor.is_caller_fixable());
        assert!(!LedgerError::StoreUnavailable("locked".into()).is_caller_fixable());
    }

    #[test]
    fn test_validation_converts_to_ledger_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let err: LedgerError = validation_err.into();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
