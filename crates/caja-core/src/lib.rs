//! # caja-core: Pure Ledger Rules for Caja
//!
//! This crate holds every rule of the branch cash ledger as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    caja-cli (front end)                         │   │
//! │  │    sale ──► expense ──► payroll ──► position ──► close          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-ledger (engine)                         │   │
//! │  │    recorders, calculator, reconciler, clock, config            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  money  │ │  sale   │ │ expense │ │ position │ │ closing │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-db (Ledger Store)                       │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent money with banker's rounding at the edges
//! - [`types`] - Ledger records, payment methods, roles
//! - [`sale`] - Payment-method classification table
//! - [`expense`] - Expense authorization and payroll batches
//! - [`position`] - Daily cash position aggregation
//! - [`closing`] - Counted-cash reconciliation
//! - [`report`] - Per-method breakdowns
//! - [`validation`] - Free-text field checks
//! - [`error`] - Error kinds
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::money::Money;
//! use caja_core::sale::SaleRequest;
//!
//! let amount: Money = "1500.00".parse().unwrap();
//! let tendered: Money = "2000.00".parse().unwrap();
//!
//! let sale = SaleRequest::cash(amount, tendered).classify().unwrap();
//! assert_eq!(sale.change.to_string(), "$500.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod closing;
pub mod error;
pub mod expense;
pub mod money;
pub mod position;
pub mod report;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use closing::{ClosingEntry, VarianceKind};
pub use error::{LedgerError, LedgerResult, MoneyError, ValidationError};
pub use expense::ExpenseLine;
pub use money::Money;
pub use position::DailyPosition;
pub use sale::{ClassifiedSale, SaleRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of the `detail` written on every payroll line.
///
/// The payroll roster finds an employee's last payment by matching
/// `PAYROLL_DETAIL_PREFIX + name`.
pub const PAYROLL_DETAIL_PREFIX: &str = "Sueldo de ";

/// Default maximum length of a free-text note.
pub const NOTE_MAX_LEN: usize = 500;

/// Maximum length of names (employees, credit customers, branches).
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a contact phone.
pub const PHONE_MAX_LEN: usize = 30;
