//! # Domain Types
//!
//! Ledger types shared by every layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleRecord    │   │  ExpenseRecord  │   │ EmployeeRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  branch         │   │  branch         │   │  name, branch   │       │
//! │  │  payment_method │   │  reason         │   │  base_salary    │       │
//! │  │  amount/tender  │   │  amount         │   │  active         │       │
//! │  │  income/debt    │   │  note/detail    │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PaymentMethod  │   │  ExpenseReason  │   │  Session        │       │
//! │  │  Cash           │   │  Supplier       │   │  branch         │       │
//! │  │  DigitalWalletA │   │  Payroll        │   │  role           │       │
//! │  │  DigitalWalletB │   │  Repairs        │   └─────────────────┘       │
//! │  │  StoreCredit    │   │  Other          │                              │
//! │  │  Closing        │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ledger records are immutable once written. Corrections are new offsetting
//! records, never edits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was settled.
///
/// `Closing` is synthetic: only the closing reconciler writes it.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the drawer.
    Cash,
    /// First digital wallet (e.g. Mercado Pago).
    DigitalWalletA,
    /// Second digital wallet (e.g. Cuenta DNI).
    DigitalWalletB,
    /// Sold on account ("fiado"); the amount becomes a receivable.
    StoreCredit,
    /// End-of-day drawer count.
    Closing,
}

impl PaymentMethod {
    /// Methods a cashier may pick.
    pub const CASHIER_METHODS: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::DigitalWalletA,
        PaymentMethod::DigitalWalletB,
        PaymentMethod::StoreCredit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::DigitalWalletA => "digital_wallet_a",
            PaymentMethod::DigitalWalletB => "digital_wallet_b",
            PaymentMethod::StoreCredit => "store_credit",
            PaymentMethod::Closing => "closing",
        }
    }

    #[inline]
    pub fn is_digital(&self) -> bool {
        matches!(self, PaymentMethod::DigitalWalletA | PaymentMethod::DigitalWalletB)
    }

    #[inline]
    pub fn is_closing(&self) -> bool {
        matches!(self, PaymentMethod::Closing)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the names a cashier can type. `closing` is deliberately rejected.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "digital_wallet_a" | "mercado_pago" => Ok(PaymentMethod::DigitalWalletA),
            "digital_wallet_b" | "cuenta_dni" => Ok(PaymentMethod::DigitalWalletB),
            "store_credit" | "fiado" => Ok(PaymentMethod::StoreCredit),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::CASHIER_METHODS
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Expense Reason
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseReason {
    Supplier,
    Payroll,
    Repairs,
    Other,
}

impl ExpenseReason {
    pub const ALL: [ExpenseReason; 4] = [
        ExpenseReason::Supplier,
        ExpenseReason::Payroll,
        ExpenseReason::Repairs,
        ExpenseReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseReason::Supplier => "supplier",
            ExpenseReason::Payroll => "payroll",
            ExpenseReason::Repairs => "repairs",
            ExpenseReason::Other => "other",
        }
    }

    /// Reasons the given role may record.
    pub fn selectable_by(role: Role) -> Vec<ExpenseReason> {
        ExpenseReason::ALL
            .into_iter()
            .filter(|r| role.may_record(*r))
            .collect()
    }
}

impl fmt::Display for ExpenseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier" | "proveedor" => Ok(ExpenseReason::Supplier),
            "payroll" | "sueldos" => Ok(ExpenseReason::Payroll),
            "repairs" | "reparaciones" => Ok(ExpenseReason::Repairs),
            "other" | "otros" => Ok(ExpenseReason::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "expense reason".to_string(),
                allowed: ExpenseReason::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Session Context
// =============================================================================

/// Role of the authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Cashier,
}

impl Role {
    /// Payroll is owner-only; everything else is open to cashiers.
    pub fn may_record(&self, reason: ExpenseReason) -> bool {
        match reason {
            ExpenseReason::Payroll => matches!(self, Role::Owner),
            _ => true,
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" | "dueño" | "dueno" => Ok(Role::Owner),
            "cashier" | "cajero" => Ok(Role::Cashier),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["owner".to_string(), "cashier".to_string()],
            }),
        }
    }
}

/// The `(branch, role)` context an authenticated session supplies.
///
/// The ledger trusts this context and never re-validates identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub branch: String,
    pub role: Role,
}

impl Session {
    pub fn new(branch: impl Into<String>, role: Role) -> Self {
        Session {
            branch: branch.into(),
            role,
        }
    }

    pub fn owner(branch: impl Into<String>) -> Self {
        Session::new(branch, Role::Owner)
    }

    pub fn cashier(branch: impl Into<String>) -> Self {
        Session::new(branch, Role::Cashier)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One immutable row of the sales ledger.
///
/// ## Field Table
/// ```text
/// method        tendered   change            income     debt
/// ───────────   ────────   ───────────────   ────────   ──────
/// Cash          given      tendered-amount   amount     0
/// DigitalWallet amount     0                 amount     0
/// StoreCredit   0          0                 0          amount
/// Closing       0          0                 variance   0      (amount = counted cash)
/// ```
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    pub branch: String,
    pub payment_method: PaymentMethod,
    pub amount_cents: i64,
    pub tendered_cents: i64,
    pub change_cents: i64,
    pub booked_income_cents: i64,
    pub booked_debt_cents: i64,
    pub credit_customer_name: Option<String>,
    pub credit_customer_phone: Option<String>,
    /// Observations; only closings carry one.
    pub note: Option<String>,
    /// Branch-local calendar day the record belongs to.
    pub business_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn tendered(&self) -> Money {
        Money::from_cents(self.tendered_cents)
    }

    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }

    #[inline]
    pub fn booked_income(&self) -> Money {
        Money::from_cents(self.booked_income_cents)
    }

    #[inline]
    pub fn booked_debt(&self) -> Money {
        Money::from_cents(self.booked_debt_cents)
    }

    /// Surplus (positive) or shortage (negative) of a closing record.
    pub fn variance(&self) -> Option<Money> {
        self.payment_method
            .is_closing()
            .then(|| self.booked_income())
    }
}

// =============================================================================
// Expense Record
// =============================================================================

/// One immutable row of the expense ledger.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub branch: String,
    pub reason: ExpenseReason,
    pub amount_cents: i64,
    pub note: Option<String>,
    /// Payroll lines name the employee paid: "Sueldo de <name>".
    pub detail: Option<String>,
    pub business_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Employee Record
// =============================================================================

/// Roster entry referenced by payroll lines. Read-only to the ledger.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub base_salary_cents: i64,
    pub active: bool,
}

impl EmployeeRecord {
    #[inline]
    pub fn base_salary(&self) -> Money {
        Money::from_cents(self.base_salary_cents)
    }
}

/// An active employee together with their most recent payroll payment.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub base_salary_cents: i64,
    pub last_paid_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Method Breakdown
// =============================================================================

/// Per-method totals over a date range (closings excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBreakdown {
    pub payment_method: PaymentMethod,
    pub sale_count: i64,
    pub total_amount: Money,
    pub booked_income: Money,
    pub booked_debt: Money,
    pub average_amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "Mercado-Pago".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::DigitalWalletA
        );
        assert_eq!("fiado".parse::<PaymentMethod>().unwrap(), PaymentMethod::StoreCredit);
        assert!("closing".parse::<PaymentMethod>().is_err());
        assert!("card".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serializes_snake_case() {
        let json = serde_json::to_string(&PaymentMethod::DigitalWalletB).unwrap();
        assert_eq!(json, "\"digital_wallet_b\"");
        assert_eq!(PaymentMethod::StoreCredit.to_string(), "store_credit");
    }

    #[test]
    fn test_payroll_is_owner_only() {
        assert!(Role::Owner.may_record(ExpenseReason::Payroll));
        assert!(!Role::Cashier.may_record(ExpenseReason::Payroll));
        assert!(Role::Cashier.may_record(ExpenseReason::Supplier));

        let cashier_reasons = ExpenseReason::selectable_by(Role::Cashier);
        assert_eq!(cashier_reasons.len(), 3);
        assert!(!cashier_reasons.contains(&ExpenseReason::Payroll));
        assert_eq!(ExpenseReason::selectable_by(Role::Owner).len(), 4);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("dueño".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("Cashier".parse::<Role>().unwrap(), Role::Cashier);
        assert!("admin".parse::<Role>().is_err());
    }
}
