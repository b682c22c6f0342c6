//! # Repository Module
//!
//! The ledger store and roster lookup behind a small async API.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Store Surface                                 │
//! │                                                                         │
//! │  caja-ledger recorder / calculator / reconciler                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── append(&record)                    one row, one statement         │
//! │  ├── list_for_branch(branch, from, to)                                 │
//! │  ├── list_between(from, to, branch?)                                   │
//! │  ├── find_closing(branch, date)                                        │
//! │  └── append_closing(branch, date, f)    BEGIN IMMEDIATE … COMMIT       │
//! │                                                                         │
//! │  ExpenseRepository                                                     │
//! │  ├── append(&record)                                                   │
//! │  ├── append_batch(&records)             all or nothing                 │
//! │  └── list_for_branch(branch, from, to)                                 │
//! │                                                                         │
//! │  EmployeeRepository                                                    │
//! │  ├── hire(&employee)                                                   │
//! │  ├── list_active(branch)                                               │
//! │  └── payroll_roster(branch)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (append-only sales / expenses)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod employee;
pub mod expense;
pub mod sale;

use caja_core::{ExpenseRecord, SaleRecord};

/// Everything written for one branch on one business day.
#[derive(Debug, Clone, Default)]
pub struct DayLedger {
    pub sales: Vec<SaleRecord>,
    pub expenses: Vec<ExpenseRecord>,
}
