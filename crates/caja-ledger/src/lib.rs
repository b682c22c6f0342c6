//! # caja-ledger: Ledger Engine for Caja
//!
//! Records sales and expenses for a branch, computes the day's cash position
//! and closes the day against the counted drawer.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SaleRecorder ──────┐                                                  │
//! │                      ├──append──► Ledger Store (caja-db) ◄──┐           │
//! │   ExpenseRecorder ───┘                 │                    │           │
//! │                                        │ read               │ one       │
//! │                                        ▼                    │ closing   │
//! │                              PositionCalculator             │ row       │
//! │                                        │                    │           │
//! │                                        ▼                    │           │
//! │                              ClosingReconciler ─────────────┘           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes its `(branch, role)` context explicitly. Nothing is
//! kept between calls except what lives in the store.
//!
//! ## Usage
//! ```rust,ignore
//! use caja_ledger::{Ledger, LedgerConfig};
//! use caja_core::{Money, SaleRequest, Session};
//!
//! let ledger = Ledger::system(db, LedgerConfig::from_env()?);
//! let cashier = Session::cashier("Sucursal Centro");
//!
//! let sale = ledger
//!     .sales()
//!     .record_sale(&cashier, SaleRequest::cash(amount, tendered))
//!     .await?;
//! ```

pub mod clock;
pub mod closing;
pub mod config;
pub mod expense;
pub mod position;
pub mod sale;

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

use caja_db::Database;

pub use clock::{Clock, FixedClock, SystemClock};
pub use closing::ClosingReconciler;
pub use config::{ConfigError, LedgerConfig};
pub use expense::ExpenseRecorder;
pub use position::PositionCalculator;
pub use sale::SaleRecorder;

/// Shared handles every component works with.
#[derive(Debug, Clone)]
pub(crate) struct LedgerContext {
    pub(crate) db: Database,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Arc<LedgerConfig>,
}

impl LedgerContext {
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Business day an instant belongs to.
    pub(crate) fn business_date(&self, now: DateTime<Utc>) -> NaiveDate {
        clock::business_date(now, self.config.utc_offset())
    }

    pub(crate) fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Entry point to the engine. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Ledger {
    ctx: LedgerContext,
}

impl Ledger {
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: LedgerConfig) -> Self {
        Ledger {
            ctx: LedgerContext {
                db,
                clock,
                config: Arc::new(config),
            },
        }
    }

    /// Ledger on the wall clock.
    pub fn system(db: Database, config: LedgerConfig) -> Self {
        Ledger::new(db, Arc::new(SystemClock), config)
    }

    pub fn sales(&self) -> SaleRecorder {
        SaleRecorder::new(self.ctx.clone())
    }

    pub fn expenses(&self) -> ExpenseRecorder {
        ExpenseRecorder::new(self.ctx.clone())
    }

    pub fn positions(&self) -> PositionCalculator {
        PositionCalculator::new(self.ctx.clone())
    }

    pub fn closings(&self) -> ClosingReconciler {
        ClosingReconciler::new(self.ctx.clone())
    }

    /// Today's business date by the ledger's clock.
    pub fn today(&self) -> NaiveDate {
        self.ctx.business_date(self.ctx.now())
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.ctx.config
    }

    pub fn database(&self) -> &Database {
        &self.ctx.db
    }
}

// =============================================================================
// Test Support
// =============================================================================
