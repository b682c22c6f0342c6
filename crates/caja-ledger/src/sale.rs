//! # Sale Recorder
//!
//! Classifies a cashier's sale and appends it to the ledger.
//!
//! ```text
//! record_sale(session, request)
//!      │
//!      ├── classify (caja-core) ──err──► returned, nothing written
//!      │
//!      ├── stamp id, business date, created_at (Clock)
//!      │
//!      └── append (one INSERT) ──err──► StoreUnavailable
//! ```

use caja_core::validation::validate_branch;
use caja_core::{LedgerResult, SaleRecord, SaleRequest, Session};
use tracing::{info, warn};

use crate::LedgerContext;

/// Records sales for any role.
#[derive(Debug, Clone)]
pub struct SaleRecorder {
    ctx: LedgerContext,
}

impl SaleRecorder {
    pub(crate) fn new(ctx: LedgerContext) -> Self {
        SaleRecorder { ctx }
    }

    /// Validates, derives the booked fields and persists one sale.
    ///
    /// On `StoreUnavailable` the caller must not assume the sale was recorded.
    pub async fn record_sale(
        &self,
        session: &Session,
        request: SaleRequest,
    ) -> LedgerResult<SaleRecord> {
        validate_branch(&session.branch)?;

        let method = request.payment_method;
        let classified = request.classify().map_err(|e| {
            warn!(branch = %session.branch, %method, code = e.code(), error = %e, "Sale rejected");
            e
        })?;

        let now = self.ctx.now();
        let record = classified.into_record(
            LedgerContext::new_id(),
            &session.branch,
            self.ctx.business_date(now),
            now,
        );

        self.ctx.db.sales().append(&record).await?;

        info!(
            id = %record.id,
            branch = %record.branch,
            %method,
            amount = %record.amount(),
            "Sale recorded"
        );
        Ok(record)
    }
}
