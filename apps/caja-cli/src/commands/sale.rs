//! # Sale Command

use anyhow::Result;
use caja_core::{Money, PaymentMethod, SaleRecord, SaleRequest, Session};
use caja_ledger::Ledger;

use super::Output;

/// Builds the request exactly as typed; the recorder decides what is valid.
pub fn build_request(
    method: PaymentMethod,
    amount: Money,
    tendered: Option<Money>,
    customer: Option<String>,
    phone: Option<String>,
) -> SaleRequest {
    SaleRequest {
        amount,
        payment_method: method,
        tendered,
        credit_customer_name: customer,
        credit_customer_phone: phone,
    }
}

pub async fn record(
    ledger: &Ledger,
    session: &Session,
    request: SaleRequest,
    output: &Output,
) -> Result<()> {
    let record = ledger.sales().record_sale(session, request).await?;
    output.emit(&record, |out| describe(&record, out))
}

fn describe(record: &SaleRecord, out: &Output) -> Vec<String> {
    let mut lines = vec![format!(
        "Sale {} recorded: {} {}",
        record.id,
        record.payment_method,
        out.money(record.amount())
    )];

    match record.payment_method {
        PaymentMethod::Cash => {
            lines.push(format!("  tendered {}", out.money(record.tendered())));
            lines.push(format!("  change   {}", out.money(record.change())));
        }
        PaymentMethod::StoreCredit => {
            let name = record.credit_customer_name.as_deref().unwrap_or_default();
            lines.push(format!("  owed by {} ({})", name, out.money(record.booked_debt())));
        }
        _ => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_keeps_fields() {
        let request = build_request(
            PaymentMethod::StoreCredit,
            Money::from_cents(30_000),
            None,
            Some("Doña Rosa".to_string()),
            None,
        );
        let classified = request.classify().unwrap();
        assert_eq!(classified.booked_debt, Money::from_cents(30_000));
        assert_eq!(classified.credit_customer_name.as_deref(), Some("Doña Rosa"));
    }
}
