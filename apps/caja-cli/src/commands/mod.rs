//! # Commands
//!
//! Each command calls one engine operation and renders the result. No ledger
//! rule lives here.

pub mod closing;
pub mod expense;
pub mod report;
pub mod roster;
pub mod sale;

use anyhow::Result;
use caja_core::Money;
use serde::Serialize;

/// Where and how results are printed.
#[derive(Debug, Clone)]
pub struct Output {
    json: bool,
    symbol: String,
}

impl Output {
    pub fn new(json: bool, symbol: &str) -> Self {
        Output {
            json,
            symbol: symbol.to_string(),
        }
    }

    /// Formats an amount with the configured currency symbol.
    pub fn money(&self, amount: Money) -> String {
        amount.format_with(&self.symbol)
    }

    /// Prints `value` as pretty JSON, or the lines produced by `text`.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&Self) -> Vec<String>,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            for line in text(self) {
                println!("{line}");
            }
        }
        Ok(())
    }
}
