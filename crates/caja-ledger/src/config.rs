//! # Ledger Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (caja-cli)
//! 2. Environment variables (`CAJA_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use caja_core::NOTE_MAX_LEN;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Database file. `None` lets the front end choose a platform default.
    pub db_path: Option<PathBuf>,

    /// Currency symbol used when rendering amounts.
    /// Default: "$"
    pub currency_symbol: String,

    /// Offset of the branches' local time from UTC, in minutes. Decides which
    /// calendar day a sale belongs to.
    /// Default: 0
    pub utc_offset_minutes: i32,

    /// Maximum length of free-text notes.
    /// Default: 500
    pub note_max_len: usize,
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}='{value}' is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            db_path: None,
            currency_symbol: "$".to_string(),
            utc_offset_minutes: 0,
            note_max_len: NOTE_MAX_LEN,
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from the process environment.
    ///
    /// ## Environment Variables
    /// - `CAJA_DB_PATH`: database file
    /// - `CAJA_CURRENCY_SYMBOL`: e.g. "$" or "ARS "
    /// - `CAJA_UTC_OFFSET_MINUTES`: e.g. "-180" for UTC-3
    /// - `CAJA_NOTE_MAX_LEN`: positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LedgerConfig::default();

        if let Some(path) = lookup("CAJA_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("CAJA_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("CAJA_UTC_OFFSET_MINUTES") {
            let minutes: i32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "CAJA_UTC_OFFSET_MINUTES",
                value: raw.clone(),
                reason: "expected whole minutes".to_string(),
            })?;
            if FixedOffset::east_opt(minutes.saturating_mul(60)).is_none() {
                return Err(ConfigError::Invalid {
                    var: "CAJA_UTC_OFFSET_MINUTES",
                    value: raw,
                    reason: "must be within ±24 hours".to_string(),
                });
            }
            config.utc_offset_minutes = minutes;
        }

        if let Some(raw) = lookup("CAJA_NOTE_MAX_LEN") {
            config.note_max_len = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CAJA_NOTE_MAX_LEN",
                        value: raw,
                        reason: "expected a positive integer".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    /// The branches' timezone.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }
}
