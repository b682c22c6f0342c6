//! # Validation Module
//!
//! Field-level checks for the free text that rides along with ledger rows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / caller                                                  │
//! │  └── Parsing (amounts, method names)                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: caja-core                                                     │
//! │  ├── THIS MODULE: text fields (notes, names, phones)                    │
//! │  └── sale / expense / closing rules                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── CHECK constraints on amounts                                       │
//! │  ├── UNIQUE index: one closing per branch per day                       │
//! │  └── Triggers: append-only ledger                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{NAME_MAX_LEN, PHONE_MAX_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalises an optional free-text note.
///
/// ## Rules
/// - Surrounding whitespace is trimmed
/// - Blank notes become `None`
/// - At most `max` characters
///
/// ## Example
/// ```rust
/// use caja_core::validation::validate_note;
///
/// assert_eq!(validate_note(Some("  faltó cambio "), 500).unwrap(), Some("faltó cambio".into()));
/// assert_eq!(validate_note(Some("   "), 500).unwrap(), None);
/// assert!(validate_note(Some("abc"), 2).is_err());
/// ```
pub fn validate_note(note: Option<&str>, max: usize) -> ValidationResult<Option<String>> {
    let note = match note.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return Ok(None),
    };

    if note.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max,
        });
    }

    Ok(Some(note.to_string()))
}

/// Validates a person's name (employee, credit customer).
///
/// Returns the trimmed name.
pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: NAME_MAX_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional contact phone. Blank becomes `None`.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<Option<String>> {
    let phone = match phone.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(None),
    };

    if phone.chars().count() > PHONE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: PHONE_MAX_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, and + - ( )".to_string(),
        });
    }

    Ok(Some(phone.to_string()))
}

/// Validates a branch identifier supplied by the session.
pub fn validate_branch(branch: &str) -> ValidationResult<()> {
    if branch.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "branch".to_string(),
        });
    }

    if branch.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "branch".to_string(),
            max: NAME_MAX_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
