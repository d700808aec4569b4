//! Field-level validation rules shared by the store, seed import, and API
//!
//! These run before any SQL is issued. They are deliberately shallow: no
//! sanitization or escaping happens here (or anywhere), because every value
//! reaches SQLite through bound parameters.

use crate::errors::{Result, ShelfError};

/// Validate a display label (title, name, county)
///
/// # Errors
/// Returns `InvalidInput` when the value is empty or whitespace-only.
pub fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShelfError::invalid_input(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Validate a monetary amount
///
/// # Errors
/// Returns `InvalidInput` for negative or non-finite values.
pub fn validate_money(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShelfError::invalid_input(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

/// Validate an item count (order line quantity)
///
/// # Errors
/// Returns `InvalidInput` for negative values.
pub fn validate_count(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(ShelfError::invalid_input(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}
