//! Request field checks shared by the data routes.
//!
//! Amount checks round to the precision of the column the value is stored in
//! and reject anything that column cannot hold, so out-of-range input is a
//! 400 rather than a database error.

use rust_decimal::Decimal;

use crate::db::NumericColumn;
use crate::error::{AppError, Result};

/// Longest accepted name or label.
pub const MAX_TEXT_LEN: usize = 200;

/// Trim a required text field and reject it if empty or too long.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Round to the column's scale and reject values it cannot store.
pub fn bounded(field: &str, value: Decimal, column: NumericColumn) -> Result<Decimal> {
    column.fit(value).ok_or_else(|| {
        AppError::BadRequest(format!(
            "{field} must be between -{max} and {max}",
            max = column.max()
        ))
    })
}

/// Like [`bounded`], also rejecting negative amounts.
pub fn non_negative(field: &str, value: Decimal, column: NumericColumn) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    bounded(field, value, column).map_err(|_| {
        AppError::BadRequest(format!("{field} must be at most {}", column.max()))
    })
}

/// Like [`non_negative`], also rejecting amounts that round to zero.
pub fn positive(field: &str, value: Decimal, column: NumericColumn) -> Result<Decimal> {
    let value = non_negative(field, value, column)?;
    if value.is_zero() {
        return Err(AppError::BadRequest(format!("{field} must be greater than zero")));
    }
    Ok(value)
}
