//! Money calculation helpers
//!
//! Amounts are stored as REAL in SQLite and travel as `f64` in JSON, but every
//! arithmetic step goes through `Decimal` and is rounded to cents.
//! Overflow is an `InvalidAmount` error, never a panic or a silent zero.

use rust_decimal::prelude::*;

use crate::utils::{AppError, ErrorCode};

const DECIMAL_PLACES: u32 = 2;

/// Largest accepted single amount (price, invoice amount, discount, tax)
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

fn out_of_range(field: &str) -> AppError {
    AppError::with_message(ErrorCode::InvalidAmount, format!("{field} is out of range"))
        .with_detail("field", field)
}

/// f64 -> Decimal; NaN, infinity and values beyond `Decimal` are rejected
pub fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    Decimal::from_f64(value).ok_or_else(|| out_of_range(field))
}

/// Decimal -> f64, rounded to cents
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// unit_price × quantity
pub fn line_subtotal(unit_price: f64, quantity: i64) -> Result<Decimal, AppError> {
    to_decimal(unit_price, "unit_price")?
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| out_of_range("subtotal"))
}

/// running total + subtotal
pub fn add(total: Decimal, subtotal: Decimal) -> Result<Decimal, AppError> {
    total
        .checked_add(subtotal)
        .ok_or_else(|| out_of_range("total"))
}

/// total - discount + tax
pub fn grand_total(total: Decimal, discount: f64, tax: f64) -> Result<Decimal, AppError> {
    let discount = to_decimal(discount, "discount")?;
    let tax = to_decimal(tax, "tax")?;
    total
        .checked_sub(discount)
        .and_then(|t| t.checked_add(tax))
        .ok_or_else(|| out_of_range("grand_total"))
}

/// Reject NaN, infinity, negative amounts and anything above [`MAX_AMOUNT`]
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(
            AppError::with_message(ErrorCode::InvalidAmount, format!("{field} must be >= 0"))
                .with_detail("field", field),
        );
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be <= {MAX_AMOUNT}"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
