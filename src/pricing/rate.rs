use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::AppError;

/// Decimal places kept in a discount rate
pub const RATE_SCALE: u32 = 4;

/// Savings plan discount rate: `1 - discounted / list`, rounded to four
/// places.
///
/// The result is a ratio, not a percentage. It is not clamped: a negative
/// rate means the plan price exceeds the list price and is reported as is.
pub fn compute_rate(list_price: Decimal, discounted_price: Decimal) -> Result<Decimal, AppError> {
    if list_price.is_zero() {
        return Err(AppError::InvalidPriceData(
            "list price is zero, discount rate is undefined".to_string(),
        ));
    }

    let ratio = discounted_price
        .checked_div(list_price)
        .ok_or_else(|| AppError::InvalidPriceData("price ratio overflowed".to_string()))?;

    Ok((Decimal::ONE - ratio).round_dp(RATE_SCALE))
}

/// Read a price field from a catalog entry. The API publishes prices as
/// strings, but plain JSON numbers are accepted too.
pub fn price_field(entry: &Value, field: &str) -> Result<Decimal, AppError> {
    let raw = match entry.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(AppError::InvalidPriceData(format!(
                "field '{}' is not a price: {}",
                field, other
            )))
        }
        None => {
            return Err(AppError::InvalidPriceData(format!(
                "field '{}' is missing",
                field
            )))
        }
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| AppError::InvalidPriceData(format!("field '{}' has value '{}'", field, raw)))
}

/// Render a rate as `0.2800 (28.00%)`
pub fn format_rate(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED).round_dp(2);
    format!("{:.4} ({:.2}%)", rate, percent)
}
