//! Numeric coercion for key columns and billing amounts.

use hcdw_model::BillingAmount;

/// Coerces a raw value to a whole number.
///
/// Accepts integer literals and real literals with no fractional part that
/// fit in `i64` (`"7"`, `"7.0"`, `"1e3"`). Returns `None` for blank,
/// non-numeric, fractional, NaN, infinite or out-of-range input.
pub fn coerce_integer(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !parsed.is_finite()
        || parsed.fract() != 0.0
        || parsed < i64::MIN as f64
        || parsed >= i64::MAX as f64
    {
        return None;
    }
    Some(parsed as i64)
}

/// Coerces a raw value to a non-negative billing amount.
///
/// Negative, NaN, infinite and unparsable values are absent, never zero.
pub fn coerce_amount(value: Option<&str>) -> Option<BillingAmount> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(BillingAmount::new)
}
