//! Numeric coercion for SIDRA values.
//!
//! SIDRA publishes numbers as text with `.` as the thousands separator and
//! `,` as the decimal separator. Missing-data markers (`-`, `..`, `...`,
//! `X`) and embedded header text fail to parse and become `None`.

use polars::prelude::AnyValue;

/// Parses locale-formatted numeric text.
///
/// Removes every `.`, replaces `,` with `.`, then parses as `f64`.
/// Blank, unparsable, or non-finite text (`NaN`, `inf`) yields `None`.
///
/// # Examples
///
/// ```
/// use sidra_common::coerce_numeric;
///
/// assert_eq!(coerce_numeric("1.234,56"), Some(1234.56));
/// assert_eq!(coerce_numeric("12,5"), Some(12.5));
/// assert_eq!(coerce_numeric("..."), None);
/// assert_eq!(coerce_numeric("Valor"), None);
/// ```
pub fn coerce_numeric(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces a cell to `f64`.
///
/// Native numeric cells are taken as they are; text goes through
/// [`coerce_numeric`].
pub fn coerce_any(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => coerce_numeric(s),
        AnyValue::StringOwned(s) => coerce_numeric(&s),
        other => crate::any_to_f64(other).filter(|v| v.is_finite()),
    }
}

/// Coerces a cell to `i64`.
///
/// Text goes through [`coerce_numeric`] and is then truncated, so
/// `"5.200.050"` and `"2020"` both resolve; native numbers convert directly.
pub fn coerce_int(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::String(_) | AnyValue::StringOwned(_) => coerce_any(value).and_then(float_to_int),
        other => crate::any_to_i64(other),
    }
}

/// Truncates a float to an integer without panicking.
///
/// Non-finite values and values outside the `i64` range yield `None`.
pub fn float_to_int(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}
