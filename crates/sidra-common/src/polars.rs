//! Cell readers for Polars `AnyValue`s.
//!
//! Raw SIDRA frames are all text, while tidy frames and panels carry typed
//! `Int64`/`Float64` columns; these helpers read either kind. They apply
//! plain Rust number syntax only; locale-formatted text goes through
//! [`crate::coerce_any`] instead.

use std::str::FromStr;

use polars::prelude::AnyValue;

/// Renders a cell as text.
///
/// `Null` becomes an empty string and floats drop trailing zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use sidra_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(5200050)), "5200050");
/// assert_eq!(any_to_string(AnyValue::String("Goiânia")), "Goiânia");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => match integer_cell(&other) {
            Some(v) => v.to_string(),
            None => other.to_string(),
        },
    }
}

/// Formats a number for display, dropping a trailing `.0` and trailing zeros.
///
/// Non-finite values keep their Rust spelling (`inf`, `-inf`, `NaN`), which
/// is how an unguarded per-capita division over a zero population shows up.
///
/// # Examples
///
/// ```
/// use sidra_common::format_numeric;
///
/// assert_eq!(format_numeric(51961089.0), "51961089");
/// assert_eq!(format_numeric(12.50), "12.5");
/// assert_eq!(format_numeric(f64::INFINITY), "inf");
/// ```
pub fn format_numeric(v: f64) -> String {
    let rendered = v.to_string();
    if !v.is_finite() || !rendered.contains('.') {
        return rendered;
    }
    match rendered.trim_end_matches('0').trim_end_matches('.') {
        "" | "-" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Reads a numeric cell as `f64`.
///
/// Text is parsed with Rust float syntax (`"2.5"`); anything else that is
/// not a number yields `None`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_trimmed(s),
        AnyValue::StringOwned(s) => parse_trimmed(&s),
        other => integer_cell(&other).map(|v| v as f64),
    }
}

/// Reads a code or year cell as `i64`.
///
/// Floats are truncated through [`crate::float_to_int`]; text must be a
/// plain integer.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(v) => crate::float_to_int(f64::from(v)),
        AnyValue::Float64(v) => crate::float_to_int(v),
        AnyValue::String(s) => parse_trimmed(s),
        AnyValue::StringOwned(s) => parse_trimmed(&s),
        other => integer_cell(&other),
    }
}

/// Integer cells of any width; `UInt64` values beyond `i64::MAX` are `None`.
fn integer_cell(value: &AnyValue<'_>) -> Option<i64> {
    match *value {
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        _ => None,
    }
}

fn parse_trimmed<T: FromStr>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}
