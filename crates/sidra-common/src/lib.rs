//! Shared utilities for SIDRA crates.
//!
//! This crate provides Polars `AnyValue` helpers and the numeric coercion
//! rule used for values published with Brazilian number formatting.

pub mod numeric;
pub mod polars;

pub use numeric::{coerce_any, coerce_int, coerce_numeric, float_to_int};
pub use polars::{any_to_f64, any_to_i64, any_to_string, format_numeric};
