//! Tidy table type produced by the normalizer.

use polars::prelude::{AnyValue, DataFrame};
use sidra_common::{any_to_f64, any_to_i64, any_to_string};
use sidra_model::columns::{ANO, CODE_MUNI, MUNICIPIO};

/// One row of a tidy table.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRecord {
    pub code_muni: Option<i64>,
    pub municipio: String,
    pub ano: Option<i64>,
    pub value: f64,
}

/// A normalized table: `code_muni`, `municipio`, `ano`, and one indicator
/// column, optionally followed by passthrough dimension columns.
///
/// Every row carries a finite indicator value.
#[derive(Debug, Clone)]
pub struct TidyFrame {
    /// Name of the indicator column (e.g. "pib", "pop", "area").
    pub indicator: String,
    pub data: DataFrame,
}

impl TidyFrame {
    pub fn new(indicator: impl Into<String>, data: DataFrame) -> Self {
        Self {
            indicator: indicator.into(),
            data,
        }
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Typed view of the canonical columns.
    pub fn records(&self) -> Vec<TidyRecord> {
        let df = &self.data;
        (0..df.height())
            .filter_map(|idx| {
                let value = any_to_f64(cell(df, &self.indicator, idx))?;
                Some(TidyRecord {
                    code_muni: any_to_i64(cell(df, CODE_MUNI, idx)),
                    municipio: any_to_string(cell(df, MUNICIPIO, idx)),
                    ano: any_to_i64(cell(df, ANO, idx)),
                    value,
                })
            })
            .collect()
    }
}

pub(crate) fn cell<'a>(df: &'a DataFrame, name: &str, idx: usize) -> AnyValue<'a> {
    df.column(name)
        .ok()
        .and_then(|column| column.get(idx).ok())
        .unwrap_or(AnyValue::Null)
}
