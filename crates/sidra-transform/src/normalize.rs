//! Raw SIDRA table to tidy table normalization.
//!
//! Columns are located by name heuristics (see [`sidra_ingest::columns`]);
//! only the value column `V` is mandatory. A missing code, name, or time
//! column degrades to null codes, empty names, or null years.
//!
//! Rows whose value does not coerce to a finite number are dropped. This
//! also removes the descriptive header row the API embeds as the first data
//! row, and the `-`/`...`/`X` markers SIDRA uses for unavailable data.

use polars::prelude::{
    BooleanChunked, Column, DataFrame, IntoColumn, NamedFrom, NewChunkedArray, Series,
};
use sidra_common::{any_to_string, coerce_any, coerce_int};
use sidra_ingest::discover_columns;
use sidra_model::columns::{ANO, CODE_MUNI, MUNICIPIO};
use sidra_model::{PanelError, Result, check_indicator_name};
use tracing::debug;

use crate::frame::{TidyFrame, cell};

/// Options for [`normalize_table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Carry `D<n>C` / `D<n>N` dimension columns through to the output.
    pub keep_extra_dimensions: bool,
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_extra_dimensions(mut self, enable: bool) -> Self {
        self.keep_extra_dimensions = enable;
        self
    }
}

/// Converts a raw table into `{code_muni, municipio, ano, <indicator>}`.
///
/// # Errors
///
/// Returns [`PanelError::MissingValueColumn`] when the table has no column
/// named exactly `V`, and [`PanelError::InvalidLabel`] when `indicator` would
/// duplicate another output column.
pub fn normalize_table(
    raw: &DataFrame,
    indicator: &str,
    options: NormalizeOptions,
) -> Result<TidyFrame> {
    check_indicator_name(indicator)?;
    let names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let discovered = discover_columns(&names);
    let Some(value_column) = discovered.value.as_deref() else {
        return Err(PanelError::MissingValueColumn {
            indicator: indicator.to_string(),
        });
    };

    let height = raw.height();
    let values: Vec<Option<f64>> = (0..height)
        .map(|idx| coerce_any(cell(raw, value_column, idx)))
        .collect();
    let keep: Vec<bool> = values.iter().map(Option::is_some).collect();
    let kept_rows: Vec<usize> = (0..height).filter(|idx| keep[*idx]).collect();

    let int_column = |column: Option<&str>| -> Vec<Option<i64>> {
        match column {
            Some(name) => kept_rows
                .iter()
                .map(|idx| coerce_int(cell(raw, name, *idx)))
                .collect(),
            None => vec![None; kept_rows.len()],
        }
    };
    let codes = int_column(discovered.code.as_ref().map(|m| m.column.as_str()));
    let years = int_column(discovered.time.as_ref().map(|m| m.column.as_str()));
    let municipios: Vec<String> = match discovered.name.as_ref() {
        Some(found) => kept_rows
            .iter()
            .map(|idx| any_to_string(cell(raw, &found.column, *idx)))
            .collect(),
        None => vec![String::new(); kept_rows.len()],
    };
    let indicator_values: Vec<f64> = values.into_iter().flatten().collect();

    let mut columns: Vec<Column> = vec![
        Series::new(CODE_MUNI.into(), codes).into_column(),
        Series::new(MUNICIPIO.into(), municipios).into_column(),
        Series::new(ANO.into(), years).into_column(),
        Series::new(indicator.into(), indicator_values).into_column(),
    ];

    if options.keep_extra_dimensions && !discovered.extra_dimensions.is_empty() {
        if discovered.extra_dimensions.iter().any(|name| name == indicator) {
            return Err(PanelError::InvalidLabel {
                label: indicator.to_string(),
                reason: "collides with a passthrough dimension column".to_string(),
            });
        }
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let filtered = raw.filter(&mask)?;
        for name in &discovered.extra_dimensions {
            columns.push(filtered.column(name)?.clone());
        }
    }

    debug!(
        indicator,
        rows = height,
        kept = kept_rows.len(),
        dropped = height - kept_rows.len(),
        "normalized table"
    );
    Ok(TidyFrame::new(indicator, DataFrame::new(columns)?))
}
