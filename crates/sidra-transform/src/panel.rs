//! Municipality-year panel construction.
//!
//! The value and population series are inner-joined on `(code_muni, ano)`;
//! canonical names and the per-municipality area are then attached, and the
//! per-capita and per-area indicators derived.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use sidra_common::{any_to_string, coerce_int};
use sidra_ingest::reference_code_column;
use sidra_model::columns::{ANO, CODE_MUNI, MUNICIPIO};
use sidra_model::{IndicatorLabels, PanelError, Result};
use tracing::{debug, info, info_span};

use crate::frame::{TidyRecord, cell};
use crate::normalize::{NormalizeOptions, normalize_table};

/// A value row matched with the population of the same municipality-year.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub code_muni: i64,
    pub ano: i64,
    pub value: f64,
    pub population: f64,
    /// Name as given by the value table.
    pub municipio: String,
}

/// One row of the final panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub code_muni: i64,
    pub ano: i64,
    pub value: f64,
    pub population: f64,
    pub municipio: String,
    pub area: Option<f64>,
    /// `value / population`; not guarded, so a zero population yields an
    /// infinite or NaN value.
    pub per_capita: f64,
    /// `value / area` when the area is known and positive.
    pub per_area: Option<f64>,
}

/// Reads canonical names from the municipality reference, keyed by code.
///
/// The code column is chosen by [`reference_code_column`], the same lookup
/// used to decide which municipalities to fetch. Rows whose
/// code does not resolve to an integer are skipped; for duplicate codes the
/// first name wins.
///
/// # Errors
///
/// [`PanelError::MissingReferenceColumn`] when the code or `municipio`
/// column is absent.
pub fn reference_names(reference: &DataFrame) -> Result<HashMap<i64, String>> {
    let code_column = reference_code_column(reference)?;
    if reference.column(MUNICIPIO).is_err() {
        return Err(PanelError::MissingReferenceColumn(MUNICIPIO.to_string()));
    }
    let mut names = HashMap::with_capacity(reference.height());
    for idx in 0..reference.height() {
        let Some(code) = coerce_int(cell(reference, code_column, idx)) else {
            continue;
        };
        names
            .entry(code)
            .or_insert_with(|| any_to_string(cell(reference, MUNICIPIO, idx)));
    }
    Ok(names)
}

/// Collapses area records to the largest value per municipality.
///
/// Records without a code are ignored; the year is not considered.
pub fn aggregate_area(records: &[TidyRecord]) -> BTreeMap<i64, f64> {
    let mut areas: BTreeMap<i64, f64> = BTreeMap::new();
    for record in records {
        let Some(code) = record.code_muni else {
            continue;
        };
        areas
            .entry(code)
            .and_modify(|area| *area = area.max(record.value))
            .or_insert(record.value);
    }
    areas
}

/// Inner join of the value and population series on `(code_muni, ano)`.
///
/// Rows with a null key on either side are dropped. Output follows the value
/// rows' order; a key repeated in both series yields every pairing.
pub fn join_series(value: &[TidyRecord], population: &[TidyRecord]) -> Vec<JoinedRow> {
    let mut by_key: HashMap<(i64, i64), Vec<f64>> = HashMap::new();
    for record in population {
        if let (Some(code), Some(ano)) = (record.code_muni, record.ano) {
            by_key.entry((code, ano)).or_default().push(record.value);
        }
    }
    let mut joined = Vec::new();
    for record in value {
        let (Some(code), Some(ano)) = (record.code_muni, record.ano) else {
            continue;
        };
        let Some(populations) = by_key.get(&(code, ano)) else {
            continue;
        };
        for population in populations {
            joined.push(JoinedRow {
                code_muni: code,
                ano,
                value: record.value,
                population: *population,
                municipio: record.municipio.clone(),
            });
        }
    }
    joined
}

/// Value per inhabitant. Division is unguarded.
pub fn per_capita(value: f64, population: f64) -> f64 {
    value / population
}

/// Value per km², or `None` unless the area is known and strictly positive.
pub fn per_area(value: f64, area: Option<f64>) -> Option<f64> {
    area.filter(|area| *area > 0.0).map(|area| value / area)
}

/// Attaches canonical names and areas, then derives the per-capita and
/// per-area indicators.
///
/// A municipality absent from the reference keeps the name from the value
/// table.
pub fn enrich(
    joined: Vec<JoinedRow>,
    names: &HashMap<i64, String>,
    areas: &BTreeMap<i64, f64>,
) -> Vec<PanelRow> {
    joined
        .into_iter()
        .map(|row| {
            let municipio = names
                .get(&row.code_muni)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or(row.municipio);
            let area = areas.get(&row.code_muni).copied();
            PanelRow {
                code_muni: row.code_muni,
                ano: row.ano,
                value: row.value,
                population: row.population,
                municipio,
                area,
                per_capita: per_capita(row.value, row.population),
                per_area: per_area(row.value, area),
            }
        })
        .collect()
}

/// Stable sort by ascending year, then descending value within a year.
pub fn sort_panel(rows: &mut [PanelRow]) {
    rows.sort_by(|a, b| match a.ano.cmp(&b.ano) {
        Ordering::Equal => b.value.total_cmp(&a.value),
        other => other,
    });
}

/// Normalizes the three raw tables and assembles the sorted panel rows.
///
/// `municipio` is the reference's canonical name. A municipality missing
/// from the reference keeps the name given by the value table rather than
/// an empty one.
///
/// # Errors
///
/// Fails when the labels would produce duplicate columns, when any raw table
/// lacks its value column, or when the reference lacks its code or name
/// column; no partial panel is produced.
pub fn build_panel_rows(
    reference: &DataFrame,
    value_raw: &DataFrame,
    population_raw: &DataFrame,
    area_raw: &DataFrame,
    labels: &IndicatorLabels,
) -> Result<Vec<PanelRow>> {
    let span = info_span!("build_panel", value = %labels.value);
    let _guard = span.enter();

    labels.validate()?;
    let names = reference_names(reference)?;
    let options = NormalizeOptions::default();
    let value = normalize_table(value_raw, &labels.value, options)?;
    let population = normalize_table(population_raw, &labels.population, options)?;
    let area = normalize_table(area_raw, &labels.area, options)?;
    info!(
        reference = names.len(),
        value = value.record_count(),
        population = population.record_count(),
        area = area.record_count(),
        "normalized inputs"
    );

    let areas = aggregate_area(&area.records());
    let joined = join_series(&value.records(), &population.records());
    let unnamed = joined
        .iter()
        .filter(|row| !names.contains_key(&row.code_muni))
        .count();
    let without_area = joined
        .iter()
        .filter(|row| !areas.contains_key(&row.code_muni))
        .count();
    debug!(unnamed, without_area, "enrichment misses");

    let mut rows = enrich(joined, &names, &areas);
    sort_panel(&mut rows);
    info!(rows = rows.len(), municipalities_with_area = areas.len(), "built panel");
    Ok(rows)
}

/// Builds the panel frame.
///
/// Columns: `code_muni`, `ano`, value, population, `municipio`, area,
/// per-capita, per-area (names from `labels`). `municipio` comes from the
/// reference when it lists the code, and falls back to the value table's
/// name otherwise, so it is never null. See [`build_panel_rows`].
pub fn build_panel(
    reference: &DataFrame,
    value_raw: &DataFrame,
    population_raw: &DataFrame,
    area_raw: &DataFrame,
    labels: &IndicatorLabels,
) -> Result<DataFrame> {
    let rows = build_panel_rows(reference, value_raw, population_raw, area_raw, labels)?;
    panel_to_frame(&rows, labels)
}

pub fn panel_to_frame(rows: &[PanelRow], labels: &IndicatorLabels) -> Result<DataFrame> {
    let codes: Vec<i64> = rows.iter().map(|row| row.code_muni).collect();
    let years: Vec<i64> = rows.iter().map(|row| row.ano).collect();
    let values: Vec<f64> = rows.iter().map(|row| row.value).collect();
    let populations: Vec<f64> = rows.iter().map(|row| row.population).collect();
    let names: Vec<&str> = rows.iter().map(|row| row.municipio.as_str()).collect();
    let areas: Vec<Option<f64>> = rows.iter().map(|row| row.area).collect();
    let per_capita: Vec<f64> = rows.iter().map(|row| row.per_capita).collect();
    let per_area: Vec<Option<f64>> = rows.iter().map(|row| row.per_area).collect();
    Ok(DataFrame::new(vec![
        Series::new(CODE_MUNI.into(), codes).into_column(),
        Series::new(ANO.into(), years).into_column(),
        Series::new(labels.value.as_str().into(), values).into_column(),
        Series::new(labels.population.as_str().into(), populations).into_column(),
        Series::new(MUNICIPIO.into(), names).into_column(),
        Series::new(labels.area.as_str().into(), areas).into_column(),
        Series::new(labels.per_capita().into(), per_capita).into_column(),
        Series::new(labels.per_area().into(), per_area).into_column(),
    ])?)
}
