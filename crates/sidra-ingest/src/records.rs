//! Loading raw tables and municipality lists from files.
//!
//! Raw tables are loaded with every cell as text (or null), leaving numeric
//! interpretation to the normalizer.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::Deserialize;
use serde_json::{Map, Value};
use sidra_common::coerce_int;
use sidra_model::columns::{CODE_MUNI, ID_MUNICIPIO, MUNICIPIO};
use sidra_model::{Municipality, PanelError, Result};
use tracing::debug;

fn parse_error(path: &Path, error: impl ToString) -> PanelError {
    PanelError::Parse {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

fn normalize_cell(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches('\u{feff}');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn string_frame(headers: Vec<String>, columns: Vec<Vec<Option<String>>>) -> Result<DataFrame> {
    let cols: Vec<Column> = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    Ok(DataFrame::new(cols)?)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // Written with a decimal comma so the separator rule reads it back unchanged.
        Value::Number(n) => Some(n.to_string().replace('.', ",")),
        other => Some(other.to_string()),
    }
}

/// Builds an all-text frame from JSON records.
///
/// Columns appear in order of first appearance across the records; a key
/// missing from a record becomes a null cell. JSON numbers are rendered with
/// a decimal comma (`1234.5` becomes `"1234,5"`), the convention SIDRA uses
/// for values published as text.
pub fn records_to_frame(records: &[Map<String, Value>]) -> Result<DataFrame> {
    let mut headers: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in records {
        for key in record.keys() {
            if !index.contains_key(key) {
                index.insert(key.clone(), headers.len());
                headers.push(key.clone());
            }
        }
    }
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(records.len()); headers.len()];
    for record in records {
        for (idx, header) in headers.iter().enumerate() {
            columns[idx].push(record.get(header).and_then(cell_text));
        }
    }
    string_frame(headers, columns)
}

/// Reads a JSON array of records, as returned by the SIDRA values API.
pub fn read_records_json(path: &Path) -> Result<DataFrame> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<Map<String, Value>> =
        serde_json::from_reader(reader).map_err(|error| parse_error(path, error))?;
    debug!(path = %path.display(), records = records.len(), "read json records");
    records_to_frame(&records)
}

/// Reads a CSV file with a header row; every cell is kept as text.
pub fn read_raw_csv(path: &Path) -> Result<DataFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|error| parse_error(path, error))?;
    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|error| parse_error(path, error))?
            .iter()
            .map(|value| value.trim().trim_matches('\u{feff}').to_string())
            .collect(),
        None => return Ok(DataFrame::empty()),
    };
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in records {
        let record = record.map_err(|error| parse_error(path, error))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(normalize_cell));
        }
    }
    debug!(path = %path.display(), columns = headers.len(), "read raw csv");
    string_frame(headers, columns)
}

/// Reads a raw table, choosing the format from the file extension.
///
/// `.json` files are JSON records; anything else is read as CSV.
pub fn read_raw_table(path: &Path) -> Result<DataFrame> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        read_records_json(path)
    } else {
        read_raw_csv(path)
    }
}

#[derive(Debug, Deserialize)]
struct Localidade {
    id: i64,
    nome: String,
}

/// Reads a municipality list in the localities service format
/// (`[{"id": 5200050, "nome": "Abadia de Goiás", ...}]`).
pub fn read_municipalities_json(path: &Path) -> Result<Vec<Municipality>> {
    let reader = BufReader::new(File::open(path)?);
    let entries: Vec<Localidade> =
        serde_json::from_reader(reader).map_err(|error| parse_error(path, error))?;
    Ok(entries
        .into_iter()
        .map(|entry| Municipality {
            code: entry.id,
            name: entry.nome,
        })
        .collect())
}

/// Builds the municipality reference frame `{id_municipio, municipio}`.
pub fn municipalities_to_frame(municipalities: &[Municipality]) -> Result<DataFrame> {
    let codes: Vec<i64> = municipalities.iter().map(|m| m.code).collect();
    let names: Vec<&str> = municipalities.iter().map(|m| m.name.as_str()).collect();
    Ok(DataFrame::new(vec![
        Series::new(ID_MUNICIPIO.into(), codes).into_column(),
        Series::new(MUNICIPIO.into(), names).into_column(),
    ])?)
}

/// Name of the code column of a municipality reference: `code_muni` when
/// present, otherwise `id_municipio`.
pub fn reference_code_column(reference: &DataFrame) -> Result<&'static str> {
    [CODE_MUNI, ID_MUNICIPIO]
        .into_iter()
        .find(|name| reference.column(name).is_ok())
        .ok_or_else(|| PanelError::MissingReferenceColumn(CODE_MUNI.to_string()))
}

/// Municipality codes of a reference frame, read from
/// [`reference_code_column`].
///
/// Cells are read with [`coerce_int`], so `"5.208.707"` resolves; cells that
/// do not resolve are skipped.
pub fn reference_codes(reference: &DataFrame) -> Result<Vec<i64>> {
    let column = reference.column(reference_code_column(reference)?)?;
    Ok((0..reference.height())
        .filter_map(|idx| coerce_int(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect())
}
