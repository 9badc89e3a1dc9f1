//! Tests for raw table normalization.

mod common;

use common::{f64_at, i64_at, sidra_table, str_at, text_df};
use serde_json::{Map, Value, json};
use sidra_ingest::records_to_frame;
use sidra_model::PanelError;
use sidra_transform::{NormalizeOptions, normalize_table};

#[test]
fn normalizes_sidra_response() {
    let raw = sidra_table(&[
        ("5208707", "Goiânia - GO", "2020", "51.961.089"),
        ("5201108", "Anápolis - GO", "2020", "16.450.050,5"),
    ]);
    let tidy = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert_eq!(tidy.indicator, "pib");
    assert_eq!(tidy.record_count(), 2);

    let names: Vec<String> = tidy
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["code_muni", "municipio", "ano", "pib"]);

    let df = &tidy.data;
    assert_eq!(i64_at(df, "code_muni", 0), Some(5208707));
    assert_eq!(str_at(df, "municipio", 0), "Goiânia - GO");
    assert_eq!(i64_at(df, "ano", 0), Some(2020));
    assert_eq!(f64_at(df, "pib", 0), Some(51_961_089.0));
    assert_eq!(f64_at(df, "pib", 1), Some(16_450_050.5));
}

#[test]
fn drops_header_row_and_missing_markers() {
    let raw = sidra_table(&[
        ("5200050", "Abadia de Goiás - GO", "2020", "..."),
        ("5200100", "Abadiânia - GO", "2020", "-"),
        ("5200134", "Acreúna - GO", "2020", "X"),
        ("5200159", "Adelândia - GO", "2020", "12,5"),
    ]);
    let tidy = normalize_table(&raw, "pop", NormalizeOptions::default()).unwrap();
    assert_eq!(tidy.record_count(), 1);
    assert_eq!(i64_at(&tidy.data, "code_muni", 0), Some(5200159));
    assert_eq!(f64_at(&tidy.data, "pop", 0), Some(12.5));
}

#[test]
fn every_row_has_a_value() {
    let raw = sidra_table(&[
        ("1", "A", "2020", "10"),
        ("2", "B", "2020", ""),
        ("3", "C", "2020", "30"),
    ]);
    let tidy = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    for record in tidy.records() {
        assert!(record.value.is_finite());
    }
    assert_eq!(tidy.records().len(), 2);
}

#[test]
fn non_numeric_values_yield_empty_table() {
    let raw = text_df(vec![
        ("Município (Código)", vec!["1", "2"]),
        ("V", vec!["n/a", "Valor"]),
    ]);
    let tidy = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert_eq!(tidy.record_count(), 0);
    assert_eq!(tidy.data.width(), 4);
}

#[test]
fn missing_value_column_is_fatal() {
    let raw = text_df(vec![
        ("Município (Código)", vec!["5208707"]),
        ("Município", vec!["Goiânia"]),
        ("Ano", vec!["2020"]),
        ("Valor", vec!["10"]),
        ("v", vec!["10"]),
    ]);
    let error = normalize_table(&raw, "area", NormalizeOptions::default()).unwrap_err();
    match error {
        PanelError::MissingValueColumn { indicator } => assert_eq!(indicator, "area"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unresolved_columns_degrade_to_nulls() {
    let raw = text_df(vec![("Unidade de Medida", vec!["Mil Reais"]), ("V", vec!["7"])]);
    let tidy = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert_eq!(tidy.record_count(), 1);
    assert_eq!(i64_at(&tidy.data, "code_muni", 0), None);
    assert_eq!(str_at(&tidy.data, "municipio", 0), "");
    assert_eq!(i64_at(&tidy.data, "ano", 0), None);
    assert_eq!(f64_at(&tidy.data, "pib", 0), Some(7.0));
}

#[test]
fn territory_columns_are_a_fallback() {
    let raw = text_df(vec![
        ("Território (Código)", vec!["5208707"]),
        ("Território", vec!["Goiânia"]),
        ("Período", vec!["2019"]),
        ("V", vec!["3"]),
    ]);
    let tidy = normalize_table(&raw, "pop", NormalizeOptions::default()).unwrap();
    assert_eq!(i64_at(&tidy.data, "code_muni", 0), Some(5208707));
    assert_eq!(str_at(&tidy.data, "municipio", 0), "Goiânia");
    assert_eq!(i64_at(&tidy.data, "ano", 0), Some(2019));
}

#[test]
fn codes_and_years_use_numeric_coercion() {
    let raw = text_df(vec![
        ("Município (Código)", vec!["5.208.707", "abc"]),
        ("Ano", vec!["2020,9", "2021"]),
        ("V", vec!["1", "2"]),
    ]);
    let tidy = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert_eq!(i64_at(&tidy.data, "code_muni", 0), Some(5208707));
    assert_eq!(i64_at(&tidy.data, "ano", 0), Some(2020));
    assert_eq!(i64_at(&tidy.data, "code_muni", 1), None);
    assert_eq!(i64_at(&tidy.data, "ano", 1), Some(2021));
}

#[test]
fn extra_dimensions_pass_through_when_enabled() {
    let raw = text_df(vec![
        ("Município (Código)", vec!["Município (Código)", "5208707", "5201108"]),
        ("D1C", vec!["Município (Código)", "5208707", "5201108"]),
        ("D2N", vec!["Variável", "PIB", "PIB"]),
        ("V", vec!["Valor", "10", "..."]),
    ]);
    let plain = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert_eq!(plain.data.width(), 4);

    let options = NormalizeOptions::default().with_extra_dimensions(true);
    let tidy = normalize_table(&raw, "pib", options).unwrap();
    let names: Vec<String> = tidy
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["code_muni", "municipio", "ano", "pib", "D1C", "D2N"]);
    assert_eq!(tidy.record_count(), 1);
    assert_eq!(str_at(&tidy.data, "D1C", 0), "5208707");
    assert_eq!(str_at(&tidy.data, "D2N", 0), "PIB");
}

#[test]
fn repeated_normalization_is_identical() {
    let raw = sidra_table(&[
        ("5208707", "Goiânia - GO", "2020", "1.000"),
        ("5201108", "Anápolis - GO", "2021", "2.000"),
    ]);
    let first = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    let second = normalize_table(&raw, "pib", NormalizeOptions::default()).unwrap();
    assert!(first.data.equals_missing(&second.data));
    assert_eq!(first.records(), second.records());
}

#[test]
fn json_numbers_keep_their_value() {
    let records: Vec<Map<String, Value>> = vec![
        json!({"Município (Código)": 5208707, "Ano": 2020, "V": 1234.5}),
        json!({"Município (Código)": 5200050, "Ano": 2020, "V": 30000}),
    ]
    .into_iter()
    .filter_map(|value| value.as_object().cloned())
    .collect();
    let raw = records_to_frame(&records).unwrap();
    let tidy = normalize_table(&raw, "area", NormalizeOptions::default()).unwrap();
    assert_eq!(tidy.record_count(), 2);
    assert_eq!(f64_at(&tidy.data, "area", 0), Some(1234.5));
    assert_eq!(f64_at(&tidy.data, "area", 1), Some(30000.0));
    assert_eq!(i64_at(&tidy.data, "code_muni", 0), Some(5208707));
    assert_eq!(i64_at(&tidy.data, "ano", 0), Some(2020));
}

#[test]
fn indicator_named_like_canonical_column_is_rejected() {
    let raw = sidra_table(&[("5208707", "Goiânia - GO", "2020", "10")]);
    for indicator in ["ano", "code_muni", "municipio", ""] {
        let error = normalize_table(&raw, indicator, NormalizeOptions::default()).unwrap_err();
        assert!(
            matches!(error, PanelError::InvalidLabel { ref label, .. } if label == indicator),
            "unexpected error for {indicator:?}: {error}"
        );
    }
}
