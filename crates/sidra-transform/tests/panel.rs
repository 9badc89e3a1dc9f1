//! Tests for panel construction.

mod common;

use common::{f64_at, i64_at, reference, sidra_table, str_at, text_df};
use sidra_common::format_numeric;
use sidra_model::{IndicatorLabels, PanelError};
use sidra_transform::{PanelRow, build_panel, build_panel_rows};

fn area_table(rows: &[(&str, &str)]) -> polars::prelude::DataFrame {
    let full: Vec<(&str, &str, &str, &str)> = rows
        .iter()
        .map(|&(code, value)| (code, "", "2022", value))
        .collect();
    sidra_table(&full)
}

fn render(rows: &[PanelRow]) -> String {
    let optional = |value: Option<f64>| value.map_or_else(|| "-".to_string(), format_numeric);
    rows.iter()
        .map(|row| {
            format!(
                "{} | {} | {} | {} | {} | {} | {} | {}",
                row.ano,
                row.code_muni,
                row.municipio,
                format_numeric(row.value),
                format_numeric(row.population),
                optional(row.area),
                format_numeric(row.per_capita),
                optional(row.per_area),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn joins_only_municipality_years_present_in_both_series() {
    let value = sidra_table(&[("1", "A", "2020", "10"), ("2", "B", "2020", "20")]);
    let population = sidra_table(&[("2", "B", "2020", "4"), ("3", "C", "2020", "5")]);
    let area = area_table(&[]);
    let rows = build_panel_rows(
        &reference(&[(1, "A"), (2, "B"), (3, "C")]),
        &value,
        &population,
        &area,
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code_muni, 2);
    assert_eq!(rows[0].ano, 2020);
}

#[test]
fn area_uses_largest_reading_per_municipality() {
    let value = sidra_table(&[("10", "X", "2020", "80"), ("11", "Y", "2020", "30")]);
    let population = sidra_table(&[("10", "X", "2020", "1"), ("11", "Y", "2020", "1")]);
    let area = area_table(&[("10", "5"), ("10", "8"), ("11", "3")]);
    let rows = build_panel_rows(
        &reference(&[(10, "X"), (11, "Y")]),
        &value,
        &population,
        &area,
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(rows[0].area, Some(8.0));
    assert_eq!(rows[1].area, Some(3.0));
}

#[test]
fn derives_per_capita_and_per_area() {
    let value = sidra_table(&[("1", "A", "2020", "100"), ("2", "B", "2020", "100")]);
    let population = sidra_table(&[("1", "A", "2020", "20"), ("2", "B", "2020", "20")]);
    let area = area_table(&[("1", "10"), ("2", "0")]);
    let panel = build_panel(
        &reference(&[(1, "A"), (2, "B")]),
        &value,
        &population,
        &area,
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(panel.height(), 2);
    for idx in 0..2 {
        assert_eq!(f64_at(&panel, "pib_pc", idx), Some(5.0));
    }
    let first = i64_at(&panel, "code_muni", 0);
    let (with_area, zero_area) = if first == Some(1) { (0, 1) } else { (1, 0) };
    assert_eq!(f64_at(&panel, "pib_km2", with_area), Some(10.0));
    assert_eq!(f64_at(&panel, "area", zero_area), Some(0.0));
    assert_eq!(f64_at(&panel, "pib_km2", zero_area), None);
}

#[test]
fn zero_population_gives_infinite_per_capita() {
    let value = sidra_table(&[("1", "A", "2020", "100"), ("2", "B", "2020", "0")]);
    let population = sidra_table(&[("1", "A", "2020", "0"), ("2", "B", "2020", "0")]);
    let rows = build_panel_rows(
        &reference(&[(1, "A"), (2, "B")]),
        &value,
        &population,
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(rows[0].per_capita, f64::INFINITY);
    assert!(rows[1].per_capita.is_nan());
    assert_eq!(rows[0].per_area, None);
}

#[test]
fn orders_by_year_then_descending_value() {
    let value = sidra_table(&[
        ("1", "A", "2021", "50"),
        ("2", "B", "2021", "80"),
        ("3", "C", "2020", "10"),
    ]);
    let population = sidra_table(&[
        ("1", "A", "2021", "1"),
        ("2", "B", "2021", "1"),
        ("3", "C", "2020", "1"),
    ]);
    let panel = build_panel(
        &reference(&[(1, "A"), (2, "B"), (3, "C")]),
        &value,
        &population,
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap();
    let order: Vec<(Option<i64>, Option<f64>)> = (0..panel.height())
        .map(|idx| (i64_at(&panel, "ano", idx), f64_at(&panel, "pib", idx)))
        .collect();
    assert_eq!(
        order,
        vec![
            (Some(2020), Some(10.0)),
            (Some(2021), Some(80.0)),
            (Some(2021), Some(50.0)),
        ]
    );
}

#[test]
fn reference_names_override_table_names() {
    let value = sidra_table(&[("1", "Goiania - GO", "2020", "10"), ("9", "Sem Nome - GO", "2020", "5")]);
    let population = sidra_table(&[("1", "", "2020", "1"), ("9", "", "2020", "1")]);
    let panel = build_panel(
        &reference(&[(1, "Goiânia")]),
        &value,
        &population,
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(str_at(&panel, "municipio", 0), "Goiânia");
    assert_eq!(str_at(&panel, "municipio", 1), "Sem Nome - GO");
    assert_eq!(f64_at(&panel, "area", 1), None);
}

#[test]
fn panel_columns_follow_labels() {
    let labels = IndicatorLabels::new("vab", "habitantes", "km2");
    let panel = build_panel(
        &reference(&[(1, "A")]),
        &sidra_table(&[("1", "A", "2020", "10")]),
        &sidra_table(&[("1", "A", "2020", "2")]),
        &area_table(&[("1", "5")]),
        &labels,
    )
    .unwrap();
    let names: Vec<String> = panel
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["code_muni", "ano", "vab", "habitantes", "municipio", "km2", "vab_pc", "vab_km2"]
    );
    assert_eq!(f64_at(&panel, "vab_km2", 0), Some(2.0));
}

#[test]
fn missing_value_column_aborts_the_build() {
    let population = text_df(vec![("Município (Código)", vec!["1"]), ("Valor", vec!["3"])]);
    let error = build_panel(
        &reference(&[(1, "A")]),
        &sidra_table(&[("1", "A", "2020", "10")]),
        &population,
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap_err();
    assert!(matches!(
        error,
        PanelError::MissingValueColumn { ref indicator } if indicator == "pop"
    ));
}

#[test]
fn reference_without_code_column_is_rejected() {
    let reference = text_df(vec![("nome", vec!["Goiânia"])]);
    let error = build_panel(
        &reference,
        &sidra_table(&[]),
        &sidra_table(&[]),
        &sidra_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap_err();
    assert!(matches!(error, PanelError::MissingReferenceColumn(_)));
}

#[test]
fn reference_codes_may_be_text() {
    let reference = text_df(vec![("code_muni", vec!["5208707"]), ("municipio", vec!["Goiânia"])]);
    let rows = build_panel_rows(
        &reference,
        &sidra_table(&[("5208707", "", "2020", "10")]),
        &sidra_table(&[("5208707", "", "2020", "2")]),
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(rows[0].municipio, "Goiânia");
}

#[test]
fn reference_code_lookup_matches_fetching() {
    let reference = text_df(vec![
        ("id_municipio", vec!["1"]),
        ("code_muni", vec!["5.208.707"]),
        ("municipio", vec!["Goiânia"]),
    ]);
    assert_eq!(sidra_ingest::reference_codes(&reference).unwrap(), vec![5208707]);
    let rows = build_panel_rows(
        &reference,
        &sidra_table(&[("5208707", "Goiania - GO", "2020", "10")]),
        &sidra_table(&[("5208707", "", "2020", "2")]),
        &area_table(&[]),
        &IndicatorLabels::default(),
    )
    .unwrap();
    assert_eq!(rows[0].municipio, "Goiânia");
}

#[test]
fn duplicate_labels_are_rejected_before_building() {
    let error = build_panel(
        &reference(&[(1, "A")]),
        &sidra_table(&[("1", "A", "2020", "10")]),
        &sidra_table(&[("1", "A", "2020", "2")]),
        &area_table(&[]),
        &IndicatorLabels::new("pib", "pib", "area"),
    )
    .unwrap_err();
    assert!(matches!(
        error,
        PanelError::InvalidLabel { ref label, .. } if label == "pib"
    ));
}

#[test]
fn goias_panel_snapshot() {
    let municipalities = reference(&[
        (5200050, "Abadia de Goiás"),
        (5201108, "Anápolis"),
        (5208707, "Goiânia"),
    ]);
    let value = sidra_table(&[
        ("5208707", "Goiânia - GO", "2020", "1.000.000"),
        ("5201108", "Anápolis - GO", "2020", "400.000"),
        ("5200050", "Abadia de Goiás - GO", "2020", "30.000"),
        ("5208707", "Goiânia - GO", "2021", "1.200.000"),
        ("5200050", "Abadia de Goiás - GO", "2021", "..."),
    ]);
    let population = sidra_table(&[
        ("5208707", "Goiânia - GO", "2020", "1.000"),
        ("5201108", "Anápolis - GO", "2020", "500"),
        ("5200050", "Abadia de Goiás - GO", "2020", "0"),
        ("5208707", "Goiânia - GO", "2021", "1.200"),
        ("5200050", "Abadia de Goiás - GO", "2021", "9.000"),
    ]);
    let area = area_table(&[("5208707", "250,0"), ("5208707", "0"), ("5200050", "12,5")]);
    let rows = build_panel_rows(
        &municipalities,
        &value,
        &population,
        &area,
        &IndicatorLabels::default(),
    )
    .unwrap();
    insta::assert_snapshot!(render(&rows), @r"
    2020 | 5208707 | Goiânia | 1000000 | 1000 | 250 | 1000 | 4000
    2020 | 5201108 | Anápolis | 400000 | 500 | - | 800 | -
    2020 | 5200050 | Abadia de Goiás | 30000 | 0 | 12.5 | inf | 2400
    2021 | 5208707 | Goiânia | 1200000 | 1200 | 250 | 1000 | 4800
    ");
}
