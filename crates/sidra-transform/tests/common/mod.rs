//! Frame builders shared by the transform tests.

#![allow(dead_code)]

use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};

pub fn text_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| {
            Series::new(
                name.into(),
                values.iter().copied().map(String::from).collect::<Vec<_>>(),
            )
            .into_column()
        })
        .collect();
    DataFrame::new(cols).unwrap()
}

/// A SIDRA response with the embedded description row first.
pub fn sidra_table(rows: &[(&str, &str, &str, &str)]) -> DataFrame {
    let mut codes = vec!["Município (Código)"];
    let mut names = vec!["Município"];
    let mut years = vec!["Ano"];
    let mut values = vec!["Valor"];
    for &(code, name, year, value) in rows {
        codes.push(code);
        names.push(name);
        years.push(year);
        values.push(value);
    }
    text_df(vec![
        ("Município (Código)", codes),
        ("Município", names),
        ("Ano", years),
        ("V", values),
    ])
}

pub fn reference(rows: &[(i64, &str)]) -> DataFrame {
    DataFrame::new(vec![
        Series::new(
            "id_municipio".into(),
            rows.iter().map(|(code, _)| *code).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "municipio".into(),
            rows.iter().map(|(_, name)| *name).collect::<Vec<_>>(),
        )
        .into_column(),
    ])
    .unwrap()
}

pub fn f64_at(df: &DataFrame, column: &str, idx: usize) -> Option<f64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Float64(v) => Some(v),
        AnyValue::Null => None,
        other => panic!("unexpected value in {column}: {other:?}"),
    }
}

pub fn i64_at(df: &DataFrame, column: &str, idx: usize) -> Option<i64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Int64(v) => Some(v),
        AnyValue::Null => None,
        other => panic!("unexpected value in {column}: {other:?}"),
    }
}

pub fn str_at(df: &DataFrame, column: &str, idx: usize) -> String {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::String(v) => v.to_string(),
        AnyValue::StringOwned(v) => v.to_string(),
        other => panic!("unexpected value in {column}: {other:?}"),
    }
}
