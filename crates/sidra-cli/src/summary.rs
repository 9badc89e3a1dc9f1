//! Terminal summary of a built panel.

use std::collections::{BTreeMap, BTreeSet};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use sidra_common::format_numeric;
use sidra_transform::PanelRow;

use crate::commands::BuildOutcome;

/// Totals for one year of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub ano: i64,
    pub municipalities: usize,
    pub total_value: f64,
    pub total_population: f64,
    /// Name and value of the highest-value municipality; the first one wins ties.
    pub top: Option<(String, f64)>,
}

/// Per-year totals, in ascending year order.
pub fn summarize_years(rows: &[PanelRow]) -> Vec<YearSummary> {
    let mut years: BTreeMap<i64, (YearSummary, BTreeSet<i64>)> = BTreeMap::new();
    for row in rows {
        let (summary, codes) = years.entry(row.ano).or_insert_with(|| {
            (
                YearSummary {
                    ano: row.ano,
                    municipalities: 0,
                    total_value: 0.0,
                    total_population: 0.0,
                    top: None,
                },
                BTreeSet::new(),
            )
        });
        codes.insert(row.code_muni);
        summary.total_value += row.value;
        summary.total_population += row.population;
        let beats_top = summary
            .top
            .as_ref()
            .is_none_or(|(_, value)| row.value > *value);
        if beats_top {
            summary.top = Some((row.municipio.clone(), row.value));
        }
    }
    years
        .into_values()
        .map(|(mut summary, codes)| {
            summary.municipalities = codes.len();
            summary
        })
        .collect()
}

/// The `n` highest-value rows of the latest year, highest first.
pub fn top_rows(rows: &[PanelRow], n: usize) -> Vec<&PanelRow> {
    let Some(latest) = rows.iter().map(|row| row.ano).max() else {
        return Vec::new();
    };
    let mut ranked: Vec<&PanelRow> = rows.iter().filter(|row| row.ano == latest).collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    ranked
}

pub fn print_summary(outcome: &BuildOutcome, top: usize) {
    if let Some(path) = &outcome.output {
        println!("Output: {}", path.display());
    }
    let labels = &outcome.labels;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Municipalities"),
        header_cell(&format!("Total {}", labels.value)),
        header_cell(&format!("Total {}", labels.population)),
        header_cell("Top municipality"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let years = summarize_years(&outcome.rows);
    for year in &years {
        let top_cell = match &year.top {
            Some((name, value)) => Cell::new(format!("{name} ({})", format_numeric(*value))),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(year.ano)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(year.municipalities),
            Cell::new(format_numeric(year.total_value)),
            Cell::new(format_numeric(year.total_population)),
            top_cell,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.rows.len()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell(format!("{} years", years.len())),
    ]);
    println!("{table}");
    if top > 0 {
        print_top_table(outcome, top);
    }
}

fn print_top_table(outcome: &BuildOutcome, n: usize) {
    let ranked = top_rows(&outcome.rows, n);
    if ranked.is_empty() {
        return;
    }
    let labels = &outcome.labels;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Municipality"),
        header_cell("Year"),
        header_cell(&labels.value),
        header_cell(&labels.per_capita()),
        header_cell(&labels.per_area()),
    ]);
    apply_table_style(&mut table);
    for index in [0, 2, 3, 4, 5] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (rank, row) in ranked.into_iter().enumerate() {
        table.add_row(vec![
            dim_cell(rank + 1),
            Cell::new(&row.municipio),
            Cell::new(row.ano),
            Cell::new(format_numeric(row.value)),
            Cell::new(format_numeric(row.per_capita)),
            row.per_area
                .map_or_else(|| dim_cell("-"), |value| Cell::new(format_numeric(value))),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
