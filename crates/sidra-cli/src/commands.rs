use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::Table;
use polars::prelude::{CsvWriter, SerWriter};
use sidra_ingest::{FetchPlan, FileSource, fetch_raw_inputs};
use sidra_model::IndicatorLabels;
use sidra_transform::{PanelRow, build_panel_rows, panel_to_frame};
use tracing::{info, info_span};

use crate::cli::BuildArgs;
use crate::summary::{apply_table_style, header_cell};

/// Result of a `build` run.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub rows: Vec<PanelRow>,
    pub labels: IndicatorLabels,
    /// Where the panel was written, if anywhere.
    pub output: Option<PathBuf>,
}

pub fn run_plan() {
    let plan = FetchPlan::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Table"),
        header_cell("Level"),
        header_cell("Period"),
    ]);
    apply_table_style(&mut table);
    for (input, request) in ["value", "population", "area"]
        .into_iter()
        .zip(plan.requests(&[]))
    {
        table.add_row(vec![
            input.to_string(),
            request.table_code,
            request.level.to_string(),
            request.period.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn run_build(args: &BuildArgs) -> Result<BuildOutcome> {
    let span = info_span!("build", region = args.region);
    let _guard = span.enter();

    let labels = args.labels();
    labels.validate().context("check indicator labels")?;
    let plan = FetchPlan::default();
    let source = FileSource::new(&args.municipalities)
        .with_table(plan.value_table.as_str(), &args.value)
        .with_table(plan.population_table.as_str(), &args.population)
        .with_table(plan.area_table.as_str(), &args.area);
    let inputs = fetch_raw_inputs(&source, args.region, &plan).context("load inputs")?;

    let rows = build_panel_rows(
        &inputs.municipalities,
        &inputs.value,
        &inputs.population,
        &inputs.area,
        &labels,
    )
    .context("build panel")?;

    if let Some(path) = &args.output {
        write_panel(&rows, &labels, path)?;
    }
    Ok(BuildOutcome {
        rows,
        labels,
        output: args.output.clone(),
    })
}

/// Writes the panel as CSV with a header row, creating parent directories.
pub fn write_panel(rows: &[PanelRow], labels: &IndicatorLabels, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut frame = panel_to_frame(rows, labels).context("assemble panel frame")?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = frame.height(), "wrote panel");
    Ok(())
}
