//! SIDRA data transformation.
//!
//! - **normalize**: raw SIDRA table to tidy `{code_muni, municipio, ano, <indicator>}` table
//! - **frame**: the tidy table type and its typed record view
//! - **panel**: value/population join, name and area enrichment, derived indicators

pub mod frame;
pub mod normalize;
pub mod panel;

pub use frame::{TidyFrame, TidyRecord};
pub use normalize::{NormalizeOptions, normalize_table};
pub use panel::{
    JoinedRow, PanelRow, aggregate_area, build_panel, build_panel_rows, enrich, join_series,
    panel_to_frame, per_area, per_capita, reference_names, sort_panel,
};
