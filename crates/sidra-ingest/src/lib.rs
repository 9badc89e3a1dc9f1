pub mod columns;
pub mod file_source;
pub mod records;
pub mod source;

pub use columns::{
    CODE_RULES, ColumnMatch, ColumnRule, DiscoveredColumns, NAME_RULES, TIME_RULES,
    discover_columns, find_column, is_extra_dimension, normalize_column_name,
};
pub use file_source::FileSource;
pub use records::{
    municipalities_to_frame, read_municipalities_json, read_raw_csv, read_raw_table,
    read_records_json, records_to_frame, reference_code_column, reference_codes,
};
pub use source::{FetchPlan, MunicipalitySource, RawInputs, TableSource, fetch_raw_inputs};
