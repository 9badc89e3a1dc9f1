//! Canonical column names shared by the tidy tables and the panel.

/// Municipality code (nullable integer).
pub const CODE_MUNI: &str = "code_muni";
/// Municipality name.
pub const MUNICIPIO: &str = "municipio";
/// Reference year (nullable integer).
pub const ANO: &str = "ano";
/// Value column of a raw SIDRA table. Matched exactly, case included.
pub const VALUE_COLUMN: &str = "V";
/// Code column of the municipality list as returned by the localities service.
pub const ID_MUNICIPIO: &str = "id_municipio";
