use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use sidra_model::{PanelError, Result, TableRequest};
use tracing::debug;

use crate::records::{
    municipalities_to_frame, read_municipalities_json, read_raw_csv, read_raw_table,
};
use crate::source::{MunicipalitySource, TableSource};

/// A source backed by previously saved responses.
///
/// Each file holds one complete response: the municipality list for a single
/// state, and one raw table per table code. Requests are answered with the
/// file contents as they are; area codes and periods are not re-filtered.
#[derive(Debug, Clone)]
pub struct FileSource {
    municipalities: PathBuf,
    tables: BTreeMap<String, PathBuf>,
}

impl FileSource {
    pub fn new(municipalities: impl Into<PathBuf>) -> Self {
        Self {
            municipalities: municipalities.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Registers the file answering requests for `table_code`.
    #[must_use]
    pub fn with_table(mut self, table_code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tables.insert(table_code.into(), path.into());
        self
    }

    pub fn table_path(&self, table_code: &str) -> Option<&Path> {
        self.tables.get(table_code).map(PathBuf::as_path)
    }
}

impl MunicipalitySource for FileSource {
    fn municipalities(&self, region: u32) -> Result<DataFrame> {
        debug!(region, path = %self.municipalities.display(), "reading municipality list");
        let is_csv = self
            .municipalities
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            read_raw_csv(&self.municipalities)
        } else {
            municipalities_to_frame(&read_municipalities_json(&self.municipalities)?)
        }
    }
}

impl TableSource for FileSource {
    fn fetch_table(&self, request: &TableRequest) -> Result<DataFrame> {
        let path = self.table_path(&request.table_code).ok_or_else(|| {
            PanelError::Source(format!(
                "no file registered for table {}",
                request.table_code
            ))
        })?;
        debug!(
            table = %request.table_code,
            period = %request.period,
            path = %path.display(),
            "reading raw table"
        );
        read_raw_table(path)
    }
}
