use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    /// The raw table has no column named exactly `V`.
    #[error("value column 'V' absent from the {indicator} table")]
    MissingValueColumn { indicator: String },
    /// An indicator label that would duplicate another panel column.
    #[error("invalid indicator label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },
    #[error("municipality reference has no '{0}' column")]
    MissingReferenceColumn(String),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },
    #[error("data source error: {0}")]
    Source(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PanelError>;
