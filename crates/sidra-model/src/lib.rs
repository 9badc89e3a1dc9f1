//! Data model for the SIDRA municipal panel.
//!
//! - **error**: the error taxonomy shared by every crate
//! - **columns**: canonical column names of tidy tables and panels
//! - **indicator**: labels for the value, population, and area series
//! - **request**: period and table request types for external sources

pub mod columns;
pub mod error;
pub mod indicator;
pub mod municipality;
pub mod request;

pub use error::{PanelError, Result};
pub use indicator::{IndicatorLabels, check_indicator_name};
pub use municipality::Municipality;
pub use request::{ParsePeriodError, Period, TableRequest, TerritorialLevel};
