//! External data-source collaborators.
//!
//! Retrieval of the municipality list and of raw tables lives behind these
//! traits so the normalization and panel code only ever sees materialized
//! frames. Retries, caching, and HTTP belong to implementations.

use polars::prelude::DataFrame;
use sidra_model::{Period, Result, TableRequest, TerritorialLevel};
use tracing::{info, info_span};

use crate::records::reference_codes;

/// Supplies the municipalities of a region (a state code such as `52`).
pub trait MunicipalitySource {
    /// Returns a frame with a municipality code column and a `municipio` name column.
    fn municipalities(&self, region: u32) -> Result<DataFrame>;
}

/// Supplies raw statistical tables.
pub trait TableSource {
    fn fetch_table(&self, request: &TableRequest) -> Result<DataFrame>;
}

/// Table code and period for each of the three panel inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub level: TerritorialLevel,
    pub value_table: String,
    pub value_period: Period,
    pub population_table: String,
    pub population_period: Period,
    pub area_table: String,
    pub area_period: Period,
}

impl Default for FetchPlan {
    /// Municipal GDP (5938), resident population estimates (1301), and
    /// territorial area (6579); area barely changes, so only its latest
    /// period is requested.
    fn default() -> Self {
        Self {
            level: TerritorialLevel::Municipality,
            value_table: "5938".to_string(),
            value_period: Period::Last(10),
            population_table: "1301".to_string(),
            population_period: Period::Last(10),
            area_table: "6579".to_string(),
            area_period: Period::Last(1),
        }
    }
}

impl FetchPlan {
    /// The three requests for the given municipality codes, in
    /// value, population, area order.
    pub fn requests(&self, area_codes: &[i64]) -> [TableRequest; 3] {
        let request = |table: &str, period: &Period| {
            TableRequest::new(table, self.level.clone(), period.clone())
                .with_area_codes(area_codes.to_vec())
        };
        [
            request(&self.value_table, &self.value_period),
            request(&self.population_table, &self.population_period),
            request(&self.area_table, &self.area_period),
        ]
    }
}

/// Materialized inputs of a panel build.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub municipalities: DataFrame,
    pub value: DataFrame,
    pub population: DataFrame,
    pub area: DataFrame,
}

/// Fetches the municipality list of `region`, then the three raw tables for
/// those municipalities.
pub fn fetch_raw_inputs<S>(source: &S, region: u32, plan: &FetchPlan) -> Result<RawInputs>
where
    S: MunicipalitySource + TableSource,
{
    let span = info_span!("fetch_raw_inputs", region);
    let _guard = span.enter();
    let municipalities = source.municipalities(region)?;
    let codes = reference_codes(&municipalities)?;
    info!(municipalities = codes.len(), "loaded municipality list");
    let [value_request, population_request, area_request] = plan.requests(&codes);
    let value = source.fetch_table(&value_request)?;
    let population = source.fetch_table(&population_request)?;
    let area = source.fetch_table(&area_request)?;
    info!(
        value_rows = value.height(),
        population_rows = population.height(),
        area_rows = area.height(),
        "fetched raw tables"
    );
    Ok(RawInputs {
        municipalities,
        value,
        population,
        area,
    })
}
