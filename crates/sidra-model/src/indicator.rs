use serde::{Deserialize, Serialize};

use crate::columns::{ANO, CODE_MUNI, MUNICIPIO};
use crate::error::{PanelError, Result};

/// Checks that `name` can label an indicator column of a tidy table.
///
/// # Errors
///
/// [`PanelError::InvalidLabel`] when the name is blank or is one of the
/// canonical columns (`code_muni`, `municipio`, `ano`).
pub fn check_indicator_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid_label(name, "label is blank"));
    }
    if [CODE_MUNI, MUNICIPIO, ANO].contains(&name) {
        return Err(invalid_label(name, "reserved for a canonical column"));
    }
    Ok(())
}

fn invalid_label(label: &str, reason: &str) -> PanelError {
    PanelError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}

/// Column labels for the three indicator series of a panel.
///
/// The derived per-capita and per-area columns are named after the value
/// indicator (`pib_pc`, `pib_km2` with the defaults).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLabels {
    pub value: String,
    pub population: String,
    pub area: String,
}

impl Default for IndicatorLabels {
    fn default() -> Self {
        Self {
            value: "pib".to_string(),
            population: "pop".to_string(),
            area: "area".to_string(),
        }
    }
}

impl IndicatorLabels {
    pub fn new(
        value: impl Into<String>,
        population: impl Into<String>,
        area: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            population: population.into(),
            area: area.into(),
        }
    }

    /// Name of the value-per-inhabitant column.
    pub fn per_capita(&self) -> String {
        format!("{}_pc", self.value)
    }

    /// Name of the value-per-km² column.
    pub fn per_area(&self) -> String {
        format!("{}_km2", self.value)
    }

    /// Checks that the five panel columns named by these labels are valid
    /// and distinct from each other and from the canonical columns.
    ///
    /// # Errors
    ///
    /// [`PanelError::InvalidLabel`] naming the first offending label.
    pub fn validate(&self) -> Result<()> {
        let (per_capita, per_area) = (self.per_capita(), self.per_area());
        let labels = [
            self.value.as_str(),
            self.population.as_str(),
            self.area.as_str(),
            per_capita.as_str(),
            per_area.as_str(),
        ];
        for (idx, label) in labels.iter().enumerate() {
            check_indicator_name(label)?;
            if labels[..idx].contains(label) {
                return Err(invalid_label(label, "used for more than one column"));
            }
        }
        Ok(())
    }
}
