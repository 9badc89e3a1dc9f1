//! Request types for the statistical-tables source.
//!
//! These describe what an external source is asked for; the core never
//! performs the retrieval itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Period specifier understood by the SIDRA API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// The `n` most recent periods available.
    Last(u32),
    /// Every period the table has.
    All,
    /// A literal period expression, e.g. `2020` or `2015-2020`.
    Fixed(String),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last(n) => write!(f, "last {n}"),
            Self::All => write!(f, "all"),
            Self::Fixed(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError(String);

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid period specifier: {}", self.0)
    }
}

impl std::error::Error for ParsePeriodError {}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParsePeriodError(s.to_string()));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower == "all" {
            return Ok(Self::All);
        }
        let mut parts = lower.split_whitespace();
        if parts.next() == Some("last") {
            let count = parts
                .next()
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n > 0);
            return match (count, parts.next()) {
                (Some(n), None) => Ok(Self::Last(n)),
                _ => Err(ParsePeriodError(s.to_string())),
            };
        }
        Ok(Self::Fixed(trimmed.to_string()))
    }
}

/// Geographic granularity of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerritorialLevel {
    State,
    Municipality,
    Other(String),
}

impl TerritorialLevel {
    /// The level code used by the SIDRA API.
    pub fn code(&self) -> &str {
        match self {
            Self::State => "3",
            Self::Municipality => "6",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for TerritorialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One raw-table request: a table code for a set of territorial units over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRequest {
    pub table_code: String,
    pub level: TerritorialLevel,
    pub area_codes: Vec<i64>,
    pub period: Period,
}

impl TableRequest {
    pub fn new(table_code: impl Into<String>, level: TerritorialLevel, period: Period) -> Self {
        Self {
            table_code: table_code.into(),
            level,
            area_codes: Vec::new(),
            period,
        }
    }

    #[must_use]
    pub fn with_area_codes(mut self, codes: Vec<i64>) -> Self {
        self.area_codes = codes;
        self
    }

    /// Area codes joined with commas, as the API expects them.
    pub fn area_codes_param(&self) -> String {
        self.area_codes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
