//! Column discovery for raw SIDRA tables.
//!
//! The statistical-tables service does not keep column names stable across
//! table codes or over time, so every logical field is located through an
//! ordered list of [`ColumnRule`]s evaluated against normalized column names.
//! Rules are tried in priority order; for each rule the columns are scanned
//! in table order and the first satisfying column wins.

use std::sync::LazyLock;

use regex::Regex;
use sidra_model::columns::VALUE_COLUMN;
use tracing::debug;

const CODE_TOKENS: &[&str] = &["código", "codigo"];

/// A predicate over a normalized column name.
///
/// A column satisfies the rule when its name contains every token of
/// `all_of`, at least one token of `any_of` (when non-empty), and no token
/// of `none_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRule {
    pub name: &'static str,
    pub all_of: &'static [&'static str],
    pub any_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl ColumnRule {
    /// Tests a column name that has already gone through [`normalize_column_name`].
    pub fn matches(&self, normalized: &str) -> bool {
        self.all_of.iter().all(|token| normalized.contains(token))
            && (self.any_of.is_empty() || self.any_of.iter().any(|token| normalized.contains(token)))
            && !self.none_of.iter().any(|token| normalized.contains(token))
    }
}

/// Municipality code column, falling back to a generic territory code.
pub const CODE_RULES: &[ColumnRule] = &[
    ColumnRule {
        name: "municipality_code",
        all_of: &["munic"],
        any_of: CODE_TOKENS,
        none_of: &[],
    },
    ColumnRule {
        name: "territory_code",
        all_of: &["territ"],
        any_of: CODE_TOKENS,
        none_of: &[],
    },
];

/// Municipality name column, falling back to a generic territory name.
pub const NAME_RULES: &[ColumnRule] = &[
    ColumnRule {
        name: "municipality_name",
        all_of: &["munic"],
        any_of: &[],
        none_of: CODE_TOKENS,
    },
    ColumnRule {
        name: "territory_name",
        all_of: &["territ"],
        any_of: &[],
        none_of: CODE_TOKENS,
    },
];

/// Time column: year (code preferred), then month, then period.
///
/// `mes` also matches `trimestre`, so quarterly tables resolve here too.
pub const TIME_RULES: &[ColumnRule] = &[
    ColumnRule {
        name: "year_code",
        all_of: &["ano"],
        any_of: CODE_TOKENS,
        none_of: &[],
    },
    ColumnRule {
        name: "year",
        all_of: &["ano"],
        any_of: &[],
        none_of: &[],
    },
    ColumnRule {
        name: "month_accented",
        all_of: &["mês"],
        any_of: &[],
        none_of: &[],
    },
    ColumnRule {
        name: "month",
        all_of: &["mes"],
        any_of: &[],
        none_of: &[],
    },
    ColumnRule {
        name: "period_accented",
        all_of: &["período"],
        any_of: &[],
        none_of: &[],
    },
    ColumnRule {
        name: "period",
        all_of: &["periodo"],
        any_of: &[],
        none_of: &[],
    },
];

static EXTRA_DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^D\d+[CN]$").expect("valid dimension pattern"));

/// Lowercases a column name and collapses whitespace runs into single spaces.
///
/// # Examples
///
/// ```
/// use sidra_ingest::normalize_column_name;
///
/// assert_eq!(
///     normalize_column_name("  Município   (Código) "),
///     "município (código)"
/// );
/// ```
pub fn normalize_column_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut normalized = String::with_capacity(trimmed.len());
    for part in trimmed.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(part);
    }
    normalized.to_lowercase()
}

/// A resolved column and the rule that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    pub column: String,
    pub rule: &'static str,
}

/// Finds the first column satisfying the highest-priority rule.
pub fn find_column<S: AsRef<str>>(columns: &[S], rules: &[ColumnRule]) -> Option<ColumnMatch> {
    let normalized: Vec<String> = columns
        .iter()
        .map(|column| normalize_column_name(column.as_ref()))
        .collect();
    rules.iter().find_map(|rule| {
        normalized
            .iter()
            .position(|name| rule.matches(name))
            .map(|idx| ColumnMatch {
                column: columns[idx].as_ref().to_string(),
                rule: rule.name,
            })
    })
}

/// Whether a column follows SIDRA's generic dimension naming (`D1C`, `D3N`, ...).
pub fn is_extra_dimension(column: &str) -> bool {
    EXTRA_DIMENSION.is_match(column)
}

/// Column selections for one raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredColumns {
    /// The value column; `None` makes the table unusable.
    pub value: Option<String>,
    pub code: Option<ColumnMatch>,
    pub name: Option<ColumnMatch>,
    pub time: Option<ColumnMatch>,
    /// Generic dimension columns, in table order.
    pub extra_dimensions: Vec<String>,
}

/// Resolves every logical field of a raw table from its column names.
pub fn discover_columns<S: AsRef<str>>(columns: &[S]) -> DiscoveredColumns {
    let value = columns
        .iter()
        .map(AsRef::as_ref)
        .find(|column| *column == VALUE_COLUMN)
        .map(str::to_string);
    let discovered = DiscoveredColumns {
        value,
        code: find_column(columns, CODE_RULES),
        name: find_column(columns, NAME_RULES),
        time: find_column(columns, TIME_RULES),
        extra_dimensions: columns
            .iter()
            .map(AsRef::as_ref)
            .filter(|column| is_extra_dimension(column))
            .map(str::to_string)
            .collect(),
    };
    debug!(
        value = ?discovered.value,
        code = ?discovered.code.as_ref().map(|m| m.column.as_str()),
        name = ?discovered.name.as_ref().map(|m| m.column.as_str()),
        time = ?discovered.time.as_ref().map(|m| m.column.as_str()),
        extra = discovered.extra_dimensions.len(),
        "discovered columns"
    );
    discovered
}
