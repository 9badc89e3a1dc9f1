use serde::{Deserialize, Serialize};

/// A municipality of the target state as listed by the localities service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub code: i64,
    pub name: String,
}
