use serde::{Deserialize, Serialize};

/// Settings a table consumer contributes to a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default)]
    pub fields: Vec<String>,
    /// Maximum number of rows per grouping level.
    #[serde(default)]
    pub max_results: Vec<u32>,
    #[serde(default)]
    pub extract_values: bool,
}

/// Settings a chart consumer contributes to a search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    pub visualisation: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub max_values: Vec<u32>,
}

/// Per-consumer settings captured into a [`Search`](crate::Search).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComponentSettings {
    Table(TableSettings),
    Chart(ChartSettings),
}

impl ComponentSettings {
    /// Short name of the consumer kind these settings belong to.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            ComponentSettings::Table(_) => "table",
            ComponentSettings::Chart(_) => "chart",
        }
    }
}
