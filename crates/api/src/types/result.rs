use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::OffsetRange;

/// One row of a table result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    pub values: Vec<String>,
    #[serde(default)]
    pub depth: u32,
}

impl TableRow {
    #[must_use]
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_key: None,
            values: values.into_iter().map(Into::into).collect(),
            depth: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableResult {
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<OffsetRange>,
}

/// A named series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartResult {
    pub series: Vec<ChartSeries>,
}

/// Data delivered to a single consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultData {
    Table(TableResult),
    Chart(ChartResult),
}

impl ResultData {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            ResultData::Table(_) => "table",
            ResultData::Chart(_) => "chart",
        }
    }
}

/// Inbound snapshot for one poll round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub results: IndexMap<String, ResultData>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub complete: bool,
}

impl SearchResult {
    /// An empty result marking the end of a search.
    #[must_use]
    pub fn completed() -> Self {
        Self {
            complete: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, component_id: impl Into<String>, data: ResultData) -> Self {
        self.results.insert(component_id.into(), data);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    #[must_use]
    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }
}
