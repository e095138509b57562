use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ComponentSettings, DocRef, ExpressionOperator};

/// Immutable snapshot of what a session is asking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Search {
    pub data_source: DocRef,
    pub expression: ExpressionOperator,
    pub component_settings: IndexMap<String, ComponentSettings>,
    pub incremental: bool,
}

impl Search {
    #[must_use]
    pub fn new(
        data_source: DocRef,
        expression: ExpressionOperator,
        component_settings: IndexMap<String, ComponentSettings>,
        incremental: bool,
    ) -> Self {
        Self {
            data_source,
            expression,
            component_settings,
            incremental,
        }
    }
}

/// Window of rows a consumer wants returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRange {
    pub offset: u64,
    pub length: u64,
}

impl OffsetRange {
    #[must_use]
    pub const fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }
}

/// What one consumer asks the backend to send back in a poll round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResultRequest {
    pub settings: ComponentSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<OffsetRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub open_groups: Vec<String>,
    /// `false` while the consumer does not want data, e.g. when paused.
    pub fetch_data: bool,
}

/// Outbound request handed to the transport for one poll round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub search: Search,
    pub component_requests: IndexMap<String, ComponentResultRequest>,
    pub time_zone: String,
}

impl SearchRequest {
    /// Ids of the consumers that asked for data this round.
    pub fn fetching_ids(&self) -> impl Iterator<Item = &str> {
        self.component_requests
            .iter()
            .filter(|(_, request)| request.fetch_data)
            .map(|(id, _)| id.as_str())
    }
}
