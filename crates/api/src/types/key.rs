use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one run of a query.
///
/// `scope_id` and `query_id` name the logical query. The `discriminator`
/// changes on every restart so that a late response from an earlier run can
/// be told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub scope_id: String,
    pub scope_name: String,
    pub query_id: String,
    pub discriminator: String,
}

impl QueryKey {
    #[must_use]
    pub fn new(
        scope_id: impl Into<String>,
        scope_name: impl Into<String>,
        query_id: impl Into<String>,
        discriminator: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            scope_name: scope_name.into(),
            query_id: query_id.into(),
            discriminator: discriminator.into(),
        }
    }

    /// Returns `true` when both keys name the same logical query, ignoring
    /// the discriminator.
    #[must_use]
    pub fn same_query(&self, other: &QueryKey) -> bool {
        self.scope_id == other.scope_id && self.query_id == other.query_id
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{}",
            self.scope_id, self.query_id, self.discriminator
        )
    }
}
