use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to the data source a search runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocRef {
    pub kind: String,
    pub uuid: String,
    pub name: String,
}

impl DocRef {
    #[must_use]
    pub fn new(kind: impl Into<String>, uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uuid: uuid.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' ({})", self.kind, self.name, self.uuid)
    }
}
