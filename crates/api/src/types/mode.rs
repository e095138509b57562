use std::fmt;

use serde::{Deserialize, Serialize};

/// Run state of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A query is running and consumers want its data.
    Active,
    /// The remote query keeps running but consumers ignore its data.
    Paused,
    /// No live query.
    #[default]
    Inactive,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Active => "active",
            Mode::Paused => "paused",
            Mode::Inactive => "inactive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
