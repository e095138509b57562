use std::fmt;

use thiserror::Error;

/// Where a setting value came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
    CliFlag(&'static str),
    ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
            Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid value for {key} from {origin}: {reason} (value: {value})")]
pub(crate) struct SettingsError {
    pub(crate) key: &'static str,
    pub(crate) value: String,
    pub(crate) origin: SettingSource,
    pub(crate) reason: String,
}

impl SettingsError {
    pub(crate) fn invalid(
        key: &'static str,
        value: impl Into<String>,
        origin: SettingSource,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key,
            value: value.into(),
            origin,
            reason: reason.into(),
        }
    }
}
