mod errors;

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use config::{Config, ConfigError, Environment, File};
use livequery::api::{ChartSettings, DocRef, ExpressionOperator, TableSettings};
use livequery::app_dirs;
use livequery::bus::DEFAULT_POLL_INTERVAL;
use livequery::session::DEFAULT_TIME_ZONE;
use serde::Deserialize;

use crate::cli::CliArgs;
pub(crate) use errors::{SettingSource, SettingsError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SCRIPT_NAME: &str = "replay.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    session: SessionSection,
    data_source: Option<DataSourceSection>,
    query: QuerySection,
    transport: TransportSection,
    components: Option<Vec<ComponentSection>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SessionSection {
    scope_id: Option<String>,
    scope_name: Option<String>,
    query_id: Option<String>,
    time_zone: Option<String>,
    incremental: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSourceSection {
    #[serde(default = "default_data_source_kind")]
    kind: String,
    uuid: String,
    #[serde(default)]
    name: String,
}

fn default_data_source_kind() -> String {
    "Index".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct QuerySection {
    terms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TransportSection {
    script: Option<PathBuf>,
    poll_interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ComponentSection {
    id: String,
    kind: String,
    fields: Vec<String>,
    max_results: Vec<u32>,
    extract_values: bool,
    page_size: Option<u64>,
    visualisation: Option<String>,
    max_values: Vec<u32>,
}

/// Which CLI flags overrode file or environment values.
#[derive(Debug, Default, Clone)]
struct ConfigSources {
    terms: Option<SettingSource>,
    poll_interval_ms: Option<SettingSource>,
    timeout_ms: Option<SettingSource>,
}

impl ConfigSources {
    fn or_key(source: &Option<SettingSource>, key: &'static str) -> SettingSource {
        source.clone().unwrap_or(SettingSource::ConfigKey(key))
    }
}

/// A result component to create for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ComponentConfig {
    Table {
        id: String,
        settings: TableSettings,
        page_size: Option<u64>,
    },
    Chart {
        id: String,
        settings: ChartSettings,
    },
}

impl ComponentConfig {
    pub(crate) fn id(&self) -> &str {
        match self {
            ComponentConfig::Table { id, .. } | ComponentConfig::Chart { id, .. } => id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ComponentConfig::Table { .. } => "table",
            ComponentConfig::Chart { .. } => "chart",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub(crate) scope_id: String,
    pub(crate) scope_name: String,
    pub(crate) query_id: String,
    pub(crate) time_zone: String,
    pub(crate) incremental: bool,
    pub(crate) data_source: Option<DocRef>,
    pub(crate) expression: ExpressionOperator,
    pub(crate) components: Vec<ComponentConfig>,
    pub(crate) script: Option<PathBuf>,
    pub(crate) poll_interval: Duration,
    pub(crate) timeout: Duration,
}

impl ResolvedConfig {
    pub(crate) fn print_summary(&self) {
        println!("Effective configuration:");
        println!("  Scope: {} ({})", self.scope_id, self.scope_name);
        println!("  Query: {}", self.query_id);
        match &self.data_source {
            Some(source) => println!("  Data source: {source}"),
            None => println!("  Data source: (none, search will not start)"),
        }
        println!("  Terms: {}", self.expression.term_count());
        println!("  Incremental: {}", bool_to_word(self.incremental));
        println!("  Time zone: {}", self.time_zone);
        for component in &self.components {
            println!("  Component: {} ({})", component.id(), component.kind());
        }
        match &self.script {
            Some(path) => println!("  Replay script: {}", path.display()),
            None => println!("  Replay script: (none, search completes immediately)"),
        }
        println!("  Poll interval: {}ms", self.poll_interval.as_millis());
        println!("  Timeout: {}ms", self.timeout.as_millis());
    }
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    let sources = raw.apply_cli_overrides(cli);
    raw.resolve(&sources)
}

fn build_config(cli: &CliArgs) -> Result<Config> {
    let mut builder = Config::builder();

    if !cli.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &cli.config {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("livequery")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("query.terms"),
    );

    builder.build().map_err(|err| match err {
        ConfigError::Frozen => anyhow!("configuration builder is frozen"),
        other => other.into(),
    })
}

fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(dir) = app_dirs::get_config_dir() {
        files.push(dir.join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".livequery.toml"));
        files.push(current_dir.join("livequery.toml"));
    }

    files
}

impl RawConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) -> ConfigSources {
        let mut sources = ConfigSources::default();

        if let Some(scope) = cli.scope.clone() {
            self.session.scope_id = Some(scope);
        }
        if let Some(name) = cli.scope_name.clone() {
            self.session.scope_name = Some(name);
        }
        if let Some(query_id) = cli.query_id.clone() {
            self.session.query_id = Some(query_id);
        }
        if let Some(time_zone) = cli.time_zone.clone() {
            self.session.time_zone = Some(time_zone);
        }
        if let Some(incremental) = cli.incremental {
            self.session.incremental = Some(incremental);
        }
        if !cli.terms.is_empty() {
            self.query.terms = Some(cli.terms.clone());
            sources.terms = Some(SettingSource::CliFlag("--term"));
        }
        if let Some(script) = cli.script.clone() {
            self.transport.script = Some(script);
        }
        if let Some(value) = cli.poll_interval_ms {
            self.transport.poll_interval_ms = Some(value);
            sources.poll_interval_ms = Some(SettingSource::CliFlag("--poll-interval-ms"));
        }
        if let Some(value) = cli.timeout_ms {
            self.transport.timeout_ms = Some(value);
            sources.timeout_ms = Some(SettingSource::CliFlag("--timeout-ms"));
        }

        sources
    }

    fn resolve(self, sources: &ConfigSources) -> Result<ResolvedConfig> {
        let scope_id = non_empty(self.session.scope_id).unwrap_or_else(|| "default".to_string());
        let scope_name = non_empty(self.session.scope_name).unwrap_or_else(|| scope_id.clone());
        let query_id = non_empty(self.session.query_id).unwrap_or_else(|| "query".to_string());
        let time_zone =
            non_empty(self.session.time_zone).unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let incremental = self.session.incremental.unwrap_or(true);

        let data_source = self
            .data_source
            .filter(|source| !source.uuid.trim().is_empty())
            .map(|source| DocRef::new(source.kind, source.uuid, source.name));

        let terms = self.query.terms.unwrap_or_default();
        let expression = ExpressionOperator::from_terms(&terms).map_err(|err| {
            SettingsError::invalid(
                "query.terms",
                terms.join(", "),
                ConfigSources::or_key(&sources.terms, "query.terms"),
                err.to_string(),
            )
        })?;

        let components = resolve_components(self.components.unwrap_or_default())?;

        let poll_interval = match self.transport.poll_interval_ms {
            Some(ms) => positive_millis(
                "transport.poll_interval_ms",
                ms,
                ConfigSources::or_key(&sources.poll_interval_ms, "transport.poll_interval_ms"),
            )?,
            None => DEFAULT_POLL_INTERVAL,
        };
        let timeout = match self.transport.timeout_ms {
            Some(ms) => positive_millis(
                "transport.timeout_ms",
                ms,
                ConfigSources::or_key(&sources.timeout_ms, "transport.timeout_ms"),
            )?,
            None => DEFAULT_TIMEOUT,
        };

        let script = match self.transport.script {
            Some(path) if path.is_relative() => Some(
                env::current_dir()
                    .context("failed to resolve current directory for replay script")?
                    .join(path),
            ),
            Some(path) => Some(path),
            None => default_script(),
        };

        Ok(ResolvedConfig {
            scope_id,
            scope_name,
            query_id,
            time_zone,
            incremental,
            data_source,
            expression,
            components,
            script,
            poll_interval,
            timeout,
        })
    }
}

fn resolve_components(sections: Vec<ComponentSection>) -> Result<Vec<ComponentConfig>> {
    if sections.is_empty() {
        return Ok(vec![ComponentConfig::Table {
            id: "table".to_string(),
            settings: TableSettings::default(),
            page_size: None,
        }]);
    }

    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(sections.len());
    for section in sections {
        let id = section.id.trim().to_string();
        if id.is_empty() {
            return Err(SettingsError::invalid(
                "components.id",
                section.id,
                SettingSource::ConfigKey("components"),
                "component id must not be empty",
            )
            .into());
        }
        if !seen.insert(id.clone()) {
            return Err(SettingsError::invalid(
                "components.id",
                id,
                SettingSource::ConfigKey("components"),
                "component ids must be unique",
            )
            .into());
        }

        let component = match section.kind.trim().to_ascii_lowercase().as_str() {
            "table" | "" => ComponentConfig::Table {
                id,
                settings: TableSettings {
                    fields: section.fields,
                    max_results: section.max_results,
                    extract_values: section.extract_values,
                },
                page_size: section.page_size.filter(|size| *size > 0),
            },
            "chart" => ComponentConfig::Chart {
                id,
                settings: ChartSettings {
                    visualisation: section
                        .visualisation
                        .unwrap_or_else(|| "bar".to_string()),
                    fields: section.fields,
                    max_values: section.max_values,
                },
            },
            _ => {
                return Err(SettingsError::invalid(
                    "components.kind",
                    section.kind,
                    SettingSource::ConfigKey("components"),
                    "expected `table` or `chart`",
                )
                .into());
            }
        };
        components.push(component);
    }
    Ok(components)
}

fn positive_millis(key: &'static str, ms: u64, origin: SettingSource) -> Result<Duration> {
    if ms == 0 {
        return Err(
            SettingsError::invalid(key, ms.to_string(), origin, "must be greater than zero").into(),
        );
    }
    Ok(Duration::from_millis(ms))
}

fn default_script() -> Option<PathBuf> {
    let path = app_dirs::get_data_dir().ok()?.join(DEFAULT_SCRIPT_NAME);
    path.is_file().then_some(path)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli_with(file: &NamedTempFile) -> CliArgs {
        CliArgs {
            config: vec![file.path().to_path_buf()],
            no_config: true,
            ..CliArgs::default()
        }
    }

    const SAMPLE: &str = r#"
        [session]
        scope_id = "D1"
        scope_name = "Dashboard"
        query_id = "Q1"
        time_zone = "Europe/London"

        [data_source]
        uuid = "0b9f1a7e"
        name = "Events"

        [query]
        terms = ["status=error"]

        [transport]
        poll_interval_ms = 100
        timeout_ms = 5000

        [[components]]
        id = "table1"
        kind = "table"
        fields = ["host", "count"]
        page_size = 25

        [[components]]
        id = "chart1"
        kind = "chart"
        visualisation = "line"
    "#;

    #[test]
    fn loads_sections_from_file() {
        let file = config_file(SAMPLE);
        let resolved = load(&cli_with(&file)).unwrap();

        assert_eq!(resolved.scope_id, "D1");
        assert_eq!(resolved.time_zone, "Europe/London");
        assert_eq!(
            resolved.data_source,
            Some(DocRef::new("Index", "0b9f1a7e", "Events"))
        );
        assert_eq!(resolved.expression.term_count(), 1);
        assert_eq!(resolved.poll_interval, Duration::from_millis(100));
        let ids: Vec<_> = resolved.components.iter().map(ComponentConfig::id).collect();
        assert_eq!(ids, vec!["table1", "chart1"]);
        assert!(matches!(
            resolved.components[0],
            ComponentConfig::Table {
                page_size: Some(25),
                ..
            }
        ));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let file = config_file(SAMPLE);
        let mut cli = cli_with(&file);
        cli.query_id = Some("Q2".into());
        cli.poll_interval_ms = Some(40);
        cli.terms = vec!["host=web-1".into(), "level=warn".into()];
        cli.incremental = Some(false);

        let resolved = load(&cli).unwrap();

        assert_eq!(resolved.query_id, "Q2");
        assert_eq!(resolved.poll_interval, Duration::from_millis(40));
        assert_eq!(resolved.expression.term_count(), 2);
        assert!(!resolved.incremental);
    }

    #[test]
    fn defaults_without_any_configuration() {
        let cli = CliArgs {
            no_config: true,
            ..CliArgs::default()
        };
        let resolved = load(&cli).unwrap();

        assert_eq!(resolved.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(resolved.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(resolved.data_source.is_none());
        assert_eq!(resolved.components.len(), 1);
        assert!(resolved.incremental);
    }

    #[test]
    fn zero_poll_interval_names_the_cli_flag() {
        let file = config_file(SAMPLE);
        let mut cli = cli_with(&file);
        cli.poll_interval_ms = Some(0);

        let err = load(&cli).unwrap_err();
        let settings = err.downcast_ref::<SettingsError>().expect("settings error");

        assert_eq!(settings.key, "transport.poll_interval_ms");
        assert_eq!(
            settings.origin,
            SettingSource::CliFlag("--poll-interval-ms")
        );
    }

    #[test]
    fn rejects_unknown_component_kind_and_duplicate_ids() {
        let unknown = config_file(
            r#"
            [[components]]
            id = "map1"
            kind = "map"
            "#,
        );
        let err = load(&cli_with(&unknown)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SettingsError>().map(|e| e.key),
            Some("components.kind")
        );

        let duplicate = config_file(
            r#"
            [[components]]
            id = "t"
            [[components]]
            id = "t"
            "#,
        );
        let err = load(&cli_with(&duplicate)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SettingsError>().map(|e| e.reason.as_str()),
            Some("component ids must be unique")
        );
    }

    #[test]
    fn malformed_term_is_a_settings_error() {
        let file = config_file(SAMPLE);
        let mut cli = cli_with(&file);
        cli.terms = vec!["no-separator".into()];

        let err = load(&cli).unwrap_err();
        let settings = err.downcast_ref::<SettingsError>().expect("settings error");

        assert_eq!(settings.origin, SettingSource::CliFlag("--term"));
    }
}
