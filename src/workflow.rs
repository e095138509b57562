use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use livequery::api::{ComponentStatus, ExpressionOperator, Mode, ResultComponent, StaticDataSource};
use livequery::{ChannelBus, LogObserver, ReplayBackend, SessionController};
use livequery_chart::ChartComponent;
use livequery_table::TableComponent;
use serde::Serialize;
use tracing::{info, warn};

use crate::settings::{ComponentConfig, ResolvedConfig};

/// What a finished (or abandoned) session looked like.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionOutcome {
    pub(crate) key: String,
    pub(crate) mode: Mode,
    pub(crate) complete: bool,
    pub(crate) errors: Vec<String>,
    pub(crate) components: Vec<ComponentOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ComponentOutcome {
    pub(crate) id: String,
    #[serde(flatten)]
    pub(crate) status: ComponentStatus,
}

/// Runs one session from start until the backend reports completion.
pub(crate) struct SessionWorkflow {
    controller: SessionController<ChannelBus>,
    expression: ExpressionOperator,
    incremental: bool,
    poll_interval: Duration,
    timeout: Duration,
}

impl SessionWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
        SessionFactory::build(config)
    }

    pub(crate) fn run(mut self) -> Result<SessionOutcome> {
        self.controller.start(Some(self.expression.clone()), self.incremental);
        if self.controller.mode() == Mode::Inactive {
            warn!("search did not start; check the data source and components");
        }

        let deadline = Instant::now() + self.timeout;
        while self.controller.mode() != Mode::Inactive {
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    key = %self.controller.current_query_key(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "gave up waiting for the search to complete"
                );
                break;
            }
            self.controller.wait(self.poll_interval.min(deadline - now));
        }

        let outcome = self.outcome();
        self.controller.destroy();
        self.controller.bus().shutdown();
        info!(key = %outcome.key, complete = outcome.complete, "session finished");
        Ok(outcome)
    }

    fn outcome(&self) -> SessionOutcome {
        let result = self.controller.current_result();
        SessionOutcome {
            key: self.controller.current_query_key().to_string(),
            mode: self.controller.mode(),
            complete: result.is_some_and(|result| result.complete),
            errors: result.map(|result| result.errors.clone()).unwrap_or_default(),
            components: self
                .controller
                .component_ids()
                .filter_map(|id| {
                    let component = self.controller.component(id)?;
                    Some(ComponentOutcome {
                        id: id.to_string(),
                        status: component.status(),
                    })
                })
                .collect(),
        }
    }
}

/// Turns resolved settings into a wired session.
struct SessionFactory {
    controller: SessionController<ChannelBus>,
}

impl SessionFactory {
    fn build(config: ResolvedConfig) -> Result<SessionWorkflow> {
        let ResolvedConfig {
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
        } = config;

        let backend = match script {
            Some(path) => ReplayBackend::from_path(&path)
                .with_context(|| format!("failed to load replay script {}", path.display()))?,
            None => ReplayBackend::default(),
        };
        let bus = ChannelBus::spawn(backend, poll_interval);

        let data_source = match data_source {
            Some(source) => StaticDataSource::new(source),
            None => StaticDataSource::unloaded(),
        };

        let controller = SessionController::new(bus, &scope_id, &scope_name, &query_id)
            .with_observer(LogObserver::new())
            .with_data_source(data_source)
            .with_time_zone(time_zone);

        let factory = Self { controller }.with_components(components);

        Ok(SessionWorkflow {
            controller: factory.finish(),
            expression,
            incremental,
            poll_interval,
            timeout,
        })
    }

    fn with_components(mut self, components: Vec<ComponentConfig>) -> Self {
        for component in components {
            let (id, component): (String, Box<dyn ResultComponent>) = match component {
                ComponentConfig::Table {
                    id,
                    settings,
                    page_size,
                } => {
                    let mut table = TableComponent::new(id.clone(), settings);
                    if let Some(size) = page_size {
                        table = table.with_page_size(size);
                    }
                    (id, Box::new(table))
                }
                ComponentConfig::Chart { id, settings } => {
                    let chart = ChartComponent::new(id.clone(), settings);
                    (id, Box::new(chart))
                }
            };
            self.controller.add_component(id, component);
        }
        self
    }

    fn finish(self) -> SessionController<ChannelBus> {
        self.controller
    }
}
