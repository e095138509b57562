use livequery_api::SearchResult;
use tracing::debug;

use super::ComponentRegistry;

/// What happened when a result was applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Consumers that received data.
    pub delivered: usize,
    /// Result ids with no registered consumer.
    pub unclaimed: Vec<String>,
    /// The result ended the search.
    pub complete: bool,
}

/// Fans one inbound [`SearchResult`] out to the registered consumers.
pub struct ResultDispatcher<'a> {
    registry: &'a mut ComponentRegistry,
}

impl<'a> ResultDispatcher<'a> {
    pub fn new(registry: &'a mut ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Deliver data first, then, for a terminal result, tell every consumer
    /// the search is over, whether or not it got data this round.
    pub fn dispatch(self, result: &SearchResult) -> DispatchReport {
        let mut report = DispatchReport {
            complete: result.complete,
            ..DispatchReport::default()
        };

        self.registry.for_each_mut(|id, component| {
            if let Some(data) = result.results.get(id) {
                component.set_data(data.clone());
                report.delivered += 1;
            }
        });

        report.unclaimed = result
            .results
            .keys()
            .filter(|id| !self.registry.contains(id))
            .cloned()
            .collect();
        if !report.unclaimed.is_empty() {
            debug!(ids = ?report.unclaimed, "result carried data for unregistered components");
        }

        if result.complete {
            self.registry.for_each_mut(|_, component| {
                component.set_wants_data(false);
                component.end_search();
            });
        }

        report
    }
}
