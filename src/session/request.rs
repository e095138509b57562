use indexmap::IndexMap;
use livequery_api::{
    ComponentResultRequest, ComponentSettings, ResultComponent, Search, SearchRequest,
};

use super::ComponentRegistry;

/// Snapshots a [`ComponentRegistry`] into what goes out to the transport.
///
/// Every method returns `None` for an empty registry, so an empty view never
/// produces a search or a request.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> RequestBuilder<'a> {
    #[must_use]
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Settings of every consumer, captured when a [`Search`] is built.
    pub fn settings(&self) -> Option<IndexMap<String, ComponentSettings>> {
        self.snapshot(|component| component.settings())
    }

    /// What every consumer wants back from the next poll round.
    pub fn component_requests(&self) -> Option<IndexMap<String, ComponentResultRequest>> {
        self.snapshot(|component| component.result_request())
    }

    pub fn build(&self, search: &Search, time_zone: &str) -> Option<SearchRequest> {
        let component_requests = self.component_requests()?;
        Some(SearchRequest {
            search: search.clone(),
            component_requests,
            time_zone: time_zone.to_string(),
        })
    }

    fn snapshot<T>(&self, f: impl Fn(&dyn ResultComponent) -> T) -> Option<IndexMap<String, T>> {
        if self.registry.is_empty() {
            return None;
        }
        Some(
            self.registry
                .iter()
                .map(|(id, component)| (id.to_string(), f(component)))
                .collect(),
        )
    }
}
