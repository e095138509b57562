use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use livequery_api::{
    BusMessage, DataSourceLoader, ExpressionOperator, Mode, ModeObserver, QueryKey,
    ResultComponent, ResultSink, Search, SearchBus, SearchRequest, SearchResult, StaticDataSource,
};
use tracing::{debug, info};

use super::{ComponentRegistry, QueryKeyFactory, RequestBuilder, ResultDispatcher};

pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Drives one interactive query shared by a set of result components.
///
/// The controller owns the session state and the read half of its inbox.
/// Transports write into the inbox from any thread; [`pump`](Self::pump) and
/// [`wait`](Self::wait) apply those messages on the controller's own thread,
/// so nothing in here needs a lock.
pub struct SessionController<B: SearchBus> {
    bus: B,
    observer: Box<dyn ModeObserver>,
    data_source: Box<dyn DataSourceLoader>,
    registry: ComponentRegistry,
    keys: QueryKeyFactory,
    time_zone: String,
    inbox_tx: Sender<BusMessage>,
    inbox_rx: Receiver<BusMessage>,
    mode: Mode,
    current_query_key: QueryKey,
    registered: bool,
    current_search: Option<Search>,
    active_search: Option<Search>,
    current_expression: Option<ExpressionOperator>,
    current_result: Option<SearchResult>,
}

impl<B: SearchBus> SessionController<B> {
    pub fn new(bus: B, scope_id: &str, scope_name: &str, query_id: &str) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let mut keys = QueryKeyFactory::new();
        let current_query_key = keys.next_key(scope_id, scope_name, query_id);
        Self {
            bus,
            observer: Box::new(()),
            data_source: Box::new(StaticDataSource::unloaded()),
            registry: ComponentRegistry::new(),
            keys,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            inbox_tx,
            inbox_rx,
            mode: Mode::Inactive,
            current_query_key,
            registered: false,
            current_search: None,
            active_search: None,
            current_expression: None,
            current_result: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl ModeObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    #[must_use]
    pub fn with_data_source(mut self, data_source: impl DataSourceLoader + 'static) -> Self {
        self.data_source = Box::new(data_source);
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Stop searching for `scope_id`/`query_id` and switch to a new query.
    pub fn set_initial_query_key(&mut self, scope_id: &str, scope_name: &str, query_id: &str) {
        self.destroy();
        self.current_query_key = self.keys.next_key(scope_id, scope_name, query_id);
    }

    /// Start, pause or resume the search.
    ///
    /// While active this pauses, while paused it resumes, and while inactive
    /// it starts a fresh run with a new query key. A fresh run needs at least
    /// one component, a loaded data source and an expression; without them
    /// the session stays inactive.
    pub fn start(&mut self, expression: Option<ExpressionOperator>, incremental: bool) {
        match self.mode {
            Mode::Active => {
                self.registry.set_wants_data(false);
                self.set_mode(Mode::Paused);
            }
            Mode::Inactive => {
                self.reset();
                self.start_new_search(expression, incremental);
            }
            Mode::Paused => {
                self.registry.set_wants_data(true);
                self.set_mode(Mode::Active);
            }
        }
    }

    /// Re-issue the current query for a single component.
    pub fn refresh(&mut self, component_id: &str) {
        if !self.registry.contains(component_id) {
            debug!(component = component_id, "refresh for unknown component ignored");
            return;
        }
        let Some(component_settings) = RequestBuilder::new(&self.registry).settings() else {
            return;
        };
        let Some(data_source) = self.data_source.loaded_data_source() else {
            debug!(component = component_id, "no data source loaded, refresh skipped");
            return;
        };
        let Some(expression) = self.current_expression.clone() else {
            debug!(component = component_id, "nothing searched yet, refresh skipped");
            return;
        };

        let search = Search::new(data_source, expression, component_settings, true);
        self.current_search = Some(search.clone());
        self.active_search = Some(search);

        if let Some(component) = self.registry.get_mut(component_id) {
            component.set_wants_data(true);
            component.start_search();
        }
        debug!(key = %self.current_query_key, component = component_id, "refreshing component");
        self.bus.poll();
    }

    /// Apply a result for the current query.
    pub fn on_result(&mut self, result: SearchResult) {
        let report = ResultDispatcher::new(&mut self.registry).dispatch(&result);
        self.observer.set_errors(&result.errors);
        debug!(
            key = %self.current_query_key,
            delivered = report.delivered,
            errors = result.errors.len(),
            complete = report.complete,
            "result applied"
        );
        self.current_result = Some(result);

        if report.complete {
            self.set_mode(Mode::Inactive);
            self.current_search = None;
            info!(key = %self.current_query_key, "search complete");
        }
    }

    /// Stop searching and tell every component the search is over.
    ///
    /// Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.registered {
            self.bus.remove(&self.current_query_key);
            self.registered = false;
        }
        self.current_search = None;
        self.set_mode(Mode::Inactive);
        self.registry.for_each_mut(|_, component| {
            component.set_wants_data(false);
            component.end_search();
        });
    }

    /// The request the transport should send for the current search.
    pub fn get_request(&self) -> Option<SearchRequest> {
        let search = self.current_search.as_ref()?;
        RequestBuilder::new(&self.registry).build(search, &self.time_zone)
    }

    /// Attach a component. Returns the component it replaced, if any.
    pub fn add_component(
        &mut self,
        id: impl Into<String>,
        component: Box<dyn ResultComponent>,
    ) -> Option<Box<dyn ResultComponent>> {
        self.registry.insert(id, component)
    }

    pub fn remove_component(&mut self, id: &str) -> Option<Box<dyn ResultComponent>> {
        self.registry.remove(id)
    }

    /// Apply every message already waiting in the inbox. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.inbox_rx.try_recv() {
                Ok(message) => {
                    self.handle_message(message);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Block for up to `timeout` until a message arrives, then drain the
    /// inbox.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        match self.inbox_rx.recv_timeout(timeout) {
            Ok(message) => {
                self.handle_message(message);
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout) => 0,
            Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_query_key(&self) -> &QueryKey {
        &self.current_query_key
    }

    pub fn current_search(&self) -> Option<&Search> {
        self.current_search.as_ref()
    }

    pub fn active_search(&self) -> Option<&Search> {
        self.active_search.as_ref()
    }

    pub fn current_expression(&self) -> Option<&ExpressionOperator> {
        self.current_expression.as_ref()
    }

    pub fn current_result(&self) -> Option<&SearchResult> {
        self.current_result.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.current_search.is_some()
    }

    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.registry.ids()
    }

    pub fn component(&self, id: &str) -> Option<&dyn ResultComponent> {
        self.registry.get(id)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn reset(&mut self) {
        self.destroy();
        self.registry.set_wants_data(true);
    }

    fn start_new_search(&mut self, expression: Option<ExpressionOperator>, incremental: bool) {
        let Some(component_settings) = RequestBuilder::new(&self.registry).settings() else {
            debug!("no components registered, search not started");
            return;
        };
        let Some(data_source) = self.data_source.loaded_data_source() else {
            debug!("no data source loaded, search not started");
            return;
        };
        let Some(expression) = expression else {
            debug!("no expression supplied, search not started");
            return;
        };

        self.current_expression = Some(expression.clone());
        self.current_query_key = self.keys.next_key(
            &self.current_query_key.scope_id,
            &self.current_query_key.scope_name,
            &self.current_query_key.query_id,
        );
        let search = Search::new(data_source, expression, component_settings, incremental);
        self.current_search = Some(search.clone());
        self.active_search = Some(search);

        self.set_mode(Mode::Active);

        self.registry.for_each_mut(|_, component| {
            component.reset();
            component.start_search();
        });

        info!(
            key = %self.current_query_key,
            components = self.registry.len(),
            incremental,
            "search started"
        );
        self.bus.put(
            self.current_query_key.clone(),
            ResultSink::new(self.inbox_tx.clone()),
        );
        self.registered = true;
        self.bus.poll();
    }

    fn handle_message(&mut self, message: BusMessage) {
        if !self.registered || *message.key() != self.current_query_key {
            debug!(
                key = %message.key(),
                current = %self.current_query_key,
                "dropping message for a query that is no longer current"
            );
            return;
        }

        match message {
            BusMessage::RequestWanted(key) => {
                if let Some(request) = self.get_request() {
                    self.bus.submit(&key, request);
                }
            }
            BusMessage::Result { result, .. } => self.on_result(result),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "mode changed");
        }
        self.mode = mode;
        self.observer.set_mode(mode);
    }
}

impl<B: SearchBus> Drop for SessionController<B> {
    fn drop(&mut self) {
        if self.registered {
            self.bus.remove(&self.current_query_key);
        }
    }
}

impl<B: SearchBus> std::fmt::Debug for SessionController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("mode", &self.mode)
            .field("current_query_key", &self.current_query_key)
            .field("registered", &self.registered)
            .field("components", &self.registry)
            .finish_non_exhaustive()
    }
}
