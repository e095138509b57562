use std::sync::mpsc::Sender;
use std::time::Duration;

use livequery_api::{QueryKey, ResultSink, SearchBus, SearchRequest};
use tracing::warn;

use super::backend::SearchBackend;
use super::commands::BusCommand;
use super::worker;

/// Handle onto a background bus worker. Clones share the same worker.
#[derive(Debug, Clone)]
pub struct ChannelBus {
    tx: Sender<BusCommand>,
}

impl ChannelBus {
    /// Spawn a worker serving `backend`. Incomplete searches are polled
    /// again after `poll_interval`.
    pub fn spawn<S>(backend: S, poll_interval: Duration) -> Self
    where
        S: SearchBackend + 'static,
    {
        let tx = worker::spawn(backend, poll_interval);
        Self { tx }
    }

    /// Stop the worker. Later calls on any handle are logged and ignored.
    pub fn shutdown(&self) {
        let _ = self.tx.send(BusCommand::Shutdown);
    }

    fn send(&self, command: BusCommand) {
        if self.tx.send(command).is_err() {
            warn!("search bus worker has stopped, command dropped");
        }
    }
}

impl SearchBus for ChannelBus {
    fn put(&mut self, key: QueryKey, sink: ResultSink) {
        self.send(BusCommand::Put { key, sink });
    }

    fn remove(&mut self, key: &QueryKey) {
        self.send(BusCommand::Remove { key: key.clone() });
    }

    fn poll(&mut self) {
        self.send(BusCommand::Poll);
    }

    fn submit(&mut self, key: &QueryKey, request: SearchRequest) {
        self.send(BusCommand::Submit {
            key: key.clone(),
            request: Box::new(request),
        });
    }
}
