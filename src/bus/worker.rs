use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use livequery_api::{QueryKey, ResultSink, SearchRequest};
use tracing::{debug, trace};

use super::backend::SearchBackend;
use super::commands::BusCommand;

/// Launches the background bus worker thread and returns its command channel.
pub(crate) fn spawn<S>(backend: S, poll_interval: Duration) -> Sender<BusCommand>
where
    S: SearchBackend + 'static,
{
    let (command_tx, command_rx) = mpsc::channel();
    let worker = Worker::new(backend, poll_interval);
    thread::spawn(move || worker.run(command_rx));
    command_tx
}

struct Worker<S> {
    backend: S,
    poll_interval: Duration,
    registrations: IndexMap<QueryKey, ResultSink>,
    scheduled: Vec<(Instant, QueryKey)>,
}

impl<S: SearchBackend> Worker<S> {
    fn new(backend: S, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            registrations: IndexMap::new(),
            scheduled: Vec::new(),
        }
    }

    fn run(mut self, command_rx: Receiver<BusCommand>) {
        loop {
            let command = match self.next_deadline() {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match command_rx.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match command_rx.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(command) => {
                    if !self.handle_command(command) {
                        break;
                    }
                }
                None => self.fire_due_polls(),
            }
        }
        debug!("search bus worker stopped");
    }

    fn handle_command(&mut self, command: BusCommand) -> bool {
        match command {
            BusCommand::Put { key, sink } => {
                trace!(%key, "registered");
                self.registrations.insert(key, sink);
                true
            }
            BusCommand::Remove { key } => {
                trace!(%key, "removed");
                self.registrations.shift_remove(&key);
                self.scheduled.retain(|(_, scheduled)| *scheduled != key);
                true
            }
            BusCommand::Poll => {
                let keys: Vec<QueryKey> = self.registrations.keys().cloned().collect();
                for key in keys {
                    self.request(key);
                }
                true
            }
            BusCommand::Submit { key, request } => {
                self.run_round(key, &request);
                true
            }
            BusCommand::Shutdown => false,
        }
    }

    /// Ask the session behind `key` for its request, dropping it if it has
    /// gone away.
    fn request(&mut self, key: QueryKey) {
        self.scheduled.retain(|(_, scheduled)| *scheduled != key);
        let Some(sink) = self.registrations.get(&key) else {
            return;
        };
        if !sink.request_wanted(key.clone()) {
            debug!(%key, "session inbox closed, dropping registration");
            self.registrations.shift_remove(&key);
        }
    }

    fn run_round(&mut self, key: QueryKey, request: &SearchRequest) {
        let Some(sink) = self.registrations.get(&key) else {
            debug!(%key, "request submitted for unregistered key");
            return;
        };
        let sink = sink.clone();
        let result = self.backend.search(&key, request);
        let complete = result.complete;
        if !sink.send_result(key.clone(), result) {
            debug!(%key, "session inbox closed, dropping registration");
            self.registrations.shift_remove(&key);
            return;
        }
        if !complete {
            self.scheduled
                .push((Instant::now() + self.poll_interval, key));
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.scheduled.iter().map(|(deadline, _)| *deadline).min()
    }

    fn fire_due_polls(&mut self) {
        let now = Instant::now();
        let (due, pending): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|(deadline, _)| *deadline <= now);
        self.scheduled = pending;
        for (_, key) in due {
            self.request(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livequery_api::{BusMessage, SearchResult};

    fn key(discriminator: &str) -> QueryKey {
        QueryKey::new("D1", "Dashboard", "Q1", discriminator)
    }

    #[test]
    fn shutdown_command_stops_worker() {
        let tx = spawn(
            |_: &QueryKey, _: &SearchRequest| SearchResult::completed(),
            Duration::from_millis(10),
        );
        tx.send(BusCommand::Shutdown).unwrap();
    }

    #[test]
    fn poll_asks_every_registered_session_for_a_request() {
        let tx = spawn(
            |_: &QueryKey, _: &SearchRequest| SearchResult::completed(),
            Duration::from_millis(10),
        );
        let (inbox_tx, inbox_rx) = mpsc::channel();
        tx.send(BusCommand::Put {
            key: key("a:1"),
            sink: ResultSink::new(inbox_tx.clone()),
        })
        .unwrap();
        tx.send(BusCommand::Put {
            key: key("b:2"),
            sink: ResultSink::new(inbox_tx),
        })
        .unwrap();
        tx.send(BusCommand::Remove { key: key("b:2") }).unwrap();
        tx.send(BusCommand::Poll).unwrap();

        let message = inbox_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("request wanted");
        assert_eq!(message, BusMessage::RequestWanted(key("a:1")));
        assert!(inbox_rx.recv_timeout(Duration::from_millis(50)).is_err());

        tx.send(BusCommand::Shutdown).unwrap();
    }

    #[test]
    fn dropped_inbox_removes_registration() {
        let mut worker = Worker::new(
            |_: &QueryKey, _: &SearchRequest| SearchResult::completed(),
            Duration::from_millis(10),
        );
        let (inbox_tx, inbox_rx) = mpsc::channel();
        worker.handle_command(BusCommand::Put {
            key: key("a:1"),
            sink: ResultSink::new(inbox_tx),
        });
        drop(inbox_rx);

        worker.handle_command(BusCommand::Poll);

        assert!(worker.registrations.is_empty());
    }

    #[test]
    fn incomplete_round_schedules_another_poll() {
        let mut worker = Worker::new(
            |_: &QueryKey, _: &SearchRequest| SearchResult::default(),
            Duration::from_secs(60),
        );
        let (inbox_tx, _inbox_rx) = mpsc::channel();
        worker.handle_command(BusCommand::Put {
            key: key("a:1"),
            sink: ResultSink::new(inbox_tx),
        });
        worker.run_round(key("a:1"), &sample_request());
        assert_eq!(worker.scheduled.len(), 1);

        worker.handle_command(BusCommand::Remove { key: key("a:1") });
        assert!(worker.scheduled.is_empty());
        assert!(worker.next_deadline().is_none());
    }

    fn sample_request() -> SearchRequest {
        use indexmap::IndexMap;
        use livequery_api::{DocRef, ExpressionOperator, Search};

        SearchRequest {
            search: Search::new(
                DocRef::new("Index", "1", "Events"),
                ExpressionOperator::default(),
                IndexMap::new(),
                true,
            ),
            component_requests: IndexMap::new(),
            time_zone: "UTC".into(),
        }
    }
}
