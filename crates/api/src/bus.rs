//! The contract between a search session and the transport that polls for
//! its results.
//!
//! A transport never calls into the session directly. It writes
//! [`BusMessage`]s into the session's inbox through a [`ResultSink`], and the
//! session drains that inbox on its own thread.

use std::sync::mpsc::Sender;

use crate::types::{QueryKey, SearchRequest, SearchResult};

/// Messages a transport sends to a registered session.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    /// The transport is about to run a poll round for `key` and wants the
    /// session's current request. The session answers with
    /// [`SearchBus::submit`].
    RequestWanted(QueryKey),
    /// A result snapshot produced for `key`.
    Result { key: QueryKey, result: SearchResult },
}

impl BusMessage {
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        match self {
            BusMessage::RequestWanted(key) => key,
            BusMessage::Result { key, .. } => key,
        }
    }
}

/// Write half of a session inbox, handed to the transport on registration.
#[derive(Debug, Clone)]
pub struct ResultSink {
    tx: Sender<BusMessage>,
}

impl ResultSink {
    #[must_use]
    pub fn new(tx: Sender<BusMessage>) -> Self {
        Self { tx }
    }

    /// Deliver a result. Returns `false` once the session has gone away.
    pub fn send_result(&self, key: QueryKey, result: SearchResult) -> bool {
        self.tx.send(BusMessage::Result { key, result }).is_ok()
    }

    /// Ask the session for its request. Returns `false` once the session has
    /// gone away.
    pub fn request_wanted(&self, key: QueryKey) -> bool {
        self.tx.send(BusMessage::RequestWanted(key)).is_ok()
    }
}

/// Asynchronous polling transport used by a search session.
///
/// None of these calls may fail from the session's point of view; a
/// transport logs and swallows its own problems. `put` and `remove` must be
/// safe to call for keys that are already registered or already gone.
pub trait SearchBus {
    /// Register `sink` to receive results for `key` until removed.
    fn put(&mut self, key: QueryKey, sink: ResultSink);

    /// Cancel the registration for `key`.
    fn remove(&mut self, key: &QueryKey);

    /// Request one asynchronous poll round for every registered key.
    fn poll(&mut self);

    /// Answer a [`BusMessage::RequestWanted`] with the request for `key`.
    fn submit(&mut self, key: &QueryKey, request: SearchRequest);
}
