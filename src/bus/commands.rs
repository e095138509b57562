use livequery_api::{QueryKey, ResultSink, SearchRequest};

/// Commands understood by the background bus worker.
#[derive(Debug)]
pub(crate) enum BusCommand {
    /// Start routing results for `key` into `sink`.
    Put { key: QueryKey, sink: ResultSink },
    /// Forget `key` and any poll scheduled for it.
    Remove { key: QueryKey },
    /// Ask every registered session for its request.
    Poll,
    /// Run one round for `key` with the request the session supplied.
    Submit {
        key: QueryKey,
        request: Box<SearchRequest>,
    },
    /// Stop the background worker thread.
    Shutdown,
}
