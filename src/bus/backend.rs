use livequery_api::{QueryKey, SearchRequest, SearchResult};

/// The far side of the transport: answers one poll round for one query.
pub trait SearchBackend: Send {
    fn search(&mut self, key: &QueryKey, request: &SearchRequest) -> SearchResult;
}

impl<F> SearchBackend for F
where
    F: FnMut(&QueryKey, &SearchRequest) -> SearchResult + Send,
{
    fn search(&mut self, key: &QueryKey, request: &SearchRequest) -> SearchResult {
        self(key, request)
    }
}
