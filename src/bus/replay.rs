use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use livequery_api::{QueryKey, SearchRequest, SearchResult};
use thiserror::Error;
use tracing::debug;

use super::backend::SearchBackend;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay script {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid replay script {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Answers each poll round with the next frame of a canned script.
///
/// Every query key gets its own cursor, so a restarted search replays the
/// script from the top. Once the script runs out the backend reports an
/// empty, complete result.
#[derive(Debug, Clone, Default)]
pub struct ReplayBackend {
    frames: Vec<SearchResult>,
    cursors: HashMap<QueryKey, usize>,
}

impl ReplayBackend {
    #[must_use]
    pub fn new(frames: Vec<SearchResult>) -> Self {
        Self {
            frames,
            cursors: HashMap::new(),
        }
    }

    /// Parse a script: a JSON array of result frames.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Self::parse(json, "<inline>")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, &path.display().to_string())
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ReplayError> {
        let frames = serde_json::from_str(json).map_err(|source| ReplayError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self::new(frames))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn next_frame(&mut self, key: &QueryKey) -> SearchResult {
        if !self.cursors.contains_key(key) {
            self.cursors.retain(|known, _| !known.same_query(key));
        }
        let cursor = self.cursors.entry(key.clone()).or_insert(0);
        let frame = self.frames.get(*cursor).cloned();
        *cursor += 1;
        frame.unwrap_or_else(SearchResult::completed)
    }
}

impl SearchBackend for ReplayBackend {
    fn search(&mut self, key: &QueryKey, request: &SearchRequest) -> SearchResult {
        let mut frame = self.next_frame(key);
        frame.results.retain(|id, _| {
            request
                .component_requests
                .get(id)
                .is_some_and(|component| component.fetch_data)
        });
        debug!(
            %key,
            components = frame.results.len(),
            complete = frame.complete,
            "replayed frame"
        );
        frame
    }
}
