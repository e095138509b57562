use livequery_api::{Mode, ModeObserver};
use tracing::{info, warn};

/// A [`ModeObserver`] that reports session changes through `tracing` and
/// remembers what it last saw.
#[derive(Debug, Default, Clone)]
pub struct LogObserver {
    mode: Mode,
    errors: Vec<String>,
}

impl LogObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl ModeObserver for LogObserver {
    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(%mode, "session mode");
        }
        self.mode = mode;
    }

    fn set_errors(&mut self, errors: &[String]) {
        for error in errors {
            warn!(error = error.as_str(), "search reported an error");
        }
        self.errors = errors.to_vec();
    }
}
