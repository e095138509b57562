use crate::types::Mode;

/// Receives mode changes and remote errors, typically the query presenter.
pub trait ModeObserver {
    fn set_mode(&mut self, mode: Mode);

    /// Errors reported by the latest result. Called with an empty slice when a
    /// result carried no errors, which clears anything shown before.
    fn set_errors(&mut self, errors: &[String]);
}

/// Observer that ignores everything.
impl ModeObserver for () {
    fn set_mode(&mut self, _mode: Mode) {}

    fn set_errors(&mut self, _errors: &[String]) {}
}
