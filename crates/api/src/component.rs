use crate::types::{ComponentResultRequest, ComponentSettings, ComponentStatus, ResultData};

/// A consumer of search results, such as a table or a chart.
///
/// The session only ever talks to consumers through this trait; it never
/// inspects which concrete kind of widget sits behind it. Every method must
/// be safe to call redundantly, since teardown paths call `set_wants_data`
/// and `end_search` without checking prior state.
pub trait ResultComponent {
    /// Whether the consumer should currently take data from incoming results.
    fn set_wants_data(&mut self, wants_data: bool);

    /// A search that feeds this consumer has started.
    fn start_search(&mut self);

    /// The search feeding this consumer has ended.
    fn end_search(&mut self);

    /// Discard any data held from an earlier search.
    fn reset(&mut self);

    /// Deliver a data snapshot addressed to this consumer.
    fn set_data(&mut self, data: ResultData);

    /// Settings captured when a new [`Search`](crate::Search) is built.
    fn settings(&self) -> ComponentSettings;

    /// What this consumer wants back in the next poll round.
    fn result_request(&self) -> ComponentResultRequest;

    /// Summary of the consumer's current state for reporting.
    fn status(&self) -> ComponentStatus;
}
