//! Shared data model and collaborator traits for `livequery` search sessions.
//!
//! The session core, the transports and the concrete result components all
//! talk to each other through the types defined here, so a component crate
//! never needs to depend on the session implementation itself.

pub mod bus;
pub mod component;
pub mod error;
pub mod observer;
pub mod source;
pub mod types;

pub use bus::{BusMessage, ResultSink, SearchBus};
pub use component::ResultComponent;
pub use error::ExpressionError;
pub use observer::ModeObserver;
pub use source::{DataSourceLoader, StaticDataSource};
pub use types::{
    ChartResult, ChartSeries, ChartSettings, ComponentResultRequest, ComponentSettings,
    ComponentStatus, Condition, DocRef, ExpressionItem, ExpressionOperator, ExpressionTerm, Mode,
    OffsetRange, Operator, QueryKey, ResultData, Search, SearchRequest, SearchResult, TableResult,
    TableRow, TableSettings,
};
