mod doc_ref;
mod expression;
mod key;
mod mode;
mod request;
mod result;
mod settings;
mod status;

pub use doc_ref::DocRef;
pub use expression::{Condition, ExpressionItem, ExpressionOperator, ExpressionTerm, Operator};
pub use key::QueryKey;
pub use mode::Mode;
pub use request::{ComponentResultRequest, OffsetRange, Search, SearchRequest};
pub use result::{ChartResult, ChartSeries, ResultData, SearchResult, TableResult, TableRow};
pub use settings::{ChartSettings, ComponentSettings, TableSettings};
pub use status::ComponentStatus;
