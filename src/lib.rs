//! Search session orchestration for live, incrementally refreshed queries.
//!
//! The [`session`] module holds the controller that keeps one query in sync
//! with a set of result components. The [`bus`] module provides an
//! in-process transport and a scripted replay backend so a session can be
//! driven end to end without a search service.

pub mod app_dirs;
pub mod bus;
pub mod logging;
pub mod observer;
pub mod session;

pub use bus::{ChannelBus, ReplayBackend, ReplayError, SearchBackend};
pub use observer::LogObserver;
pub use session::{
    ComponentRegistry, DispatchReport, QueryKeyFactory, RequestBuilder, ResultDispatcher,
    SessionController,
};

pub use livequery_api as api;
