//! In-process transport for search sessions.
//!
//! [`ChannelBus`] is a cheap handle onto a background worker thread that owns
//! the registrations and a [`SearchBackend`]. It fulfils the
//! [`SearchBus`](livequery_api::SearchBus) contract entirely through
//! channels: the session sends commands, the worker writes results back into
//! the session's inbox.

mod backend;
mod channel;
mod commands;
mod replay;
mod worker;

pub use backend::SearchBackend;
pub use channel::ChannelBus;
pub use replay::{ReplayBackend, ReplayError};

pub const DEFAULT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(250);
