//! The search session core: query identities, the component registry, the
//! request and result paths, and the controller state machine tying them
//! together.

mod controller;
mod dispatcher;
mod key;
mod registry;
mod request;


pub use controller::{DEFAULT_TIME_ZONE, SessionController};
pub use dispatcher::{DispatchReport, ResultDispatcher};
pub use key::QueryKeyFactory;
pub use registry::ComponentRegistry;
pub use request::RequestBuilder;
