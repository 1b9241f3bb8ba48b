//! Core module - API access, lifecycle rules and client-side state

pub mod client;
pub mod config;
pub mod debounce;
pub mod lifecycle;
pub mod router;
pub mod session;
pub mod store;

pub use client::{ApiClient, ApiError, HttpTransport, Method, Transport};
pub use config::{Config, ConfigError};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use lifecycle::{Action, Lifecycle, LifecycleError, TransitionInput, TransitionOutcome};
pub use router::{Role, Route, RouteError};
pub use session::{Session, SessionError, SessionStore};
pub use store::{Mutation, Query, QueryKey, QueryState, Store};
