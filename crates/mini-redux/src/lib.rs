//! A small Redux-style state container
//!
//! This crate provides:
//! - [`Store`]: holds state, runs the reducer, notifies subscribers
//! - The middleware pipeline ([`Pipeline`], [`Middleware`]) with logging and thunk middleware
//! - [`Dispatcher`] / [`GetState`] capabilities for middleware and thunks
//! - [`Listeners`]: ordered listener sets with stable unsubscribe handles
//! - [`Observable`]: push-based value streams with `map`/`filter`/`reject`
//!
//! Everything is single-threaded: handles are `Rc`-based and dispatch runs to
//! completion synchronously, including re-entrant dispatches from subscribers.

pub mod action;
pub mod dispatcher;
pub mod error;
pub mod listeners;
pub mod middleware;
pub mod observable;
pub mod store;

pub use action::{decode_action, validate_action, Action, Dispatchable, INIT};
pub use dispatcher::{DispatchFn, DispatchResult, Dispatched, Dispatcher, GetState};
pub use error::{InvalidActionError, StoreError};
pub use listeners::{Listener, ListenerId, Listeners, Unsubscribe};
pub use middleware::logging::{LogEntry, LogJournal, LoggingMiddleware};
pub use middleware::thunk::{Thunk, ThunkMiddleware};
pub use middleware::{apply_middleware, from_fn, FnMiddleware, Middleware, MiddlewareApi, Next, Pipeline};
pub use observable::Observable;
pub use store::{Reducer, Store};
